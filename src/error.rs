//! Error taxonomy shared by the sign-in flows, the callback validator, and state stores.

// self
use crate::{_prelude::*, auth::ScopeValidationError, store::StoreError};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Boxed error used for transport and parsing causes.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Machine-readable failure kinds exposed to HTTP adapters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
	/// Required configuration is missing or malformed.
	ConfigInvalid,
	/// The provider reported an error on the callback (e.g. the user declined consent).
	#[serde(rename = "oauth_denied")]
	OAuthDenied,
	/// The callback is missing `code` or `state`.
	InvalidCallback,
	/// The callback `state` is absent from the store or does not match it.
	InvalidState,
	/// The code-for-token exchange was rejected or malformed.
	TokenExchangeFailed,
	/// The user resource could not be fetched.
	ProfileFetchFailed,
	/// The email resource could not be fetched.
	EmailsFetchFailed,
	/// The CSRF state store failed.
	StateStoreFailed,
}
impl ErrorKind {
	/// Returns the stable machine-readable code.
	pub const fn as_str(self) -> &'static str {
		match self {
			ErrorKind::ConfigInvalid => "config_invalid",
			ErrorKind::OAuthDenied => "oauth_denied",
			ErrorKind::InvalidCallback => "invalid_callback",
			ErrorKind::InvalidState => "invalid_state",
			ErrorKind::TokenExchangeFailed => "token_exchange_failed",
			ErrorKind::ProfileFetchFailed => "profile_fetch_failed",
			ErrorKind::EmailsFetchFailed => "emails_fetch_failed",
			ErrorKind::StateStoreFailed => "state_store_failed",
		}
	}

	/// HTTP status an adapter should answer with: local failures map to 500, everything the
	/// caller or the provider caused maps to 400.
	pub const fn http_status(self) -> u16 {
		match self {
			ErrorKind::ConfigInvalid | ErrorKind::StateStoreFailed => 500,
			_ => 400,
		}
	}
}
impl Display for ErrorKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Canonical error exposed by public APIs.
///
/// `Display` renders the human-readable message verbatim; pair it with [`Error::kind`] when
/// building a response.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// CSRF state store failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		StoreError,
	),

	/// Provider-reported callback error.
	#[error("{description}")]
	OAuthDenied {
		/// Provider `error` code.
		error: String,
		/// Provider `error_description`, or `OAuth denied` when absent.
		description: String,
		/// Provider `error_uri`, if supplied.
		uri: Option<String>,
	},
	/// Callback lacks `code` or `state`.
	#[error("Missing code or state")]
	InvalidCallback,
	/// Callback `state` does not match the saved one.
	#[error("State does not match")]
	InvalidState,
	/// Token endpoint rejected the code or answered with something unusable.
	#[error("{message}")]
	TokenExchange {
		/// Provider `error_description`, `error`, or a generic message, in that order.
		message: String,
		/// HTTP status code, when a response arrived.
		status: Option<u16>,
		/// Transport or parsing cause.
		#[source]
		source: Option<BoxError>,
	},
	/// User endpoint failed.
	#[error("{message}")]
	ProfileFetch {
		/// Human-readable summary.
		message: String,
		/// HTTP status code, when a response arrived.
		status: Option<u16>,
		/// Transport or parsing cause.
		#[source]
		source: Option<BoxError>,
	},
	/// Emails endpoint failed.
	#[error("{message}")]
	EmailsFetch {
		/// Human-readable summary.
		message: String,
		/// HTTP status code, when a response arrived.
		status: Option<u16>,
		/// Transport or parsing cause.
		#[source]
		source: Option<BoxError>,
	},
}
impl Error {
	/// Machine-readable kind of this failure.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Error::Config(_) => ErrorKind::ConfigInvalid,
			Error::Storage(_) => ErrorKind::StateStoreFailed,
			Error::OAuthDenied { .. } => ErrorKind::OAuthDenied,
			Error::InvalidCallback => ErrorKind::InvalidCallback,
			Error::InvalidState => ErrorKind::InvalidState,
			Error::TokenExchange { .. } => ErrorKind::TokenExchangeFailed,
			Error::ProfileFetch { .. } => ErrorKind::ProfileFetchFailed,
			Error::EmailsFetch { .. } => ErrorKind::EmailsFetchFailed,
		}
	}

	/// Shorthand for `self.kind().as_str()`.
	pub fn code(&self) -> &'static str {
		self.kind().as_str()
	}

	/// Upstream HTTP status attached to exchange and fetch failures.
	pub fn upstream_status(&self) -> Option<u16> {
		match self {
			Error::TokenExchange { status, .. }
			| Error::ProfileFetch { status, .. }
			| Error::EmailsFetch { status, .. } => *status,
			_ => None,
		}
	}
}

/// Configuration and validation failures; always raised before any network I/O.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A mandatory field was empty.
	#[error("{field} is required")]
	MissingField {
		/// Field name.
		field: &'static str,
	},
	/// A mandatory environment variable was unset or empty.
	#[error("Missing required environment variable: {name}")]
	MissingEnvVar {
		/// Variable name.
		name: &'static str,
	},
	/// Scope list contains an unusable entry.
	#[error(transparent)]
	InvalidScope(#[from] ScopeValidationError),
	/// A provider endpoint cannot be parsed.
	#[error("The {endpoint} endpoint is not a valid URL")]
	InvalidEndpoint {
		/// Which endpoint failed.
		endpoint: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}
