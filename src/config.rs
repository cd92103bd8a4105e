//! Immutable client configuration, validated once at startup.
//!
//! Nothing in this crate reads the environment lazily: [`Config::from_env`] is the only place
//! variables are consulted, and the resulting value is handed to
//! [`GhAppleOAuth`](crate::flows::GhAppleOAuth) explicitly.

// self
use crate::{
	_prelude::*,
	auth::{ClientSecret, Scopes},
	error::ConfigError,
	flows::AuthUrlParams,
	provider::GithubEndpoints,
};

/// Environment variable holding the GitHub OAuth App client ID.
pub const ENV_CLIENT_ID: &str = "GITHUB_CLIENT_ID";
/// Environment variable holding the GitHub OAuth App client secret.
pub const ENV_CLIENT_SECRET: &str = "GITHUB_CLIENT_SECRET";
/// Environment variable holding the registered callback URL.
pub const ENV_REDIRECT_URI: &str = "GITHUB_REDIRECT_URI";
/// Optional environment variable overriding the requested scopes (space or comma separated).
pub const ENV_SCOPES: &str = "GITHUB_OAUTH_SCOPES";

/// Client configuration consumed by [`GhAppleOAuth`](crate::flows::GhAppleOAuth).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
	/// GitHub OAuth App client ID.
	pub client_id: String,
	/// GitHub OAuth App client secret.
	pub client_secret: ClientSecret,
	/// Callback URL registered with the OAuth App.
	pub redirect_uri: String,
	/// Scopes requested on the authorize path.
	pub scopes: Scopes,
	/// Whether GitHub may offer account creation on the authorize screen.
	pub allow_signup: bool,
	/// Whether the Apple bridge should refuse to create new GitHub accounts.
	pub disable_signup: bool,
	/// Provider endpoints.
	pub endpoints: GithubEndpoints,
}
impl Config {
	/// Starts a builder seeded with the three mandatory values.
	pub fn builder(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		redirect_uri: impl Into<String>,
	) -> ConfigBuilder {
		ConfigBuilder::new(client_id, client_secret, redirect_uri)
	}

	/// Loads the configuration from the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Loads the configuration through an arbitrary key lookup.
	///
	/// Unset and empty variables are treated alike; required ones are never defaulted.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let required = |name: &'static str| {
			lookup(name).filter(|value| !value.is_empty()).ok_or(ConfigError::MissingEnvVar { name })
		};
		let mut builder = Self::builder(
			required(ENV_CLIENT_ID)?,
			required(ENV_CLIENT_SECRET)?,
			required(ENV_REDIRECT_URI)?,
		);

		if let Some(raw) = lookup(ENV_SCOPES).filter(|value| !value.trim().is_empty()) {
			builder = builder.scopes(Scopes::parse(&raw)?);
		}

		builder.build()
	}

	/// Ensures every mandatory value is present.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.client_id.is_empty() {
			return Err(ConfigError::MissingField { field: "client_id" });
		}
		if self.client_secret.is_empty() {
			return Err(ConfigError::MissingField { field: "client_secret" });
		}
		if self.redirect_uri.is_empty() {
			return Err(ConfigError::MissingField { field: "redirect_uri" });
		}

		Ok(())
	}

	pub(crate) fn auth_url_params<'a>(&'a self, state: Option<&'a str>) -> AuthUrlParams<'a> {
		AuthUrlParams {
			client_id: &self.client_id,
			redirect_uri: &self.redirect_uri,
			scopes: Some(&self.scopes),
			allow_signup: self.allow_signup,
			disable_signup: self.disable_signup,
			state,
		}
	}
}

/// Builder for [`Config`] values.
#[derive(Debug)]
pub struct ConfigBuilder {
	client_id: String,
	client_secret: ClientSecret,
	redirect_uri: String,
	scopes: Option<Scopes>,
	allow_signup: bool,
	disable_signup: bool,
	endpoints: Option<GithubEndpoints>,
}
impl ConfigBuilder {
	/// Creates a new builder; optional values start at their defaults.
	pub fn new(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		redirect_uri: impl Into<String>,
	) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: ClientSecret::new(client_secret),
			redirect_uri: redirect_uri.into(),
			scopes: None,
			allow_signup: false,
			disable_signup: true,
			endpoints: None,
		}
	}

	/// Overrides the requested scopes (defaults to `read:user user:email`).
	pub fn scopes(mut self, scopes: Scopes) -> Self {
		self.scopes = Some(scopes);

		self
	}

	/// Overrides `allow_signup` on the authorize path (defaults to `false`).
	pub fn allow_signup(mut self, allow: bool) -> Self {
		self.allow_signup = allow;

		self
	}

	/// Overrides `disable_signup` on the Apple initiate endpoint (defaults to `true`).
	pub fn disable_signup(mut self, disable: bool) -> Self {
		self.disable_signup = disable;

		self
	}

	/// Overrides the provider endpoints (defaults to github.com).
	pub fn endpoints(mut self, endpoints: GithubEndpoints) -> Self {
		self.endpoints = Some(endpoints);

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<Config, ConfigError> {
		let endpoints = match self.endpoints {
			Some(endpoints) => endpoints,
			None => GithubEndpoints::github()?,
		};
		let config = Config {
			client_id: self.client_id,
			client_secret: self.client_secret,
			redirect_uri: self.redirect_uri,
			scopes: self.scopes.unwrap_or_default(),
			allow_signup: self.allow_signup,
			disable_signup: self.disable_signup,
			endpoints,
		};

		config.validate()?;

		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let map = pairs
			.iter()
			.map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
			.collect::<HashMap<_, _>>();

		move |key| map.get(key).cloned()
	}

	#[test]
	fn builder_applies_defaults() {
		let config = Config::builder("client", "secret", "https://app.example.com/callback")
			.build()
			.expect("Complete configuration should build.");

		assert_eq!(config.scopes, Scopes::default());
		assert!(!config.allow_signup);
		assert!(config.disable_signup);
		assert_eq!(config.endpoints, GithubEndpoints::github().expect("Endpoints should parse."));
	}

	#[test]
	fn builder_rejects_each_missing_field() {
		for (id, secret, redirect, field) in [
			("", "secret", "https://app.example.com/cb", "client_id"),
			("client", "", "https://app.example.com/cb", "client_secret"),
			("client", "secret", "", "redirect_uri"),
		] {
			let err = Config::builder(id, secret, redirect)
				.build()
				.expect_err("Missing fields must fail fast.");

			assert!(
				matches!(err, ConfigError::MissingField { field: actual } if actual == field),
				"Unexpected error for {field}: {err:?}."
			);
		}
	}

	#[test]
	fn lookup_reads_required_and_optional_values() {
		let config = Config::from_lookup(env(&[
			(ENV_CLIENT_ID, "client"),
			(ENV_CLIENT_SECRET, "secret"),
			(ENV_REDIRECT_URI, "https://app.example.com/callback"),
			(ENV_SCOPES, "read:user,user:email,read:org"),
		]))
		.expect("Complete environment should load.");

		assert_eq!(config.client_id, "client");
		assert_eq!(config.client_secret.expose(), "secret");
		assert_eq!(config.scopes.joined(), "read:user user:email read:org");
	}

	#[test]
	fn lookup_names_the_missing_variable() {
		let err = Config::from_lookup(env(&[
			(ENV_CLIENT_ID, "client"),
			(ENV_CLIENT_SECRET, ""),
			(ENV_REDIRECT_URI, "https://app.example.com/callback"),
		]))
		.expect_err("Empty secrets must be rejected.");

		assert!(matches!(err, ConfigError::MissingEnvVar { name: ENV_CLIENT_SECRET }));
		assert_eq!(err.to_string(), "Missing required environment variable: GITHUB_CLIENT_SECRET");
	}

	#[test]
	fn debug_output_redacts_the_secret() {
		let config = Config::builder("client", "hunter2", "https://app.example.com/callback")
			.build()
			.expect("Complete configuration should build.");

		assert!(!format!("{config:?}").contains("hunter2"));
	}
}
