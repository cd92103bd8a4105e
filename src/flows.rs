//! Sign-in flows composed by [`GhAppleOAuth`].
//!
//! Each step is available both as a free function taking explicit inputs (for callers that
//! manage configuration themselves) and as a method on [`GhAppleOAuth`], which supplies the
//! validated [`Config`] and records spans and outcome metrics.

pub mod authenticate;
pub mod authorize;
pub mod exchange;
pub mod profile;

pub use authenticate::*;
pub use authorize::*;
pub use exchange::*;
pub use profile::*;

// self
use crate::{_prelude::*, config::Config, http::GithubHttpClient};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestGhAppleOAuth = GhAppleOAuth<ReqwestHttpClient>;

/// Apple-via-GitHub sign-in client.
///
/// Holds the validated configuration and the HTTP transport; it keeps no per-request state, so
/// one instance can serve any number of concurrent sign-ins. The CSRF state handoff between
/// [`create_auth_url`](Self::create_auth_url) and the callback belongs to the caller (or to a
/// [`StateStore`](crate::store::StateStore) passed to [`begin`](Self::begin) /
/// [`complete`](Self::complete)).
pub struct GhAppleOAuth<C>
where
	C: ?Sized + GithubHttpClient,
{
	/// HTTP client used for every outbound provider request.
	pub http_client: Arc<C>,
	config: Arc<Config>,
}
impl<C> GhAppleOAuth<C>
where
	C: ?Sized + GithubHttpClient,
{
	/// Creates a client over the caller-provided transport.
	///
	/// Fails with [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid) before
	/// the transport is ever used if a mandatory value is missing.
	pub fn with_http_client(config: Config, http_client: impl Into<Arc<C>>) -> Result<Self> {
		config.validate()?;

		Ok(Self { http_client: http_client.into(), config: Arc::new(config) })
	}

	/// Configuration this client was built with.
	pub fn config(&self) -> &Config {
		&self.config
	}
}
#[cfg(feature = "reqwest")]
impl GhAppleOAuth<ReqwestHttpClient> {
	/// Creates a client backed by a default reqwest transport.
	pub fn new(config: Config) -> Result<Self> {
		Self::with_http_client(config, ReqwestHttpClient::default())
	}
}
impl<C> Clone for GhAppleOAuth<C>
where
	C: ?Sized + GithubHttpClient,
{
	fn clone(&self) -> Self {
		Self { http_client: self.http_client.clone(), config: self.config.clone() }
	}
}
impl<C> Debug for GhAppleOAuth<C>
where
	C: ?Sized + GithubHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("GhAppleOAuth")
			.field("client_id", &self.config.client_id)
			.field("redirect_uri", &self.config.redirect_uri)
			.field("scopes", &self.config.scopes)
			.finish()
	}
}
