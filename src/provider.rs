//! GitHub endpoints used by the Apple bridge flow.
//!
//! The authorize path is always relative (`/login/oauth/authorize`): GitHub's Apple initiate
//! endpoint only accepts a same-origin `return_to`, so the path is nested verbatim instead of
//! an absolute authorize URL.

// self
use crate::{_prelude::*, error::ConfigError};

/// Token endpoint used for the code-for-token exchange.
pub const GITHUB_TOKEN_ENDPOINT: &str = "https://github.com/login/oauth/access_token";
/// Authenticated user resource.
pub const GITHUB_USER_ENDPOINT: &str = "https://api.github.com/user";
/// Authenticated user's email addresses.
pub const GITHUB_USER_EMAILS_ENDPOINT: &str = "https://api.github.com/user/emails";
/// GitHub's (undocumented) bridge that jumps straight into Sign in with Apple.
pub const GITHUB_APPLE_INITIATE_ENDPOINT: &str =
	"https://github.com/sessions/social/apple/initiate";
/// Relative authorize path nested into the initiate endpoint's `return_to`.
pub const AUTHORIZE_PATH: &str = "/login/oauth/authorize";

/// Endpoint set the flows talk to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubEndpoints {
	/// Token endpoint (form-encoded POST).
	pub token: Url,
	/// User resource (bearer GET).
	pub user: Url,
	/// Emails resource (bearer GET).
	pub emails: Url,
	/// Apple initiate endpoint that wraps the authorize path.
	pub apple_initiate: Url,
}
impl GithubEndpoints {
	/// Production endpoints on `github.com` / `api.github.com`.
	pub fn github() -> Result<Self, ConfigError> {
		Ok(Self {
			token: parse_endpoint("token", GITHUB_TOKEN_ENDPOINT)?,
			user: parse_endpoint("user", GITHUB_USER_ENDPOINT)?,
			emails: parse_endpoint("emails", GITHUB_USER_EMAILS_ENDPOINT)?,
			apple_initiate: parse_endpoint("apple_initiate", GITHUB_APPLE_INITIATE_ENDPOINT)?,
		})
	}

	/// Derives the endpoint set from a web base (`https://github.com`) and an API base
	/// (`https://api.github.com`), e.g. for GitHub Enterprise Server or a local mock.
	pub fn from_bases(web_base: &str, api_base: &str) -> Result<Self, ConfigError> {
		let web = web_base.trim_end_matches('/');
		let api = api_base.trim_end_matches('/');

		Ok(Self {
			token: parse_endpoint("token", &format!("{web}/login/oauth/access_token"))?,
			user: parse_endpoint("user", &format!("{api}/user"))?,
			emails: parse_endpoint("emails", &format!("{api}/user/emails"))?,
			apple_initiate: parse_endpoint(
				"apple_initiate",
				&format!("{web}/sessions/social/apple/initiate"),
			)?,
		})
	}
}

fn parse_endpoint(endpoint: &'static str, raw: &str) -> Result<Url, ConfigError> {
	Url::parse(raw).map_err(|source| ConfigError::InvalidEndpoint { endpoint, source })
}
