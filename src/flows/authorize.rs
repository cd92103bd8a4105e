//! Two-hop authorize URL construction.
//!
//! The user-agent is sent to GitHub's Apple initiate endpoint, which signs the user in with Apple
//! and then follows `return_to`: the ordinary OAuth authorize path for this client. Nesting the
//! path is what skips GitHub's "choose a sign-in method" screen. The inner query string is
//! encoded once on its own, then once more as the value of `return_to`.

// crates.io
use url::form_urlencoded::Serializer;
// self
use crate::{
	_prelude::*,
	auth::{self, Scopes},
	error::ConfigError,
	flows::GhAppleOAuth,
	http::GithubHttpClient,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	provider::AUTHORIZE_PATH,
};

/// Redirect target plus the CSRF state embedded in it.
///
/// The caller must persist `state` (e.g. in a short-lived, HTTP-only cookie) before redirecting
/// the user-agent to `url`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUrlResult {
	/// Fully-formed redirect target.
	pub url: String,
	/// CSRF token embedded in `url`.
	pub state: String,
}

/// Inputs for [`create_auth_url`].
#[derive(Clone, Copy, Debug)]
pub struct AuthUrlParams<'a> {
	/// GitHub OAuth App client ID.
	pub client_id: &'a str,
	/// Registered callback URL.
	pub redirect_uri: &'a str,
	/// Requested scopes; `None` requests `read:user user:email`.
	pub scopes: Option<&'a Scopes>,
	/// `allow_signup` on the authorize path.
	pub allow_signup: bool,
	/// `disable_signup` on the Apple initiate endpoint.
	pub disable_signup: bool,
	/// Caller-supplied state; a fresh one is generated when `None`.
	pub state: Option<&'a str>,
}
impl<'a> AuthUrlParams<'a> {
	/// Creates parameters with the default scopes and signup flags.
	pub fn new(client_id: &'a str, redirect_uri: &'a str) -> Self {
		Self {
			client_id,
			redirect_uri,
			scopes: None,
			allow_signup: false,
			disable_signup: true,
			state: None,
		}
	}

	/// Overrides the requested scopes.
	pub fn with_scopes(mut self, scopes: &'a Scopes) -> Self {
		self.scopes = Some(scopes);

		self
	}

	/// Overrides `allow_signup`.
	pub fn with_allow_signup(mut self, allow: bool) -> Self {
		self.allow_signup = allow;

		self
	}

	/// Overrides `disable_signup`.
	pub fn with_disable_signup(mut self, disable: bool) -> Self {
		self.disable_signup = disable;

		self
	}

	/// Pins the state instead of generating one.
	pub fn with_state(mut self, state: &'a str) -> Self {
		self.state = Some(state);

		self
	}
}

/// Builds the Apple initiate URL wrapping the authorize path.
///
/// Pure apart from state generation: with a pinned state, identical inputs always produce the
/// identical string, parameter order included. The only failure is a missing identifier.
pub fn create_auth_url(apple_initiate: &Url, params: &AuthUrlParams<'_>) -> Result<AuthUrlResult> {
	if params.client_id.is_empty() {
		return Err(ConfigError::MissingField { field: "client_id" }.into());
	}
	if params.redirect_uri.is_empty() {
		return Err(ConfigError::MissingField { field: "redirect_uri" }.into());
	}

	Ok(compose(apple_initiate, params))
}

pub(crate) fn compose(apple_initiate: &Url, params: &AuthUrlParams<'_>) -> AuthUrlResult {
	let state = params.state.map_or_else(auth::create_state, str::to_owned);
	let scope = match params.scopes {
		Some(scopes) => scopes.joined(),
		None => Scopes::default().joined(),
	};
	let authorize_query = Serializer::new(String::new())
		.append_pair("client_id", params.client_id)
		.append_pair("redirect_uri", params.redirect_uri)
		.append_pair("scope", &scope)
		.append_pair("state", &state)
		.append_pair("allow_signup", bool_param(params.allow_signup))
		.finish();
	let authorize_path = format!("{AUTHORIZE_PATH}?{authorize_query}");
	let mut url = apple_initiate.clone();

	url.query_pairs_mut()
		.append_pair("disable_signup", bool_param(params.disable_signup))
		.append_pair("return_to", &authorize_path);

	AuthUrlResult { url: url.into(), state }
}

fn bool_param(value: bool) -> &'static str {
	if value { "true" } else { "false" }
}

impl<C> GhAppleOAuth<C>
where
	C: ?Sized + GithubHttpClient,
{
	/// Builds the redirect URL from the stored configuration.
	///
	/// Pass `Some(state)` to pin the CSRF token; otherwise a fresh one is generated.
	pub fn create_auth_url(&self, state: Option<&str>) -> AuthUrlResult {
		const KIND: FlowKind = FlowKind::Authorize;

		let _span = FlowSpan::new(KIND, "create_auth_url").entered();

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let config = self.config();
		let result = compose(&config.endpoints.apple_initiate, &config.auth_url_params(state));

		obs::record_flow_outcome(KIND, FlowOutcome::Success);

		result
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{error::ErrorKind, provider::GITHUB_APPLE_INITIATE_ENDPOINT};

	const CLIENT_ID: &str = "Iv1.abc";
	const REDIRECT_URI: &str = "https://app.example.com/auth/apple/callback";

	fn initiate() -> Url {
		Url::parse(GITHUB_APPLE_INITIATE_ENDPOINT).expect("Initiate endpoint should parse.")
	}

	fn pairs(url: &Url) -> HashMap<String, String> {
		url.query_pairs().into_owned().collect()
	}

	#[test]
	fn nested_url_is_encoded_twice() {
		let result = create_auth_url(
			&initiate(),
			&AuthUrlParams::new(CLIENT_ID, REDIRECT_URI).with_state("s123"),
		)
		.expect("Auth URL should build.");

		assert_eq!(result.state, "s123");
		assert_eq!(
			result.url,
			"https://github.com/sessions/social/apple/initiate?disable_signup=true&return_to=\
			 %2Flogin%2Foauth%2Fauthorize%3Fclient_id%3DIv1.abc\
			 %26redirect_uri%3Dhttps%253A%252F%252Fapp.example.com%252Fauth%252Fapple%252Fcallback\
			 %26scope%3Dread%253Auser%2Buser%253Aemail%26state%3Ds123%26allow_signup%3Dfalse"
		);
	}

	#[test]
	fn pinned_state_is_referentially_transparent() {
		let scopes = Scopes::new(["read:user", "user:email", "read:org"])
			.expect("Scope fixture should be valid.");
		let params = AuthUrlParams::new(CLIENT_ID, REDIRECT_URI)
			.with_scopes(&scopes)
			.with_allow_signup(true)
			.with_state("fixed");
		let first = create_auth_url(&initiate(), &params).expect("Auth URL should build.");
		let second = create_auth_url(&initiate(), &params).expect("Auth URL should build.");

		assert_eq!(first, second);
	}

	#[test]
	fn return_to_round_trips_every_value() {
		let scopes =
			Scopes::new(["user:email", "read:user"]).expect("Scope fixture should be valid.");
		let redirect = "https://app.example.com/cb?next=/home&lang=en US";
		let params = AuthUrlParams::new(CLIENT_ID, redirect)
			.with_scopes(&scopes)
			.with_allow_signup(true)
			.with_disable_signup(false);
		let result = create_auth_url(&initiate(), &params).expect("Auth URL should build.");
		let outer = Url::parse(&result.url).expect("Generated URL should parse.");
		let outer_pairs = pairs(&outer);

		assert_eq!(outer.path(), "/sessions/social/apple/initiate");
		assert_eq!(outer_pairs.get("disable_signup").map(String::as_str), Some("false"));

		let return_to = outer_pairs.get("return_to").expect("return_to should be present.");

		assert!(return_to.starts_with("/login/oauth/authorize?"));

		let inner = Url::parse("https://github.com")
			.and_then(|base| base.join(return_to))
			.expect("Authorize path should resolve against github.com.");
		let inner_pairs = pairs(&inner);

		assert_eq!(inner_pairs.get("client_id").map(String::as_str), Some(CLIENT_ID));
		assert_eq!(inner_pairs.get("redirect_uri").map(String::as_str), Some(redirect));
		assert_eq!(inner_pairs.get("scope").map(String::as_str), Some("user:email read:user"));
		assert_eq!(inner_pairs.get("state"), Some(&result.state));
		assert_eq!(inner_pairs.get("allow_signup").map(String::as_str), Some("true"));
	}

	#[test]
	fn generated_state_is_embedded() {
		let result = create_auth_url(&initiate(), &AuthUrlParams::new(CLIENT_ID, REDIRECT_URI))
			.expect("Auth URL should build.");

		assert_eq!(result.state.len(), auth::STATE_LEN);
		assert!(result.url.contains(&format!("state%3D{}", result.state)));
	}

	#[test]
	fn missing_identifiers_fail() {
		let err = create_auth_url(&initiate(), &AuthUrlParams::new("", REDIRECT_URI))
			.expect_err("Blank client IDs must fail.");

		assert_eq!(err.kind(), ErrorKind::ConfigInvalid);

		let err = create_auth_url(&initiate(), &AuthUrlParams::new(CLIENT_ID, ""))
			.expect_err("Blank redirect URIs must fail.");

		assert_eq!(err.to_string(), "redirect_uri is required");
	}
}
