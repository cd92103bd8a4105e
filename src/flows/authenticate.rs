//! End-to-end sign-in: code exchange plus profile fetch, and the store-backed begin/complete pair.

// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	callback::{self, CallbackQuery},
	flows::{AuthUrlResult, GhAppleOAuth, GithubEmail, GithubUser},
	http::GithubHttpClient,
	obs::{self, FlowKind},
	store::{DEFAULT_STATE_TTL, STATE_KEY, StateStore},
};

/// Identity provider that issued the token.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityProvider {
	/// github.com.
	#[default]
	Github,
}
impl IdentityProvider {
	/// Stable lowercase label.
	pub const fn as_str(self) -> &'static str {
		match self {
			IdentityProvider::Github => "github",
		}
	}
}

/// How the user proved their identity to the provider.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignInMethod {
	/// Sign in with Apple, bridged by GitHub.
	#[default]
	Apple,
}
impl SignInMethod {
	/// Stable lowercase label.
	pub const fn as_str(self) -> &'static str {
		match self {
			SignInMethod::Apple => "apple",
		}
	}
}

/// Outcome of a completed sign-in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResult {
	/// Always [`IdentityProvider::Github`].
	pub provider: IdentityProvider,
	/// Always [`SignInMethod::Apple`].
	pub method: SignInMethod,
	/// GitHub access token; serialize this value only to trusted sinks.
	pub access_token: AccessToken,
	/// User resource.
	pub user: GithubUser,
	/// Email resource, in provider order.
	pub emails: Vec<GithubEmail>,
}

impl<C> GhAppleOAuth<C>
where
	C: ?Sized + GithubHttpClient,
{
	/// Exchanges `code` and fetches the profile. The token exchange is attempted exactly once.
	pub async fn authenticate(&self, code: &str) -> Result<AuthResult> {
		obs::observe(FlowKind::Authenticate, "authenticate", async {
			let access_token = self.exchange_code(code).await?;
			let profile = self.get_profile(&access_token).await?;

			Ok(AuthResult {
				provider: IdentityProvider::Github,
				method: SignInMethod::Apple,
				access_token,
				user: profile.user,
				emails: profile.emails,
			})
		})
		.await
	}

	/// Builds a redirect URL and saves its state for [`DEFAULT_STATE_TTL`].
	pub async fn begin<S>(&self, store: &S) -> Result<AuthUrlResult>
	where
		S: ?Sized + StateStore,
	{
		self.begin_with_ttl(store, DEFAULT_STATE_TTL).await
	}

	/// Builds a redirect URL and saves its state for `ttl`.
	///
	/// The state is saved before the URL is handed back, so a redirect is never issued for a
	/// state the callback could not find.
	pub async fn begin_with_ttl<S>(&self, store: &S, ttl: Duration) -> Result<AuthUrlResult>
	where
		S: ?Sized + StateStore,
	{
		let result = self.create_auth_url(None);

		store.set(STATE_KEY, &result.state, ttl).await?;

		Ok(result)
	}

	/// Validates the callback against the saved state, consumes it, then authenticates.
	///
	/// The saved state is consumed with [`StateStore::take_if`] before any network I/O. Only the
	/// caller that wins that removal proceeds; a replayed or concurrent duplicate callback fails
	/// with [`ErrorKind::InvalidState`](crate::error::ErrorKind::InvalidState), even if the
	/// winning exchange later fails. A rejected callback leaves the saved state untouched.
	pub async fn complete<S>(&self, store: &S, query: &CallbackQuery) -> Result<AuthResult>
	where
		S: ?Sized + StateStore,
	{
		obs::observe(FlowKind::Callback, "complete", async {
			let saved = store.get(STATE_KEY).await?;
			let code = callback::validate(query, saved.as_deref())?;
			// `validate` only succeeds with a saved state, and it equals the returned one.
			let state = saved.unwrap_or_default();

			if !store.take_if(STATE_KEY, &state).await? {
				return Err(Error::InvalidState);
			}

			self.authenticate(&code).await
		})
		.await
	}
}
