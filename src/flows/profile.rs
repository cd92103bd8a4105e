//! GitHub user and email resources fetched with the exchanged token.

// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	flows::GhAppleOAuth,
	http::{self, GithubHttpClient, HttpResponse},
	obs::{self, FlowKind},
	provider::GithubEndpoints,
};

/// Subset of GitHub's `GET /user` resource; unknown fields are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubUser {
	/// Numeric account ID.
	pub id: u64,
	/// Account handle.
	pub login: String,
	/// Display name.
	#[serde(default)]
	pub name: Option<String>,
	/// Avatar image URL.
	#[serde(default)]
	pub avatar_url: String,
	/// Profile page URL.
	#[serde(default)]
	pub html_url: String,
	/// Public email, when the user published one.
	#[serde(default)]
	pub email: Option<String>,
}

/// One entry of GitHub's `GET /user/emails` resource.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubEmail {
	/// Email address.
	pub email: String,
	/// Whether this is the account's primary address.
	#[serde(default)]
	pub primary: bool,
	/// Whether GitHub verified ownership.
	#[serde(default)]
	pub verified: bool,
	/// `public`, `private`, or absent.
	#[serde(default)]
	pub visibility: Option<String>,
}

/// User plus email list, fetched together.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubProfile {
	/// User resource.
	pub user: GithubUser,
	/// Email resource, in provider order.
	pub emails: Vec<GithubEmail>,
}
impl GithubProfile {
	/// Address marked both primary and verified, if any.
	pub fn primary_verified_email(&self) -> Option<&str> {
		primary_verified_email(&self.emails)
	}
}

/// Picks the address marked both primary and verified.
pub fn primary_verified_email(emails: &[GithubEmail]) -> Option<&str> {
	emails.iter().find(|email| email.primary && email.verified).map(|email| email.email.as_str())
}

/// Fetches `GET /user` and `GET /user/emails` concurrently.
///
/// Both requests are always awaited. When both fail, the user failure is reported, so the
/// outcome never depends on which response arrived first.
pub async fn get_profile<C>(
	http_client: &C,
	endpoints: &GithubEndpoints,
	access_token: &AccessToken,
) -> Result<GithubProfile>
where
	C: ?Sized + GithubHttpClient,
{
	let (user, emails) = futures::future::join(
		http_client.get_json(&endpoints.user, access_token.expose()),
		http_client.get_json(&endpoints.emails, access_token.expose()),
	)
	.await;
	let user = checked(user, Resource::User)?;
	let emails = checked(emails, Resource::Emails)?;
	let user = http::parse_json::<GithubUser>(&user.body)
		.map_err(|e| Resource::User.error(Some(user.status), Some(Box::new(e))))?;
	let emails = http::parse_json::<Vec<GithubEmail>>(&emails.body)
		.map_err(|e| Resource::Emails.error(Some(emails.status), Some(Box::new(e))))?;

	Ok(GithubProfile { user, emails })
}

#[derive(Clone, Copy)]
enum Resource {
	User,
	Emails,
}
impl Resource {
	fn error(self, status: Option<u16>, source: Option<BoxError>) -> Error {
		let message = match status {
			Some(status) => format!("GitHub {} endpoint returned {status}", self.label()),
			None => format!("GitHub {} endpoint could not be reached", self.label()),
		};

		match self {
			Resource::User => Error::ProfileFetch { message, status, source },
			Resource::Emails => Error::EmailsFetch { message, status, source },
		}
	}

	fn label(self) -> &'static str {
		match self {
			Resource::User => "user",
			Resource::Emails => "emails",
		}
	}
}

fn checked(
	response: Result<HttpResponse, BoxError>,
	resource: Resource,
) -> Result<HttpResponse> {
	match response {
		Ok(response) if response.is_success() => Ok(response),
		Ok(response) => Err(resource.error(Some(response.status), None)),
		Err(e) => Err(resource.error(None, Some(e))),
	}
}

impl<C> GhAppleOAuth<C>
where
	C: ?Sized + GithubHttpClient,
{
	/// Fetches the user and their email addresses with `access_token`.
	pub async fn get_profile(&self, access_token: &AccessToken) -> Result<GithubProfile> {
		obs::observe(
			FlowKind::Profile,
			"get_profile",
			get_profile(self.http_client.as_ref(), &self.config().endpoints, access_token),
		)
		.await
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{error::ErrorKind, http::HttpFuture};

	struct CannedApi {
		user: Option<HttpResponse>,
		emails: Option<HttpResponse>,
	}
	impl GithubHttpClient for CannedApi {
		fn post_form<'a>(
			&'a self,
			_url: &'a Url,
			_form: &'a [(&'a str, &'a str)],
		) -> HttpFuture<'a> {
			Box::pin(async move { Err("Profile tests never exchange codes.".into()) })
		}

		fn get_json<'a>(&'a self, url: &'a Url, _bearer: &'a str) -> HttpFuture<'a> {
			let canned = if url.path().ends_with("/emails") { &self.emails } else { &self.user };
			let canned = canned.clone();

			Box::pin(async move { canned.ok_or_else(|| "connection refused".into()) })
		}
	}

	fn user_body() -> HttpResponse {
		HttpResponse::new(
			200,
			"{\"id\":42,\"login\":\"octo\",\"name\":null,\"avatar_url\":\"https://a/1\",\"html_url\":\"https://github.com/octo\",\"site_admin\":false}",
		)
	}

	fn emails_body() -> HttpResponse {
		HttpResponse::new(
			200,
			"[{\"email\":\"o@x\",\"primary\":false,\"verified\":true,\"visibility\":null},\
			  {\"email\":\"p@x\",\"primary\":true,\"verified\":true,\"visibility\":\"private\"}]",
		)
	}

	async fn fetch(user: Option<HttpResponse>, emails: Option<HttpResponse>) -> Result<GithubProfile> {
		let endpoints = GithubEndpoints::github().expect("GitHub endpoints should parse.");

		get_profile(&CannedApi { user, emails }, &endpoints, &AccessToken::new("tok123")).await
	}

	#[tokio::test]
	async fn parses_both_resources() {
		let profile =
			fetch(Some(user_body()), Some(emails_body())).await.expect("Profile should load.");

		assert_eq!(profile.user.id, 42);
		assert_eq!(profile.user.login, "octo");
		assert_eq!(profile.user.name, None);
		assert_eq!(profile.emails.len(), 2);
		assert_eq!(profile.primary_verified_email(), Some("p@x"));
	}

	#[tokio::test]
	async fn user_failure_takes_precedence() {
		let err = fetch(Some(HttpResponse::new(404, "{}")), Some(HttpResponse::new(500, "{}")))
			.await
			.expect_err("Failed user requests must fail.");

		assert_eq!(err.kind(), ErrorKind::ProfileFetchFailed);
		assert_eq!(err.to_string(), "GitHub user endpoint returned 404");
		assert_eq!(err.upstream_status(), Some(404));

		let err = fetch(None, None).await.expect_err("Transport failures must fail.");

		assert_eq!(err.kind(), ErrorKind::ProfileFetchFailed);
		assert!(StdError::source(&err).is_some());
	}

	#[tokio::test]
	async fn emails_failure_is_reported_separately() {
		let err = fetch(Some(user_body()), Some(HttpResponse::new(500, "oops")))
			.await
			.expect_err("Failed email requests must fail.");

		assert_eq!(err.kind(), ErrorKind::EmailsFetchFailed);
		assert_eq!(err.to_string(), "GitHub emails endpoint returned 500");
	}

	#[tokio::test]
	async fn malformed_bodies_map_to_their_resource() {
		let err = fetch(Some(HttpResponse::new(200, "{\"login\":\"octo\"}")), Some(emails_body()))
			.await
			.expect_err("Users without ids must fail.");

		assert_eq!(err.kind(), ErrorKind::ProfileFetchFailed);

		let err = fetch(Some(user_body()), Some(HttpResponse::new(200, "{}")))
			.await
			.expect_err("Non-array email bodies must fail.");

		assert_eq!(err.kind(), ErrorKind::EmailsFetchFailed);
	}

	#[test]
	fn primary_email_requires_verification() {
		let emails = vec![GithubEmail {
			email: "p@x".into(),
			primary: true,
			verified: false,
			visibility: None,
		}];

		assert_eq!(primary_verified_email(&emails), None);
	}
}
