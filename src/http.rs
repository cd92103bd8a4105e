//! Transport seam for the token exchange and the profile fetch.
//!
//! [`GithubHttpClient`] is the crate's only dependency on an HTTP stack. It hands back the raw
//! status and body so the flows can apply GitHub's quirks themselves: the token endpoint answers
//! `200 OK` with an error payload, which a generic OAuth client would misreport.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
#[cfg(feature = "reqwest")]
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::de::DeserializeOwned;
// self
use crate::_prelude::*;

/// `User-Agent` sent with every request; GitHub's REST API rejects requests without one.
pub const DEFAULT_USER_AGENT: &str = concat!("gh-apple-oauth/", env!("CARGO_PKG_VERSION"));

/// Boxed future returned by [`GithubHttpClient`] calls.
pub type HttpFuture<'a> = Pin<Box<dyn Future<Output = Result<HttpResponse, BoxError>> + 'a + Send>>;

/// Status and body of a completed request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
	/// HTTP status code.
	pub status: u16,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl HttpResponse {
	/// Creates a response from its parts.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status, body: body.into() }
	}

	/// True for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// HTTP transport used by the flows.
///
/// Implementations must be `Send + Sync + 'static` so one client can be shared across
/// concurrent sign-ins, and the returned futures must be `Send`. A transport error means no
/// response arrived at all; non-2xx responses are returned as [`HttpResponse`] values.
pub trait GithubHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Sends a form-encoded `POST` with `Accept: application/json`.
	fn post_form<'a>(&'a self, url: &'a Url, form: &'a [(&'a str, &'a str)]) -> HttpFuture<'a>;

	/// Sends a bearer-authenticated `GET` with `Accept: application/vnd.github+json`.
	fn get_json<'a>(&'a self, url: &'a Url, bearer: &'a str) -> HttpFuture<'a>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl GithubHttpClient for ReqwestHttpClient {
	fn post_form<'a>(&'a self, url: &'a Url, form: &'a [(&'a str, &'a str)]) -> HttpFuture<'a> {
		Box::pin(async move {
			let response = self
				.0
				.post(url.clone())
				.header(ACCEPT, "application/json")
				.header(USER_AGENT, DEFAULT_USER_AGENT)
				.form(form)
				.send()
				.await?;

			read_response(response).await
		})
	}

	fn get_json<'a>(&'a self, url: &'a Url, bearer: &'a str) -> HttpFuture<'a> {
		Box::pin(async move {
			let response = self
				.0
				.get(url.clone())
				.header(ACCEPT, "application/vnd.github+json")
				.header(USER_AGENT, DEFAULT_USER_AGENT)
				.bearer_auth(bearer)
				.send()
				.await?;

			read_response(response).await
		})
	}
}

#[cfg(feature = "reqwest")]
async fn read_response(response: reqwest::Response) -> Result<HttpResponse, BoxError> {
	let status = response.status().as_u16();
	let body = response.bytes().await?.to_vec();

	Ok(HttpResponse { status, body })
}

/// Parses a JSON body, reporting the path of the first offending field.
pub(crate) fn parse_json<T>(
	body: &[u8],
) -> Result<T, serde_path_to_error::Error<serde_json::Error>>
where
	T: DeserializeOwned,
{
	let deserializer = &mut serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(deserializer)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[derive(Debug, Deserialize)]
	struct Sample {
		#[allow(dead_code)]
		id: u64,
	}

	#[test]
	fn success_covers_the_2xx_range() {
		assert!(HttpResponse::new(200, "{}").is_success());
		assert!(HttpResponse::new(204, Vec::new()).is_success());
		assert!(!HttpResponse::new(301, Vec::new()).is_success());
		assert!(!HttpResponse::new(404, "{}").is_success());
	}

	#[test]
	fn parse_errors_name_the_field() {
		let err = parse_json::<Sample>(b"{\"id\":\"nope\"}")
			.expect_err("String ids must be rejected.");

		assert_eq!(err.path().to_string(), "id");
	}
}
