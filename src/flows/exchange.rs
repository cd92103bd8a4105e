//! Authorization-code-for-access-token exchange.
//!
//! GitHub can answer `200 OK` with an error body, so success requires both a 2xx status and a
//! non-empty `access_token`. One attempt only; every failure, transport and parsing included,
//! surfaces as [`ErrorKind::TokenExchangeFailed`](crate::error::ErrorKind::TokenExchangeFailed).

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, ClientSecret},
	flows::GhAppleOAuth,
	http::{self, GithubHttpClient},
	obs::{self, FlowKind},
};

/// Message used when the token endpoint gives no usable reason.
pub const TOKEN_EXCHANGE_FALLBACK_MESSAGE: &str = "Unable to exchange code for access token";

#[derive(Debug, Default, Deserialize)]
struct TokenEndpointResponse {
	#[serde(default)]
	access_token: Option<String>,
	#[serde(default)]
	error: Option<String>,
	#[serde(default)]
	error_description: Option<String>,
}

/// Exchanges `code` at the token endpoint.
///
/// On rejection the message is the provider's `error_description`, else its `error`, else
/// [`TOKEN_EXCHANGE_FALLBACK_MESSAGE`].
pub async fn exchange_code<C>(
	http_client: &C,
	token_endpoint: &Url,
	client_id: &str,
	client_secret: &ClientSecret,
	redirect_uri: &str,
	code: &str,
) -> Result<AccessToken>
where
	C: ?Sized + GithubHttpClient,
{
	let form = [
		("client_id", client_id),
		("client_secret", client_secret.expose()),
		("code", code),
		("redirect_uri", redirect_uri),
	];
	let response =
		http_client.post_form(token_endpoint, &form).await.map_err(|source| {
			Error::TokenExchange {
				message: TOKEN_EXCHANGE_FALLBACK_MESSAGE.into(),
				status: None,
				source: Some(source),
			}
		})?;
	let status = Some(response.status);
	let payload: TokenEndpointResponse =
		http::parse_json(&response.body).map_err(|source| Error::TokenExchange {
			message: TOKEN_EXCHANGE_FALLBACK_MESSAGE.into(),
			status,
			source: Some(Box::new(source)),
		})?;

	match payload.access_token.filter(|token| !token.is_empty()) {
		Some(token) if response.is_success() => Ok(AccessToken::new(token)),
		_ => Err(Error::TokenExchange {
			message: payload
				.error_description
				.or(payload.error)
				.unwrap_or_else(|| TOKEN_EXCHANGE_FALLBACK_MESSAGE.into()),
			status,
			source: None,
		}),
	}
}

impl<C> GhAppleOAuth<C>
where
	C: ?Sized + GithubHttpClient,
{
	/// Exchanges an authorization code for an access token using the stored credentials.
	pub async fn exchange_code(&self, code: &str) -> Result<AccessToken> {
		let config = self.config();

		obs::observe(
			FlowKind::TokenExchange,
			"exchange_code",
			exchange_code(
				self.http_client.as_ref(),
				&config.endpoints.token,
				&config.client_id,
				&config.client_secret,
				&config.redirect_uri,
				code,
			),
		)
		.await
	}
}
