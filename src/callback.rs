//! Inbound callback validation.
//!
//! [`validate`] is a pure decision over the untrusted redirect query and the state the caller
//! saved before redirecting. Its gates run in a fixed order:
//!
//! 1. a provider-reported `error` short-circuits first (the saved state may legitimately be gone
//!    on a denial path),
//! 2. `code` and `state` must both be present,
//! 3. the saved state must exist and equal the returned one byte for byte,
//!
//! and only then is the code handed back. On success the caller must clear the saved state
//! before any further I/O so the code cannot be replayed.

// self
use crate::_prelude::*;

/// Description reported when the provider sends `error` without `error_description`.
pub const DEFAULT_DENIAL_DESCRIPTION: &str = "OAuth denied";

/// Query parameters GitHub appends to the callback URL. All fields are untrusted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackQuery {
	/// Authorization code.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub code: Option<String>,
	/// CSRF state echoed back by the provider.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub state: Option<String>,
	/// Provider error code (e.g. `access_denied`).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
	/// Provider error description.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error_description: Option<String>,
	/// Provider error documentation link.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error_uri: Option<String>,
}
impl CallbackQuery {
	/// Extracts the known parameters from a raw query string (without the leading `?`).
	///
	/// Unknown parameters are ignored; when a parameter repeats, the first occurrence wins.
	pub fn from_query(query: &str) -> Self {
		let mut parsed = Self::default();

		for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
			let slot = match &*key {
				"code" => &mut parsed.code,
				"state" => &mut parsed.state,
				"error" => &mut parsed.error,
				"error_description" => &mut parsed.error_description,
				"error_uri" => &mut parsed.error_uri,
				_ => continue,
			};

			if slot.is_none() {
				*slot = Some(value.into_owned());
			}
		}

		parsed
	}

	/// Extracts the known parameters from a full callback URL.
	pub fn from_url(url: &Url) -> Self {
		Self::from_query(url.query().unwrap_or_default())
	}
}

/// Validates a callback against the saved state and yields the authorization code.
///
/// Empty parameters count as absent, matching how the provider omits them.
pub fn validate(query: &CallbackQuery, saved_state: Option<&str>) -> Result<String> {
	if let Some(error) = present(&query.error) {
		return Err(Error::OAuthDenied {
			error: error.to_owned(),
			description: query
				.error_description
				.clone()
				.unwrap_or_else(|| DEFAULT_DENIAL_DESCRIPTION.to_owned()),
			uri: query.error_uri.clone(),
		});
	}

	let (Some(code), Some(state)) = (present(&query.code), present(&query.state)) else {
		return Err(Error::InvalidCallback);
	};

	match saved_state {
		Some(saved) if !saved.is_empty() && saved == state => Ok(code.to_owned()),
		_ => Err(Error::InvalidState),
	}
}

fn present(value: &Option<String>) -> Option<&str> {
	value.as_deref().filter(|value| !value.is_empty())
}
