//! Sign in with Apple through GitHub's Apple bridge: CSRF state, the two-hop authorize URL,
//! callback validation, the code-for-token exchange, and a concurrent profile fetch, while the
//! relying application only ever speaks the standard GitHub OAuth protocol.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod callback;
pub mod config;
pub mod error;
pub mod flows;
pub mod http;
pub mod obs;
pub mod provider;
pub mod store;

pub use callback::CallbackQuery;
pub use config::Config;
pub use error::{Error, ErrorKind, Result};
pub use flows::{AuthResult, AuthUrlResult, GhAppleOAuth, GithubEmail, GithubProfile, GithubUser};
#[cfg(feature = "reqwest")] pub use flows::ReqwestGhAppleOAuth;

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{BoxError, Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
