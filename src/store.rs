//! CSRF state persistence contracts and the built-in in-memory store.
//!
//! The sign-in flow itself is stateless: the only value that must survive the redirect is the
//! `state` token. A [`StateStore`] is whatever the caller scopes to one user-agent session (a
//! signed cookie jar, a session row, a cache entry), expressed as set/get/delete with expiry.

pub mod memory;

pub use memory::MemoryStateStore;

// self
use crate::_prelude::*;

/// Key the flows use for the pending CSRF state.
pub const STATE_KEY: &str = "gh_oauth_state";

/// How long a pending state stays valid unless the caller chooses otherwise.
pub const DEFAULT_STATE_TTL: Duration = Duration::minutes(10);

/// Boxed future returned by [`StateStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Session-scoped key/value capability holding pending CSRF state.
pub trait StateStore
where
	Self: Send + Sync,
{
	/// Stores `value` under `key`, replacing any previous value, for at most `ttl`.
	fn set<'a>(&'a self, key: &'a str, value: &'a str, ttl: Duration) -> StoreFuture<'a, ()>;

	/// Fetches the unexpired value stored under `key`, if any.
	fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<String>>;

	/// Removes `key`; removing an absent key succeeds.
	fn delete<'a>(&'a self, key: &'a str) -> StoreFuture<'a, ()>;

	/// Removes `key` only if it holds the unexpired value `expected`, as one atomic step.
	///
	/// Returns whether this call removed it. When concurrent callers race on the same value,
	/// at most one of them may observe `true`.
	fn take_if<'a>(&'a self, key: &'a str, expected: &'a str) -> StoreFuture<'a, bool>;
}

/// Error type produced by [`StateStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Encoding or signing failure (e.g. a tampered cookie).
	#[error("Serialization error: {message}")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn default_ttl_is_ten_minutes() {
		assert_eq!(DEFAULT_STATE_TTL.whole_seconds(), 600);
	}

	#[test]
	fn store_error_can_be_serialized() {
		let payload = serde_json::to_string(&StoreError::Backend { message: "down".into() })
			.expect("StoreError should serialize to JSON.");

		assert_eq!(payload, "{\"Backend\":{\"message\":\"down\"}}");
	}
}
