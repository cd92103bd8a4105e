//! Optional observability helpers for the sign-in flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `gh_apple_oauth.flow` with the `flow` and
//!   `stage` (call site) fields. Spans never carry codes, tokens, secrets, or state values.
//! - Enable `metrics` to increment the `gh_apple_oauth_flow_total` counter for every
//!   attempt/success/failure, labeled by `flow` + `outcome`, plus `error` on failures.
//!
//! Failed spans get the `error` and `upstream_status` fields, so a `state` mismatch, a denied
//! consent, and a GitHub outage are distinguishable without reading messages.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::{_prelude::*, error::ErrorKind};

/// Flow kinds observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Authorize URL construction.
	Authorize,
	/// Code-for-token exchange.
	TokenExchange,
	/// Concurrent user + emails fetch.
	Profile,
	/// Exchange followed by the profile fetch.
	Authenticate,
	/// Callback validation against the state store, then authentication.
	Callback,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::Authorize => "authorize",
			FlowKind::TokenExchange => "token_exchange",
			FlowKind::Profile => "profile",
			FlowKind::Authenticate => "authenticate",
			FlowKind::Callback => "callback",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a flow.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller, with its kind.
	Failure(ErrorKind),
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure(_) => "failure",
		}
	}

	/// Error kind carried by failures.
	pub const fn error(self) -> Option<ErrorKind> {
		match self {
			FlowOutcome::Failure(kind) => Some(kind),
			_ => None,
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Runs `fut` inside a flow span and records attempt plus success/failure outcomes; failures
/// also tag the span with their kind and upstream status.
pub(crate) async fn observe<T, Fut>(kind: FlowKind, stage: &'static str, fut: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	let span = FlowSpan::new(kind, stage);

	record_flow_outcome(kind, FlowOutcome::Attempt);

	let result = span.instrument(fut).await;

	match &result {
		Ok(_) => record_flow_outcome(kind, FlowOutcome::Success),
		Err(e) => {
			span.record_failure(e);
			record_flow_outcome(kind, FlowOutcome::Failure(e.kind()));
		},
	}

	result
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn observe_passes_results_through() {
		let ok = observe(FlowKind::Profile, "test", async { Ok(7) }).await;
		let err = observe(FlowKind::Profile, "test", async { Err::<(), _>(Error::InvalidState) })
			.await;

		assert_eq!(ok.expect("Successful futures should pass through."), 7);
		assert!(matches!(err, Err(Error::InvalidState)));
	}

	#[test]
	fn labels_are_stable() {
		let failure = FlowOutcome::Failure(ErrorKind::EmailsFetchFailed);

		assert_eq!(FlowKind::TokenExchange.to_string(), "token_exchange");
		assert_eq!(failure.as_str(), "failure");
		assert_eq!(failure.error().map(ErrorKind::as_str), Some("emails_fetch_failed"));
		assert_eq!(FlowOutcome::Success.error(), None);
	}
}
