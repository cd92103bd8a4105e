// self
use crate::obs::{FlowKind, FlowOutcome};

/// Counter incremented once per flow attempt, success, and failure.
pub const FLOW_COUNTER: &str = "gh_apple_oauth_flow_total";

/// Records a flow outcome via the global metrics recorder (when enabled).
///
/// Failures carry an extra `error` label holding the machine-readable
/// [`ErrorKind`](crate::error::ErrorKind) code, so denials and forged states can be told apart
/// from upstream outages.
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		match outcome.error() {
			Some(error) => metrics::counter!(
				FLOW_COUNTER,
				"flow" => kind.as_str(),
				"outcome" => outcome.as_str(),
				"error" => error.as_str()
			)
			.increment(1),
			None => metrics::counter!(
				FLOW_COUNTER,
				"flow" => kind.as_str(),
				"outcome" => outcome.as_str()
			)
			.increment(1),
		}
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::ErrorKind;

	#[test]
	fn failures_are_recorded_without_a_recorder() {
		record_flow_outcome(FlowKind::Callback, FlowOutcome::Attempt);
		record_flow_outcome(FlowKind::Callback, FlowOutcome::Failure(ErrorKind::InvalidState));
	}
}
