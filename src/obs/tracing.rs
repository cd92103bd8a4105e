// self
use crate::{_prelude::*, obs::FlowKind};

/// Span around one flow invocation.
///
/// Opened with the `flow` and `stage` fields; `error` (an
/// [`ErrorKind`](crate::error::ErrorKind) code) and `upstream_status` stay empty until
/// [`record_failure`](Self::record_failure) fills them. Codes, tokens, secrets, and state
/// values are never attached.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FlowSpan {
	/// Opens a span for `stage` of the `kind` flow.
	pub fn new(kind: FlowKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"gh_apple_oauth.flow",
				flow = kind.as_str(),
				stage,
				error = tracing::field::Empty,
				upstream_status = tracing::field::Empty,
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Enters the span for synchronous sections.
	pub fn entered(self) -> FlowSpanGuard {
		#[cfg(feature = "tracing")]
		{
			FlowSpanGuard { _guard: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			FlowSpanGuard {}
		}
	}

	/// Runs `fut` inside the span without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> impl Future<Output = Fut::Output>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}

	/// Attaches the failure's kind and, for provider responses, its HTTP status.
	pub fn record_failure(&self, err: &Error) {
		#[cfg(feature = "tracing")]
		{
			self.span.record("error", err.code());

			if let Some(status) = err.upstream_status() {
				self.span.record("upstream_status", status);
			}
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = err;
		}
	}
}

/// Guard returned by [`FlowSpan::entered`]; the span closes when it drops.
pub struct FlowSpanGuard {
	#[cfg(feature = "tracing")]
	_guard: tracing::span::EnteredSpan,
}
impl Debug for FlowSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("FlowSpanGuard(..)")
	}
}
