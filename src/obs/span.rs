// self
use crate::{_prelude::*, obs::CodeOperation};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedOperation<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOperation<F> = F;

/// A span builder used by repository and validator operations.
#[derive(Clone, Debug)]
pub struct OperationSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OperationSpan {
	/// Creates a new span tagged with the provided operation + stage.
	pub fn new(operation: CodeOperation, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::info_span!("authcode.operation", operation = operation.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (operation, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOperation<Fut>
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
}

/// Emits a debug event for codes removed by a sweep or an association clear.
pub(crate) fn note_purged(operation: CodeOperation, removed: usize) {
	#[cfg(feature = "tracing")]
	{
		if removed > 0 {
			tracing::debug!(operation = operation.as_str(), removed, "Purged auth codes.");
		}
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (operation, removed);
	}
}

/// Emits a debug event describing what a redeemed code dispatched to.
pub(crate) fn note_dispatch(code_type: &'static str, action: &'static str) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(code_type, action, "Dispatching auth code action.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (code_type, action);
	}
}

/// Emits a warning for a best-effort expiry sweep that failed and was skipped.
pub(crate) fn note_sweep_failure(error: &dyn StdError) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(error = %error, "Failed to delete expired auth codes; continuing lookup.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = error;
	}
}
