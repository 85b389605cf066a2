//! Optional observability helpers for auth-code operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` (default) to emit structured spans named `authcode.operation` with the
//!   `operation` and `stage` (call site) fields, plus debug/warn events for purges, dispatch
//!   decisions, and failed expiry sweeps. Code values are never recorded.
//! - Enable `metrics` to increment the `authcode_operation_total` counter for every
//!   attempt/success/failure, labeled by `operation` + `outcome`.

mod counter;
mod span;

pub use counter::*;
pub use span::*;

// self
use crate::_prelude::*;

/// Auth-code operations observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CodeOperation {
	/// Independent or record code generation.
	Generate,
	/// Lookup of a submitted code.
	Lookup,
	/// Removal of expired codes.
	Sweep,
	/// Validate-and-execute flow.
	Validate,
	/// Explicit invalidation of a code and its associated codes.
	Invalidate,
}
impl CodeOperation {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CodeOperation::Generate => "generate",
			CodeOperation::Lookup => "lookup",
			CodeOperation::Sweep => "sweep",
			CodeOperation::Validate => "validate",
			CodeOperation::Invalidate => "invalidate",
		}
	}
}
impl Display for CodeOperation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Entry to an operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::Success => "success",
			OperationOutcome::Failure => "failure",
		}
	}

	/// Maps a result onto its success/failure label.
	pub fn of<T, E>(result: &Result<T, E>) -> Self {
		if result.is_ok() { OperationOutcome::Success } else { OperationOutcome::Failure }
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
