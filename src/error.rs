//! Crate-level error types shared across the repository, stores, and validator.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// The record executor failed while enabling or deleting the referenced record.
	#[error(transparent)]
	Action(#[from] crate::ext::ActionError),

	/// No live auth code could be resolved and the code was not optional.
	#[error("The submitted auth code is invalid or expired.")]
	InvalidAuthCode,
}

/// Configuration and validation failures raised while generating auth codes.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Record code requested for a table without a resolvable hidden/disabled column.
	#[error(
		"Hidden field is not set for table `{table}` and no disabled column is configured for it."
	)]
	MissingHiddenField {
		/// Table the code was requested for.
		table: String,
	},
	/// Expiry expression does not parse or does not resolve to a future instant.
	#[error("Invalid auth code expiry time `{expression}`: {reason}.")]
	InvalidExpiry {
		/// Expression as configured.
		expression: String,
		/// Why the expression was rejected.
		reason: String,
	},
	/// Table, field, or identifier value failed validation.
	#[error(transparent)]
	InvalidIdentifier(#[from] crate::auth::IdentifierError),
}
impl ConfigError {
	/// Builds an [`ConfigError::InvalidExpiry`] for the provided expression.
	pub fn invalid_expiry(expression: impl Into<String>, reason: impl Into<String>) -> Self {
		Self::InvalidExpiry { expression: expression.into(), reason: reason.into() }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{ext::ActionError, store::StoreError};

	#[test]
	fn store_error_converts_with_source() {
		let store_error = StoreError::Backend { message: "database unreachable".into() };
		let error: Error = store_error.clone().into();

		assert!(matches!(error, Error::Storage(_)));
		assert!(error.to_string().contains("database unreachable"));

		let source =
			StdError::source(&error).expect("Error should expose the original store error.");

		assert_eq!(source.to_string(), store_error.to_string());
	}

	#[test]
	fn config_and_action_errors_are_transparent() {
		let error: Error = ConfigError::MissingHiddenField { table: "pages".into() }.into();

		assert!(error.to_string().contains("`pages`"));

		let error: Error = ActionError::RecordNotFound { table: "pages".into(), uid: 7 }.into();

		assert!(matches!(error, Error::Action(ActionError::RecordNotFound { uid: 7, .. })));
		assert!(error.to_string().contains("pages"));
	}
}
