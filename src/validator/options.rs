//! Validator behavior switches, deserializable from host configuration.

// self
use crate::{_prelude::*, repository::DEFAULT_PARAMETER_NAME};

/// Behavior switches for [`Validator`](crate::validator::Validator).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorOptions {
	/// Treat a missing or unknown code as "nothing to do" instead of an error.
	pub token_is_optional: bool,
	/// Ask the executor for a hard delete when a delete-record code is redeemed.
	pub force_record_deletion: bool,
	/// Consume the code (and its associated codes) once it has been redeemed.
	pub invalidate_after_access: bool,
	/// Ask the executor to touch the record timestamp when enabling it.
	pub update_timestamp_on_activation: bool,
	/// Request parameter carrying the code.
	pub parameter_name: String,
	/// Namespace the parameter is nested under (`prefix[name]`).
	pub parameter_prefix: Option<String>,
}
impl ValidatorOptions {
	/// Overrides [`Self::token_is_optional`].
	pub fn with_token_is_optional(mut self, optional: bool) -> Self {
		self.token_is_optional = optional;

		self
	}

	/// Overrides [`Self::force_record_deletion`].
	pub fn with_force_record_deletion(mut self, force: bool) -> Self {
		self.force_record_deletion = force;

		self
	}

	/// Overrides [`Self::invalidate_after_access`].
	pub fn with_invalidate_after_access(mut self, invalidate: bool) -> Self {
		self.invalidate_after_access = invalidate;

		self
	}

	/// Overrides [`Self::update_timestamp_on_activation`].
	pub fn with_update_timestamp_on_activation(mut self, touch: bool) -> Self {
		self.update_timestamp_on_activation = touch;

		self
	}

	/// Reads the code from `name` instead of `authCode`.
	pub fn with_parameter_name(mut self, name: impl Into<String>) -> Self {
		self.parameter_name = name.into();

		self
	}

	/// Nests the parameter under `prefix`.
	pub fn with_parameter_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.parameter_prefix = Some(prefix.into());

		self
	}
}
impl Default for ValidatorOptions {
	fn default() -> Self {
		Self {
			token_is_optional: false,
			force_record_deletion: false,
			invalidate_after_access: true,
			update_timestamp_on_activation: true,
			parameter_name: DEFAULT_PARAMETER_NAME.into(),
			parameter_prefix: None,
		}
	}
}
