//! Strongly typed table and column names referenced by record auth codes.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new name after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				validate_view($kind, view)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				validate_view($kind, &value)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

const NAME_MAX_LEN: usize = 64;

/// Error returned when a table, field, or identifier fails validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The value was empty or whitespace.
	#[error("{kind} name cannot be empty.")]
	Empty {
		/// Kind of value (table, field, identifier).
		kind: &'static str,
	},
	/// The value contains whitespace characters.
	#[error("{kind} name contains whitespace.")]
	ContainsWhitespace {
		/// Kind of value (table, field, identifier).
		kind: &'static str,
	},
	/// The value exceeded the allowed character count.
	#[error("{kind} name exceeds {max} characters.")]
	TooLong {
		/// Kind of value (table, field, identifier).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

def_id! { TableName, "Name of the table a record auth code points into.", "Table" }
def_id! { FieldName, "Name of a column on a referenced table (uid or hidden field).", "Field" }

impl FieldName {
	/// Column holding the record uid unless a request overrides it.
	pub fn default_uid() -> Self {
		Self("uid".into())
	}
}

fn validate_view(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if view.len() > NAME_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: NAME_MAX_LEN });
	}

	Ok(())
}
