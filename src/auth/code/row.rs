//! Flat persisted layout of an auth code, one row per code.

// self
use crate::{
	_prelude::*,
	auth::{
		AuthCode, AuthCodeAction, AuthCodeTarget, AuthCodeType, CodeSecret, FieldName,
		IdentifierError, IndependentTarget, RecordReference, TableName,
	},
};

/// Errors raised when a persisted row does not describe a valid [`AuthCode`].
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum RowError {
	/// A record row lacks one of its reference columns.
	#[error("Record row is missing `{column}`.")]
	MissingColumn {
		/// Column that was empty.
		column: &'static str,
	},
	/// A reference column holds an invalid table or field name.
	#[error(transparent)]
	InvalidName(#[from] IdentifierError),
}

/// Storage row mirroring the logical persisted layout of an auth code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthCodeRow {
	/// Unique bearer secret.
	pub code: String,
	/// Code classification.
	#[serde(rename = "type")]
	pub code_type: AuthCodeType,
	/// Action label; `access_page` for independent rows.
	pub action: AuthCodeAction,
	/// Identifier of independent rows, empty otherwise.
	#[serde(default)]
	pub identifier: String,
	/// Context of independent rows, empty otherwise.
	#[serde(default)]
	pub identifier_context: String,
	/// Referenced table of record rows, empty otherwise.
	#[serde(default)]
	pub reference_table: String,
	/// Referenced uid of record rows, zero otherwise.
	#[serde(default)]
	pub reference_table_uid: u64,
	/// Uid column of record rows, empty otherwise.
	#[serde(default)]
	pub reference_table_uid_field: String,
	/// Hidden column of record rows, empty otherwise.
	#[serde(default)]
	pub reference_table_hidden_field: String,
	/// Expiry instant.
	#[serde(with = "time::serde::rfc3339")]
	pub valid_until: OffsetDateTime,
}
impl From<&AuthCode> for AuthCodeRow {
	fn from(value: &AuthCode) -> Self {
		let mut row = AuthCodeRow {
			code: value.code.expose().to_owned(),
			code_type: value.code_type(),
			action: value.action(),
			identifier: String::new(),
			identifier_context: String::new(),
			reference_table: String::new(),
			reference_table_uid: 0,
			reference_table_uid_field: String::new(),
			reference_table_hidden_field: String::new(),
			valid_until: value.valid_until,
		};

		match &value.target {
			AuthCodeTarget::Independent(target) => {
				row.identifier = target.identifier.clone();
				row.identifier_context = target.context.clone();
			},
			AuthCodeTarget::Record { reference, .. } => {
				row.reference_table = reference.table.to_string();
				row.reference_table_uid = reference.uid;
				row.reference_table_uid_field = reference.uid_field.to_string();
				row.reference_table_hidden_field = reference.hidden_field.to_string();
			},
		}

		row
	}
}
impl TryFrom<AuthCodeRow> for AuthCode {
	type Error = RowError;

	fn try_from(row: AuthCodeRow) -> Result<Self, Self::Error> {
		let target = match row.code_type {
			AuthCodeType::Independent => AuthCodeTarget::Independent(IndependentTarget {
				identifier: row.identifier,
				context: row.identifier_context,
			}),
			AuthCodeType::Record => {
				let reference = RecordReference {
					table: TableName::new(required("reference_table", &row.reference_table)?)?,
					uid: row.reference_table_uid,
					uid_field: FieldName::new(required(
						"reference_table_uid_field",
						&row.reference_table_uid_field,
					)?)?,
					hidden_field: FieldName::new(required(
						"reference_table_hidden_field",
						&row.reference_table_hidden_field,
					)?)?,
				};

				AuthCodeTarget::Record { reference, action: row.action.into() }
			},
		};

		Ok(AuthCode { code: CodeSecret::new(row.code), target, valid_until: row.valid_until })
	}
}

fn required<'a>(column: &'static str, value: &'a str) -> Result<&'a str, RowError> {
	if value.is_empty() {
		return Err(RowError::MissingColumn { column });
	}

	Ok(value)
}
