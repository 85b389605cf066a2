//! Code generation for independent and record auth codes.
//!
//! A code is a 16-byte random value rendered as hex, followed by the SHA-256 hex digest of
//! the code's serialized target and expiry plus that random value. The random prefix is what
//! makes a code unguessable; the digest only spreads the code's own state into the value.
//! Every generation clears the codes already bound to the same identity or record first, so
//! at most one live code exists per association.

// crates.io
use sha2::{Digest, Sha256};
// self
use crate::{
	_prelude::*,
	auth::{
		AuthCode, AuthCodeTarget, CodeSecret, FieldName, IdentifierError, IndependentTarget,
		RecordAction, RecordReference, TableName,
	},
	error::ConfigError,
	obs::{self, CodeOperation, OperationOutcome, OperationSpan},
	repository::AuthCodeRepository,
	store::StoreError,
};

const RANDOM_BYTES: usize = 16;

/// Parameters for [`AuthCodeRepository::generate_record`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordCodeRequest {
	/// Table holding the record.
	pub table: String,
	/// Uid of the record.
	pub uid: u64,
	/// Action performed when the code is redeemed.
	pub action: RecordAction,
	/// Hidden column override; the schema lookup is used when absent or blank.
	pub hidden_field: Option<String>,
	/// Uid column override; `uid` when absent or blank.
	pub uid_field: Option<String>,
}
impl RecordCodeRequest {
	/// Creates a request for `action` on record `uid` of `table`.
	pub fn new(table: impl Into<String>, uid: u64, action: RecordAction) -> Self {
		Self { table: table.into(), uid, action, hidden_field: None, uid_field: None }
	}

	/// Uses `field` as hidden column instead of the schema's disabled column.
	pub fn with_hidden_field(mut self, field: impl Into<String>) -> Self {
		self.hidden_field = Some(field.into());

		self
	}

	/// Matches the record on `field` instead of `uid`.
	pub fn with_uid_field(mut self, field: impl Into<String>) -> Self {
		self.uid_field = Some(field.into());

		self
	}
}

impl AuthCodeRepository {
	/// Issues a code scoped to `identifier` within `context`, replacing earlier codes for the pair.
	pub async fn generate_independent(
		&self,
		identifier: impl Into<String>,
		context: impl Into<String>,
	) -> Result<AuthCode> {
		let identifier = identifier.into();

		if identifier.trim().is_empty() {
			return Err(ConfigError::from(IdentifierError::Empty { kind: "Identifier" }).into());
		}

		let target =
			AuthCodeTarget::Independent(IndependentTarget { identifier, context: context.into() });

		self.issue(target, "generate_independent").await
	}

	/// Issues a code acting on one record, replacing earlier codes for the same reference.
	///
	/// Fails with [`ConfigError::MissingHiddenField`] when the request carries no hidden field
	/// and the schema has no disabled column for the table.
	pub async fn generate_record(&self, request: RecordCodeRequest) -> Result<AuthCode> {
		let reference = self.resolve_reference(&request)?;
		let target = AuthCodeTarget::Record { reference, action: request.action };

		self.issue(target, "generate_record").await
	}

	fn resolve_reference(&self, request: &RecordCodeRequest) -> Result<RecordReference, ConfigError> {
		let table = TableName::new(request.table.trim())?;
		let hidden_field = match non_blank(request.hidden_field.as_deref()) {
			Some(field) => field.to_owned(),
			None => self
				.schema
				.disabled_column_for(&table)
				.filter(|column| !column.trim().is_empty())
				.ok_or_else(|| ConfigError::MissingHiddenField { table: table.to_string() })?,
		};
		let uid_field = match non_blank(request.uid_field.as_deref()) {
			Some(field) => FieldName::new(field)?,
			None => FieldName::default_uid(),
		};

		Ok(RecordReference {
			table,
			uid: request.uid,
			uid_field,
			hidden_field: FieldName::new(hidden_field.trim())?,
		})
	}

	async fn issue(&self, target: AuthCodeTarget, stage: &'static str) -> Result<AuthCode> {
		const OPERATION: CodeOperation = CodeOperation::Generate;

		let span = OperationSpan::new(OPERATION, stage);

		obs::record_operation_outcome(OPERATION, OperationOutcome::Attempt);

		let result = span
			.instrument(async move {
				let valid_until = self.settings().expiry.resolve(self.clock.now())?;
				let code = generate_code(&target, valid_until)?;
				let auth_code = AuthCode { code, target, valid_until };

				self.clear(&auth_code.association()).await?;
				self.store.insert(auth_code.clone()).await?;

				Ok(auth_code)
			})
			.await;

		obs::record_operation_outcome(OPERATION, OperationOutcome::of(&result));

		result
	}
}

#[derive(Serialize)]
struct CodeSeed<'a> {
	target: &'a AuthCodeTarget,
	#[serde(with = "time::serde::rfc3339")]
	valid_until: OffsetDateTime,
}

fn generate_code(target: &AuthCodeTarget, valid_until: OffsetDateTime) -> Result<CodeSecret, StoreError> {
	let random: [u8; RANDOM_BYTES] = rand::random();
	let random_hex = hex::encode(random);
	let seed = serde_json::to_vec(&CodeSeed { target, valid_until }).map_err(|e| {
		StoreError::Serialization { message: format!("Failed to serialize auth code seed: {e}") }
	})?;
	let mut hasher = Sha256::new();

	hasher.update(&seed);
	hasher.update(random_hex.as_bytes());

	Ok(CodeSecret::new(format!("{random_hex}{}", hex::encode(hasher.finalize()))))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
	value.map(str::trim).filter(|v| !v.is_empty())
}
