//! Lookup, expiry sweeps, and clearing of associated codes.

// self
use crate::{
	_prelude::*,
	auth::{AuthCode, CodeAssociation, RecordReference},
	ext::{RequestParamSource, SessionBridge},
	obs::{self, CodeOperation, OperationOutcome, OperationSpan},
	repository::AuthCodeRepository,
	store::StoreError,
};

/// Request parameter carrying the auth code unless configured otherwise.
pub const DEFAULT_PARAMETER_NAME: &str = "authCode";

impl AuthCodeRepository {
	/// Resolves a live code by value.
	///
	/// Blank values resolve to nothing. When `auto_delete_expired` is set, expired codes are
	/// swept first; a failed sweep is logged and the lookup proceeds.
	pub async fn find_by_code(&self, code: &str) -> Result<Option<AuthCode>> {
		const OPERATION: CodeOperation = CodeOperation::Lookup;

		let span = OperationSpan::new(OPERATION, "find_by_code");

		obs::record_operation_outcome(OPERATION, OperationOutcome::Attempt);

		let result = span
			.instrument(async move {
				let code = code.trim();

				if code.is_empty() {
					return Ok(None);
				}
				if self.settings().auto_delete_expired
					&& let Err(e) = self.sweep().await
				{
					obs::note_sweep_failure(&e);
				}

				Ok(self.store.fetch(code, self.clock.now()).await?)
			})
			.await;

		obs::record_operation_outcome(OPERATION, OperationOutcome::of(&result));

		result
	}

	/// Reads the submitted code from the request (first) or the session (second) and resolves it.
	///
	/// The request parameter `name` is read under `prefix` when one is given; the session is
	/// only consulted when the parameter is absent or blank.
	pub async fn submitted_code(
		&self,
		params: &dyn RequestParamSource,
		session: &dyn SessionBridge,
		name: &str,
		prefix: Option<&str>,
	) -> Result<Option<AuthCode>> {
		match read_submitted(params, session, name, prefix) {
			Some(code) => self.find_by_code(&code).await,
			None => Ok(None),
		}
	}

	/// Removes every code whose `valid_until` lies in the past, returning how many went away.
	pub async fn delete_expired(&self) -> Result<usize> {
		const OPERATION: CodeOperation = CodeOperation::Sweep;

		let span = OperationSpan::new(OPERATION, "delete_expired");

		obs::record_operation_outcome(OPERATION, OperationOutcome::Attempt);

		let result = span.instrument(async move { Ok(self.sweep().await?) }).await;

		obs::record_operation_outcome(OPERATION, OperationOutcome::of(&result));

		result
	}

	/// Removes every code sharing the identity or record reference of `code`.
	pub async fn clear_associated(&self, code: &AuthCode) -> Result<usize> {
		self.clear(&code.association()).await
	}

	/// Removes every independent code for exactly this identifier and context.
	pub async fn clear_independent(&self, identifier: &str, context: &str) -> Result<usize> {
		let association = CodeAssociation::Independent {
			identifier: identifier.to_owned(),
			context: context.to_owned(),
		};

		self.clear(&association).await
	}

	/// Removes every record code for exactly this table, uid, uid field, and hidden field.
	pub async fn clear_record(&self, reference: &RecordReference) -> Result<usize> {
		self.clear(&CodeAssociation::Record(reference.clone())).await
	}

	/// Persists a code as-is.
	pub async fn insert(&self, code: AuthCode) -> Result<()> {
		Ok(self.store.insert(code).await?)
	}

	pub(crate) async fn clear(&self, association: &CodeAssociation) -> Result<usize> {
		let removed = self.store.delete_matching(association).await?;

		obs::note_purged(CodeOperation::Invalidate, removed);

		Ok(removed)
	}

	async fn sweep(&self) -> Result<usize, StoreError> {
		let removed = self.store.delete_expired(self.clock.now()).await?;

		obs::note_purged(CodeOperation::Sweep, removed);

		Ok(removed)
	}
}

/// Raw submitted code: the trimmed request parameter, else the trimmed session value.
pub(crate) fn read_submitted(
	params: &dyn RequestParamSource,
	session: &dyn SessionBridge,
	name: &str,
	prefix: Option<&str>,
) -> Option<String> {
	non_blank(params.get(name, prefix)).or_else(|| non_blank(session.get()))
}

fn non_blank(value: Option<String>) -> Option<String> {
	value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}
