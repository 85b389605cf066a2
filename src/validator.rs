//! Validate-and-execute flow for submitted auth codes.
//!
//! A submission moves through resolution (request parameter, session, or a caller-supplied
//! code), dispatch of the record action to the [`ActionExecutor`], and finally either
//! invalidation or hand-off to the session so later requests can reuse the code. Concurrent
//! submissions of the same code within one process are serialized by a per-code guard held
//! from resolution through invalidation, so only the first of them observes the code.

pub mod options;

pub use options::*;

// self
use crate::{
	_prelude::*,
	auth::{AuthCode, AuthCodeTarget, RecordAction},
	ext::{ActionExecutor, RequestParamSource, SessionBridge},
	obs::{self, CodeOperation, OperationOutcome, OperationSpan},
	repository::{AuthCodeRepository, lookup::read_submitted},
};

/// What the caller hands to [`Validator::validate_and_execute`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SubmittedCode {
	/// Read the code from the request, falling back to the session.
	#[default]
	Absent,
	/// Resolve this raw code value.
	Code(String),
	/// Redeem an already resolved code without another lookup.
	Resolved(AuthCode),
}
impl From<String> for SubmittedCode {
	fn from(value: String) -> Self {
		Self::Code(value)
	}
}
impl From<&str> for SubmittedCode {
	fn from(value: &str) -> Self {
		Self::Code(value.to_owned())
	}
}
impl From<AuthCode> for SubmittedCode {
	fn from(value: AuthCode) -> Self {
		Self::Resolved(value)
	}
}
impl From<Option<AuthCode>> for SubmittedCode {
	fn from(value: Option<AuthCode>) -> Self {
		value.map_or(Self::Absent, Self::Resolved)
	}
}

/// Redeems auth codes: resolves them, runs their action, and consumes them.
#[derive(Clone)]
pub struct Validator {
	/// Repository resolving and clearing codes.
	pub repository: AuthCodeRepository,
	/// Performs record mutations for record codes.
	pub executor: Arc<dyn ActionExecutor>,
	/// Session remembering a code across requests.
	pub session: Arc<dyn SessionBridge>,
	/// Inbound request parameters.
	pub params: Arc<dyn RequestParamSource>,
	options: ValidatorOptions,
}
impl Validator {
	/// Creates a validator with default options.
	pub fn new(
		repository: AuthCodeRepository,
		executor: Arc<dyn ActionExecutor>,
		session: Arc<dyn SessionBridge>,
		params: Arc<dyn RequestParamSource>,
	) -> Self {
		Self { repository, executor, session, params, options: ValidatorOptions::default() }
	}

	/// Replaces the options.
	pub fn with_options(mut self, options: ValidatorOptions) -> Self {
		self.options = options;

		self
	}

	/// Active options.
	pub fn options(&self) -> &ValidatorOptions {
		&self.options
	}

	/// Resolves the submitted code, performs its action, and consumes or remembers it.
	///
	/// Returns `Ok(None)` when nothing resolves and the code is optional, and
	/// [`Error::InvalidAuthCode`] when it is not. Executor and storage failures propagate
	/// unchanged; the code stays valid when the action fails.
	pub async fn validate_and_execute(
		&self,
		submitted: impl Into<SubmittedCode>,
	) -> Result<Option<AuthCode>> {
		const OPERATION: CodeOperation = CodeOperation::Validate;

		let submitted = submitted.into();
		let span = OperationSpan::new(OPERATION, "validate_and_execute");

		obs::record_operation_outcome(OPERATION, OperationOutcome::Attempt);

		let result = span
			.instrument(async move {
				let Some(key) = self.guard_key(&submitted) else {
					return self.reject();
				};
				let guard = self.repository.guards.acquire(&key);
				let _singleflight = guard.lock().await;

				self.redeem(submitted, &key).await
			})
			.await;

		obs::record_operation_outcome(OPERATION, OperationOutcome::of(&result));

		result
	}

	/// Forgets the session code and removes `code` together with every associated code.
	pub async fn invalidate(&self, code: &AuthCode) -> Result<usize> {
		const OPERATION: CodeOperation = CodeOperation::Invalidate;

		let span = OperationSpan::new(OPERATION, "invalidate");

		obs::record_operation_outcome(OPERATION, OperationOutcome::Attempt);

		let result = span
			.instrument(async move {
				self.session.clear();

				self.repository.clear_associated(code).await
			})
			.await;

		obs::record_operation_outcome(OPERATION, OperationOutcome::of(&result));

		result
	}

	fn guard_key(&self, submitted: &SubmittedCode) -> Option<String> {
		match submitted {
			SubmittedCode::Absent => read_submitted(
				self.params.as_ref(),
				self.session.as_ref(),
				&self.options.parameter_name,
				self.options.parameter_prefix.as_deref(),
			),
			SubmittedCode::Code(raw) => {
				let raw = raw.trim();

				(!raw.is_empty()).then(|| raw.to_owned())
			},
			SubmittedCode::Resolved(code) => Some(code.code.expose().to_owned()),
		}
	}

	async fn redeem(&self, submitted: SubmittedCode, key: &str) -> Result<Option<AuthCode>> {
		let code = match submitted {
			SubmittedCode::Resolved(code) => Some(code),
			SubmittedCode::Absent | SubmittedCode::Code(_) => self.repository.find_by_code(key).await?,
		};
		let Some(code) = code else {
			return self.reject();
		};

		self.dispatch(&code).await?;

		if self.options.invalidate_after_access {
			self.invalidate(&code).await?;
		} else {
			self.session.set(code.code.expose());
		}

		Ok(Some(code))
	}

	async fn dispatch(&self, code: &AuthCode) -> Result<()> {
		obs::note_dispatch(code.code_type().as_str(), code.action().as_str());

		match &code.target {
			AuthCodeTarget::Independent(_) => {},
			AuthCodeTarget::Record { action: RecordAction::EnableRecord, .. } =>
				self.executor.enable(code, self.options.update_timestamp_on_activation).await?,
			AuthCodeTarget::Record { action: RecordAction::DeleteRecord, .. } =>
				self.executor.delete(code, self.options.force_record_deletion).await?,
			AuthCodeTarget::Record { action: RecordAction::AccessPage, .. } => {},
		}

		Ok(())
	}

	fn reject(&self) -> Result<Option<AuthCode>> {
		if self.options.token_is_optional { Ok(None) } else { Err(Error::InvalidAuthCode) }
	}
}
impl Debug for Validator {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Validator")
			.field("repository", &self.repository)
			.field("options", &self.options)
			.finish()
	}
}
