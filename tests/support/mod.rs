//! Shared fixtures for integration tests: repository wiring, a yielding store, and a recording
//! action executor.

#![allow(dead_code)]

// self
use authcode::{
	_preludet::*,
	auth::{AuthCode, AuthCodeTarget, CodeAssociation},
	ext::{ActionError, ActionExecutor, ActionFuture},
	repository::{AuthCodeRepository, RepositorySettings},
	store::{AuthCodeStore, MemoryStore, StoreFuture},
};

/// Repository over an in-memory store and a clock pinned to [`TEST_EPOCH`].
pub struct Harness {
	pub repository: AuthCodeRepository,
	pub store: Arc<MemoryStore>,
	pub clock: Arc<authcode::clock::FixedClock>,
}

pub fn harness() -> Harness {
	let (repository, store, clock) = build_test_repository();

	Harness { repository, store, clock }
}

pub fn harness_with(settings: RepositorySettings) -> Harness {
	let h = harness();
	let repository = AuthCodeRepository::new(
		h.repository.store.clone(),
		h.repository.schema.clone(),
		h.repository.clock.clone(),
		settings,
	);

	Harness { repository, ..h }
}

/// Same as [`harness`], but every store call yields to the scheduler before it runs.
pub fn yielding_harness() -> Harness {
	let h = harness();
	let repository = AuthCodeRepository::new(
		Arc::new(YieldingStore(h.store.clone())),
		h.repository.schema.clone(),
		h.repository.clock.clone(),
		h.repository.settings().clone(),
	);

	Harness { repository, ..h }
}

/// Wraps a [`MemoryStore`] so concurrent callers interleave at every store call.
pub struct YieldingStore(pub Arc<MemoryStore>);
impl AuthCodeStore for YieldingStore {
	fn insert(&self, code: AuthCode) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			tokio::task::yield_now().await;

			self.0.insert(code).await
		})
	}

	fn fetch<'a>(&'a self, code: &'a str, now: OffsetDateTime) -> StoreFuture<'a, Option<AuthCode>> {
		Box::pin(async move {
			tokio::task::yield_now().await;

			self.0.fetch(code, now).await
		})
	}

	fn take<'a>(&'a self, code: &'a str, now: OffsetDateTime) -> StoreFuture<'a, Option<AuthCode>> {
		Box::pin(async move {
			tokio::task::yield_now().await;

			self.0.take(code, now).await
		})
	}

	fn delete_expired(&self, now: OffsetDateTime) -> StoreFuture<'_, usize> {
		Box::pin(async move {
			tokio::task::yield_now().await;

			self.0.delete_expired(now).await
		})
	}

	fn delete_matching<'a>(&'a self, association: &'a CodeAssociation) -> StoreFuture<'a, usize> {
		Box::pin(async move {
			tokio::task::yield_now().await;

			self.0.delete_matching(association).await
		})
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExecutorCall {
	Enable { table: String, uid: u64, touch_timestamp: bool },
	Delete { table: String, uid: u64, force: bool },
}

/// Records every call and optionally fails them with [`ActionError::RecordNotFound`].
#[derive(Debug, Default)]
pub struct RecordingExecutor {
	calls: Mutex<Vec<ExecutorCall>>,
	fail: bool,
}
impl RecordingExecutor {
	pub fn failing() -> Self {
		Self { calls: Mutex::default(), fail: true }
	}

	pub fn calls(&self) -> Vec<ExecutorCall> {
		self.calls.lock().clone()
	}

	fn record(
		&self,
		code: &AuthCode,
		call: impl FnOnce(String, u64) -> ExecutorCall,
	) -> Result<(), ActionError> {
		let AuthCodeTarget::Record { reference, .. } = &code.target else {
			panic!("Executors must only receive record codes.");
		};
		let table = reference.table.to_string();

		self.calls.lock().push(call(table.clone(), reference.uid));

		if self.fail { Err(ActionError::RecordNotFound { table, uid: reference.uid }) } else { Ok(()) }
	}
}
impl ActionExecutor for RecordingExecutor {
	fn enable<'a>(&'a self, code: &'a AuthCode, touch_timestamp: bool) -> ActionFuture<'a> {
		let result =
			self.record(code, |table, uid| ExecutorCall::Enable { table, uid, touch_timestamp });

		Box::pin(async move { result })
	}

	fn delete<'a>(&'a self, code: &'a AuthCode, force: bool) -> ActionFuture<'a> {
		let result = self.record(code, |table, uid| ExecutorCall::Delete { table, uid, force });

		Box::pin(async move { result })
	}
}
