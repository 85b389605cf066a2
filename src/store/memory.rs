//! Thread-safe in-memory [`AuthCodeStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::{AuthCode, CodeAssociation},
	store::{AuthCodeStore, StoreError, StoreFuture},
};

type StoreMap = Arc<RwLock<HashMap<String, AuthCode>>>;

/// Thread-safe storage backend that keeps codes in-process for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl MemoryStore {
	/// Number of stored codes, expired or not.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` if the store holds no codes at all.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}

	/// Snapshot of every stored code, including expired ones not yet swept.
	pub fn snapshot(&self) -> Vec<AuthCode> {
		self.0.read().values().cloned().collect()
	}

	fn insert_now(map: StoreMap, code: AuthCode) -> Result<(), StoreError> {
		map.write().insert(code.code.expose().to_owned(), code);

		Ok(())
	}

	fn fetch_now(map: StoreMap, code: &str, now: OffsetDateTime) -> Option<AuthCode> {
		map.read().get(code).filter(|stored| !stored.is_expired_at(now)).cloned()
	}

	fn take_now(map: StoreMap, code: &str, now: OffsetDateTime) -> Option<AuthCode> {
		let mut guard = map.write();

		match guard.get(code) {
			Some(stored) if !stored.is_expired_at(now) => guard.remove(code),
			_ => None,
		}
	}

	fn retain_now(map: StoreMap, mut keep: impl FnMut(&AuthCode) -> bool) -> usize {
		let mut guard = map.write();
		let before = guard.len();

		guard.retain(|_, stored| keep(stored));

		before - guard.len()
	}
}
impl AuthCodeStore for MemoryStore {
	fn insert(&self, code: AuthCode) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move { Self::insert_now(map, code) })
	}

	fn fetch<'a>(
		&'a self,
		code: &'a str,
		now: OffsetDateTime,
	) -> StoreFuture<'a, Option<AuthCode>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(Self::fetch_now(map, code, now)) })
	}

	fn take<'a>(&'a self, code: &'a str, now: OffsetDateTime) -> StoreFuture<'a, Option<AuthCode>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(Self::take_now(map, code, now)) })
	}

	fn delete_expired(&self, now: OffsetDateTime) -> StoreFuture<'_, usize> {
		let map = self.0.clone();

		Box::pin(async move { Ok(Self::retain_now(map, |stored| stored.valid_until >= now)) })
	}

	fn delete_matching<'a>(&'a self, association: &'a CodeAssociation) -> StoreFuture<'a, usize> {
		let map = self.0.clone();

		Box::pin(async move {
			Ok(Self::retain_now(map, |stored| !association.matches(&stored.target)))
		})
	}
}
