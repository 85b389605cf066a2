//! Storage contracts and built-in store implementations for auth codes.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	auth::{AuthCode, CodeAssociation, FieldName, RecordReference, TableName},
};

/// Boxed future returned by every [`AuthCodeStore`] method.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend contract implemented by auth-code stores.
///
/// Backends never hand out a code whose `valid_until` has been reached, even when the
/// expired row has not been swept yet.
pub trait AuthCodeStore
where
	Self: Send + Sync,
{
	/// Persists a code, replacing any row with the same code value.
	fn insert(&self, code: AuthCode) -> StoreFuture<'_, ()>;

	/// Fetches the live code with the given value, if present.
	fn fetch<'a>(&'a self, code: &'a str, now: OffsetDateTime)
	-> StoreFuture<'a, Option<AuthCode>>;

	/// Atomically removes and returns the live code with the given value.
	fn take<'a>(&'a self, code: &'a str, now: OffsetDateTime) -> StoreFuture<'a, Option<AuthCode>>;

	/// Removes every code whose `valid_until` lies before `now`, returning how many went away.
	fn delete_expired(&self, now: OffsetDateTime) -> StoreFuture<'_, usize>;

	/// Removes every code bound to the association, returning how many went away.
	fn delete_matching<'a>(&'a self, association: &'a CodeAssociation) -> StoreFuture<'a, usize>;

	/// Removes every independent code with exactly this identifier and context.
	fn delete_matching_independent<'a>(
		&'a self,
		identifier: &'a str,
		context: &'a str,
	) -> StoreFuture<'a, usize> {
		Box::pin(async move {
			let association = CodeAssociation::Independent {
				identifier: identifier.to_owned(),
				context: context.to_owned(),
			};

			self.delete_matching(&association).await
		})
	}

	/// Removes every record code with exactly this table, uid, uid field, and hidden field.
	fn delete_matching_record<'a>(
		&'a self,
		table: &'a TableName,
		uid: u64,
		uid_field: &'a FieldName,
		hidden_field: &'a FieldName,
	) -> StoreFuture<'a, usize> {
		Box::pin(async move {
			let association = CodeAssociation::Record(RecordReference {
				table: table.clone(),
				uid,
				uid_field: uid_field.clone(),
				hidden_field: hidden_field.clone(),
			});

			self.delete_matching(&association).await
		})
	}
}

/// Error type produced by [`AuthCodeStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
	/// A persisted row does not describe a valid auth code.
	#[error("Corrupt auth code row: {message}.")]
	CorruptRow {
		/// Human-readable error payload.
		message: String,
	},
}
