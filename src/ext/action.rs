//! Record mutation contract invoked when a record code is redeemed.

// self
use crate::{_prelude::*, auth::AuthCode};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Boxed future returned by [`ActionExecutor`] methods.
pub type ActionFuture<'a> = Pin<Box<dyn Future<Output = Result<(), ActionError>> + 'a + Send>>;

/// Performs the record mutation a redeemed record code asks for.
///
/// The validator only decides which method to call; implementations own the actual write
/// against the referenced table and report failures unchanged.
pub trait ActionExecutor
where
	Self: Send + Sync,
{
	/// Clears the hidden field of the referenced record, optionally touching its timestamp.
	fn enable<'a>(&'a self, code: &'a AuthCode, touch_timestamp: bool) -> ActionFuture<'a>;

	/// Deletes the referenced record; `force` requests a hard delete over a soft delete.
	fn delete<'a>(&'a self, code: &'a AuthCode, force: bool) -> ActionFuture<'a>;
}

/// Failures reported by an [`ActionExecutor`].
#[derive(Debug, ThisError)]
pub enum ActionError {
	/// The referenced record no longer exists.
	#[error("Record {uid} in table `{table}` does not exist.")]
	RecordNotFound {
		/// Referenced table.
		table: String,
		/// Referenced uid.
		uid: u64,
	},
	/// Underlying persistence failure.
	#[error("Record mutation failed.")]
	Backend {
		/// Backend-specific failure.
		#[source]
		source: BoxError,
	},
}
impl ActionError {
	/// Wraps a backend-specific failure.
	pub fn backend(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Backend { source: Box::new(src) }
	}
}
