//! Auth-code repository: generation, lookup, expiry sweeps, and association clearing.
//!
//! [`AuthCodeRepository`] wraps an [`AuthCodeStore`] backend with the policies the backend
//! does not own: the configured [`ExpiryTime`], the opportunistic expiry sweep before every
//! lookup, the schema lookup for record codes, and the injected [`Clock`]. Generation lives
//! in [`generate`]; lookups and clearing live in [`lookup`].

pub mod generate;
pub mod lookup;

pub use generate::*;
pub use lookup::*;

// self
use crate::{
	_prelude::*,
	auth::ExpiryTime,
	clock::Clock,
	error::ConfigError,
	ext::SchemaLookup,
	store::AuthCodeStore,
};

/// Tunables for [`AuthCodeRepository`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositorySettings {
	/// Expiry applied to newly generated codes (`+1 day` unless configured).
	pub expiry: ExpiryTime,
	/// Sweep expired codes before every lookup.
	pub auto_delete_expired: bool,
}
impl RepositorySettings {
	/// Overrides the expiry applied to new codes.
	pub fn with_expiry(mut self, expiry: ExpiryTime) -> Self {
		self.expiry = expiry;

		self
	}

	/// Enables or disables the sweep before lookups.
	pub fn with_auto_delete_expired(mut self, enabled: bool) -> Self {
		self.auto_delete_expired = enabled;

		self
	}
}
impl Default for RepositorySettings {
	fn default() -> Self {
		Self { expiry: ExpiryTime::default(), auto_delete_expired: true }
	}
}

/// Issues, resolves, and clears auth codes against a pluggable store.
#[derive(Clone)]
pub struct AuthCodeRepository {
	/// Backend holding the codes.
	pub store: Arc<dyn AuthCodeStore>,
	/// Resolves hidden columns for record codes without an explicit override.
	pub schema: Arc<dyn SchemaLookup>,
	/// Time source for expiry resolution and sweeps.
	pub clock: Arc<dyn Clock>,
	settings: RepositorySettings,
	pub(crate) guards: CodeGuards,
}
impl AuthCodeRepository {
	/// Creates a repository over the provided store, schema lookup, and clock.
	pub fn new(
		store: Arc<dyn AuthCodeStore>,
		schema: Arc<dyn SchemaLookup>,
		clock: Arc<dyn Clock>,
		settings: RepositorySettings,
	) -> Self {
		Self { store, schema, clock, settings, guards: Default::default() }
	}

	/// Active settings.
	pub fn settings(&self) -> &RepositorySettings {
		&self.settings
	}

	/// Replaces the expiry with `expression`, validated against the current clock.
	///
	/// The previous expiry is kept when the expression is rejected.
	pub fn set_expiry(&mut self, expression: &str) -> Result<(), ConfigError> {
		self.settings.expiry = ExpiryTime::new(expression, self.clock.now())?;

		Ok(())
	}

	/// Enables or disables the sweep before lookups.
	pub fn set_auto_delete_expired(&mut self, enabled: bool) {
		self.settings.auto_delete_expired = enabled;
	}
}
impl Debug for AuthCodeRepository {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthCodeRepository")
			.field("settings", &self.settings)
			.field("guards", &self.guards.len())
			.finish()
	}
}

/// Per-code single-flight guards serializing concurrent redemptions of the same code.
#[derive(Clone, Debug, Default)]
pub(crate) struct CodeGuards(Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>);
impl CodeGuards {
	/// Returns a handle to the guard for `code`, creating it on demand.
	///
	/// The entry is pruned when the last handle drops, including when the owning future is
	/// cancelled mid-flight.
	pub(crate) fn acquire(&self, code: &str) -> CodeGuard {
		let mutex = self
			.0
			.lock()
			.entry(code.to_owned())
			.or_insert_with(|| Arc::new(AsyncMutex::new(())))
			.clone();

		CodeGuard { guards: self.clone(), code: code.to_owned(), mutex }
	}

	pub(crate) fn len(&self) -> usize {
		self.0.lock().len()
	}
}

/// Handle on one per-code guard; removes the map entry once no other handle remains.
#[derive(Debug)]
pub(crate) struct CodeGuard {
	guards: CodeGuards,
	code: String,
	mutex: Arc<AsyncMutex<()>>,
}
impl CodeGuard {
	/// Waits for exclusive use of the code.
	pub(crate) async fn lock(&self) -> async_lock::MutexGuard<'_, ()> {
		self.mutex.lock().await
	}
}
impl Drop for CodeGuard {
	fn drop(&mut self) {
		let mut guards = self.guards.0.lock();

		// One reference in the map plus this handle's.
		if Arc::strong_count(&self.mutex) <= 2
			&& guards.get(&self.code).is_some_and(|held| Arc::ptr_eq(held, &self.mutex))
		{
			guards.remove(&self.code);
		}
	}
}
