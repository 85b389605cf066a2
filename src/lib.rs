//! Single-use auth codes for login-free actions: generate, expire, clear, and
//! validate-and-execute with pluggable stores, sessions, and record executors.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod clock;
pub mod error;
pub mod ext;
pub mod obs;
pub mod repository;
pub mod store;
pub mod validator;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		clock::{Clock, FixedClock},
		ext::{SchemaLookup, StaticSchema},
		repository::{AuthCodeRepository, RepositorySettings},
		store::{AuthCodeStore, MemoryStore},
	};

	/// Instant every test clock starts at unless a test moves it.
	pub const TEST_EPOCH: OffsetDateTime = time::macros::datetime!(2025-11-10 12:00 UTC);

	/// Schema fixture mapping the `pages` and `tt_content` tables to their `hidden` column.
	pub fn test_schema() -> StaticSchema {
		StaticSchema::default().with_disabled_column("pages", "hidden").with_disabled_column(
			"tt_content",
			"hidden",
		)
	}

	/// Constructs an [`AuthCodeRepository`] backed by an in-memory store, a fixed clock pinned to
	/// [`TEST_EPOCH`], and [`test_schema`].
	pub fn build_test_repository() -> (AuthCodeRepository, Arc<MemoryStore>, Arc<FixedClock>) {
		let store_backend = Arc::new(MemoryStore::default());
		let store: Arc<dyn AuthCodeStore> = store_backend.clone();
		let clock_backend = Arc::new(FixedClock::new(TEST_EPOCH));
		let clock: Arc<dyn Clock> = clock_backend.clone();
		let schema: Arc<dyn SchemaLookup> = Arc::new(test_schema());
		let repository =
			AuthCodeRepository::new(store, schema, clock, RepositorySettings::default());

		(repository, store_backend, clock_backend)
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use url;
