//! Simple file-backed [`AuthCodeStore`] for lightweight deployments.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	auth::{AuthCode, AuthCodeRow, CodeAssociation},
	store::{AuthCodeStore, StoreError, StoreFuture},
};

/// Persists auth codes to a JSON file of flat rows after each mutation.
#[derive(Clone, Debug)]
pub struct FileStore {
	path: PathBuf,
	inner: Arc<RwLock<HashMap<String, AuthCode>>>,
}
impl FileStore {
	/// Opens (or creates) a store at the provided path, eagerly loading existing rows.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let snapshot = if path.exists() { Self::load_snapshot(&path)? } else { HashMap::new() };

		Ok(Self { path, inner: Arc::new(RwLock::new(snapshot)) })
	}

	fn load_snapshot(path: &Path) -> Result<HashMap<String, AuthCode>, StoreError> {
		let metadata = path.metadata().map_err(|e| StoreError::Backend {
			message: format!("Failed to inspect {}: {e}", path.display()),
		})?;

		if metadata.len() == 0 {
			return Ok(HashMap::new());
		}

		let bytes = fs::read(path).map_err(|e| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;
		let de = &mut serde_json::Deserializer::from_slice(&bytes);
		let rows: Vec<AuthCodeRow> =
			serde_path_to_error::deserialize(de).map_err(|e| StoreError::Serialization {
				message: format!("Failed to parse {} at `{}`: {}", path.display(), e.path(), e.inner()),
			})?;

		rows.into_iter()
			.map(|row| -> Result<(String, AuthCode), StoreError> {
				let code = AuthCode::try_from(row).map_err(|e| StoreError::CorruptRow {
					message: format!("{} in {}", e, path.display()),
				})?;

				Ok((code.code.expose().to_owned(), code))
			})
			.collect()
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}
		Ok(())
	}

	fn persist_locked(&self, contents: &HashMap<String, AuthCode>) -> Result<(), StoreError> {
		Self::ensure_parent_exists(&self.path)?;

		let mut rows: Vec<AuthCodeRow> = contents.values().map(AuthCodeRow::from).collect();

		rows.sort_by(|a, b| a.code.cmp(&b.code));

		let serialized = serde_json::to_vec_pretty(&rows).map_err(|e| StoreError::Serialization {
			message: format!("Failed to serialize store snapshot: {e}"),
		})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}

	/// Persists `next` and only then makes it the in-memory state.
	fn commit(
		&self,
		current: &mut HashMap<String, AuthCode>,
		next: HashMap<String, AuthCode>,
	) -> Result<(), StoreError> {
		self.persist_locked(&next)?;

		*current = next;

		Ok(())
	}

	fn retain_persisted(&self, mut keep: impl FnMut(&AuthCode) -> bool) -> Result<usize, StoreError> {
		let mut guard = self.inner.write();
		let mut next = guard.clone();

		next.retain(|_, stored| keep(stored));

		let removed = guard.len() - next.len();

		if removed > 0 {
			self.commit(&mut guard, next)?;
		}

		Ok(removed)
	}
}
impl AuthCodeStore for FileStore {
	fn insert(&self, code: AuthCode) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			let mut guard = self.inner.write();
			let mut next = guard.clone();

			next.insert(code.code.expose().to_owned(), code);

			self.commit(&mut guard, next)
		})
	}

	fn fetch<'a>(
		&'a self,
		code: &'a str,
		now: OffsetDateTime,
	) -> StoreFuture<'a, Option<AuthCode>> {
		Box::pin(async move {
			Ok(self.inner.read().get(code).filter(|stored| !stored.is_expired_at(now)).cloned())
		})
	}

	fn take<'a>(&'a self, code: &'a str, now: OffsetDateTime) -> StoreFuture<'a, Option<AuthCode>> {
		Box::pin(async move {
			let mut guard = self.inner.write();
			let live = guard.get(code).is_some_and(|stored| !stored.is_expired_at(now));

			if !live {
				return Ok(None);
			}

			let mut next = guard.clone();
			let taken = next.remove(code);

			self.commit(&mut guard, next)?;

			Ok(taken)
		})
	}

	fn delete_expired(&self, now: OffsetDateTime) -> StoreFuture<'_, usize> {
		Box::pin(async move { self.retain_persisted(|stored| stored.valid_until >= now) })
	}

	fn delete_matching<'a>(&'a self, association: &'a CodeAssociation) -> StoreFuture<'a, usize> {
		Box::pin(async move { self.retain_persisted(|stored| !association.matches(&stored.target)) })
	}
}
