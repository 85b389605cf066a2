//! Session bridge letting a validated code be reused across requests.

// self
use crate::_prelude::*;

/// Reads and writes the auth code remembered in the current user session.
pub trait SessionBridge
where
	Self: Send + Sync,
{
	/// Returns the code stored in the session, if any.
	fn get(&self) -> Option<String>;

	/// Remembers `code` for subsequent requests.
	fn set(&self, code: &str);

	/// Forgets any stored code.
	fn clear(&self);
}

/// Single-session store held in memory.
#[derive(Debug, Default)]
pub struct MemorySession(Mutex<Option<String>>);
impl SessionBridge for MemorySession {
	fn get(&self) -> Option<String> {
		self.0.lock().clone()
	}

	fn set(&self, code: &str) {
		*self.0.lock() = Some(code.to_owned());
	}

	fn clear(&self) {
		self.0.lock().take();
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn memory_session_set_get_clear() {
		let session = MemorySession::default();

		assert_eq!(session.get(), None);

		session.set("abc");

		assert_eq!(session.get().as_deref(), Some("abc"));

		session.clear();

		assert_eq!(session.get(), None);
	}
}
