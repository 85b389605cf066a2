//! Bearer secret wrapper that keeps auth codes out of logs.

// self
use crate::_prelude::*;

/// Redacted auth-code secret; whoever holds it may perform the code's action.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CodeSecret(String);
impl CodeSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner code value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for CodeSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for CodeSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("CodeSecret").field(&"<redacted>").finish()
	}
}
impl Display for CodeSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let secret = CodeSecret::new("0badc0de");

		assert_eq!(format!("{secret:?}"), "CodeSecret(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");
		assert_eq!(serde_json::to_string(&secret).expect("Secret should serialize."), "\"0badc0de\"");
	}
}
