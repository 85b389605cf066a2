//! Schema lookup for the column that marks a record hidden.

// self
use crate::_prelude::*;

/// Resolves the configured hidden/disabled column of a table.
pub trait SchemaLookup
where
	Self: Send + Sync,
{
	/// Returns the disabled column of `table`, if one is configured.
	fn disabled_column_for(&self, table: &str) -> Option<String>;
}

/// Fixed table → disabled-column map, typically deserialized from host configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaticSchema(HashMap<String, String>);
impl StaticSchema {
	/// Registers (or replaces) the disabled column for `table`.
	pub fn with_disabled_column(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
		self.0.insert(table.into(), column.into());

		self
	}
}
impl SchemaLookup for StaticSchema {
	fn disabled_column_for(&self, table: &str) -> Option<String> {
		self.0.get(table).filter(|column| !column.trim().is_empty()).cloned()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn blank_columns_count_as_unconfigured() {
		let schema: StaticSchema = serde_json::from_str(r#"{"pages":"hidden","fe_users":""}"#)
			.expect("Schema map should deserialize.");

		assert_eq!(schema.disabled_column_for("pages").as_deref(), Some("hidden"));
		assert_eq!(schema.disabled_column_for("fe_users"), None);
		assert_eq!(schema.disabled_column_for("tt_news"), None);
	}
}
