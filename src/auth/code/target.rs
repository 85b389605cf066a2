//! What an auth code grants: page access scoped by identifier, or an action on one record.

// self
use crate::{
	_prelude::*,
	auth::{FieldName, TableName},
};

/// Coarse classification of an auth code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthCodeType {
	/// Keyed by `(identifier, context)`; not tied to any record.
	Independent,
	/// References one row of one table.
	Record,
}
impl AuthCodeType {
	/// Returns a stable label suitable for rows, spans, and metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			AuthCodeType::Independent => "independent",
			AuthCodeType::Record => "record",
		}
	}
}

/// Action carried by an auth code, including the placeholder used for independent codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthCodeAction {
	/// Clear the hidden flag of the referenced record.
	EnableRecord,
	/// Delete the referenced record.
	DeleteRecord,
	/// Only grant access; nothing is mutated.
	AccessPage,
}
impl AuthCodeAction {
	/// Returns a stable label suitable for rows, spans, and metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			AuthCodeAction::EnableRecord => "enable_record",
			AuthCodeAction::DeleteRecord => "delete_record",
			AuthCodeAction::AccessPage => "access_page",
		}
	}
}

/// Action a record code performs on its referenced row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordAction {
	/// Clear the hidden flag of the record.
	EnableRecord,
	/// Delete the record.
	DeleteRecord,
	/// Grant access to a page showing the record.
	AccessPage,
}
impl From<RecordAction> for AuthCodeAction {
	fn from(value: RecordAction) -> Self {
		match value {
			RecordAction::EnableRecord => AuthCodeAction::EnableRecord,
			RecordAction::DeleteRecord => AuthCodeAction::DeleteRecord,
			RecordAction::AccessPage => AuthCodeAction::AccessPage,
		}
	}
}
impl From<AuthCodeAction> for RecordAction {
	fn from(value: AuthCodeAction) -> Self {
		match value {
			AuthCodeAction::EnableRecord => RecordAction::EnableRecord,
			AuthCodeAction::DeleteRecord => RecordAction::DeleteRecord,
			AuthCodeAction::AccessPage => RecordAction::AccessPage,
		}
	}
}

/// Identifier scoped within a named context, e.g. a form id within a survey.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndependentTarget {
	/// Caller-chosen identifier, unique within `context`.
	pub identifier: String,
	/// Namespace the identifier is unique in.
	pub context: String,
}

/// The row a record code acts on, plus the column that marks it hidden.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordReference {
	/// Table holding the record.
	pub table: TableName,
	/// Value of the uid column.
	pub uid: u64,
	/// Column the uid is matched against.
	pub uid_field: FieldName,
	/// Column marking the record hidden/disabled.
	pub hidden_field: FieldName,
}

/// Closed description of what an auth code grants.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthCodeTarget {
	/// Identifier-scoped access code.
	Independent(IndependentTarget),
	/// Record-scoped code with its action.
	Record {
		/// Referenced row.
		reference: RecordReference,
		/// What to do with the row on validation.
		action: RecordAction,
	},
}
impl AuthCodeTarget {
	/// Classification of this target.
	pub fn code_type(&self) -> AuthCodeType {
		match self {
			AuthCodeTarget::Independent(_) => AuthCodeType::Independent,
			AuthCodeTarget::Record { .. } => AuthCodeType::Record,
		}
	}

	/// Action label; independent targets report [`AuthCodeAction::AccessPage`].
	pub fn action(&self) -> AuthCodeAction {
		match self {
			AuthCodeTarget::Independent(_) => AuthCodeAction::AccessPage,
			AuthCodeTarget::Record { action, .. } => (*action).into(),
		}
	}

	/// Identity tuple shared by every code that supersedes this one.
	pub fn association(&self) -> CodeAssociation {
		match self {
			AuthCodeTarget::Independent(target) => CodeAssociation::Independent {
				identifier: target.identifier.clone(),
				context: target.context.clone(),
			},
			AuthCodeTarget::Record { reference, .. } => CodeAssociation::Record(reference.clone()),
		}
	}
}

/// Match criteria used to clear every code bound to the same identity or record.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CodeAssociation {
	/// Independent codes with exactly this identifier and context.
	Independent {
		/// Identifier to match.
		identifier: String,
		/// Context to match.
		context: String,
	},
	/// Record codes with exactly this table, uid, uid field, and hidden field.
	Record(RecordReference),
}
impl CodeAssociation {
	/// Returns `true` if the target belongs to this association.
	///
	/// Record codes match on all four reference fields regardless of their action, so a new
	/// delete code supersedes an outstanding enable code for the same row.
	pub fn matches(&self, target: &AuthCodeTarget) -> bool {
		match (self, target) {
			(CodeAssociation::Independent { identifier, context }, AuthCodeTarget::Independent(t)) =>
				&t.identifier == identifier && &t.context == context,
			(CodeAssociation::Record(reference), AuthCodeTarget::Record { reference: r, .. }) =>
				r == reference,
			_ => false,
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn reference(hidden: &str) -> RecordReference {
		RecordReference {
			table: TableName::new("pages").expect("Table fixture should be valid."),
			uid: 7,
			uid_field: FieldName::default_uid(),
			hidden_field: FieldName::new(hidden).expect("Field fixture should be valid."),
		}
	}

	#[test]
	fn independent_targets_report_access_page() {
		let target = AuthCodeTarget::Independent(IndependentTarget {
			identifier: "form-42".into(),
			context: "survey".into(),
		});

		assert_eq!(target.code_type(), AuthCodeType::Independent);
		assert_eq!(target.action(), AuthCodeAction::AccessPage);
	}

	#[test]
	fn record_association_ignores_action_but_not_hidden_field() {
		let enable =
			AuthCodeTarget::Record { reference: reference("hidden"), action: RecordAction::EnableRecord };
		let delete =
			AuthCodeTarget::Record { reference: reference("hidden"), action: RecordAction::DeleteRecord };
		let other_field =
			AuthCodeTarget::Record { reference: reference("disabled"), action: RecordAction::EnableRecord };
		let association = enable.association();

		assert!(association.matches(&delete));
		assert!(!association.matches(&other_field));
		assert_eq!(delete.action(), AuthCodeAction::DeleteRecord);
	}

	#[test]
	fn independent_association_requires_both_fields() {
		let association =
			CodeAssociation::Independent { identifier: "form-42".into(), context: "survey".into() };
		let same_id_other_context = AuthCodeTarget::Independent(IndependentTarget {
			identifier: "form-42".into(),
			context: "newsletter".into(),
		});

		assert!(!association.matches(&same_id_other_context));
		assert!(!association.matches(&AuthCodeTarget::Record {
			reference: reference("hidden"),
			action: RecordAction::AccessPage,
		}));
	}

	#[test]
	fn target_serializes_with_type_tag() {
		let target =
			AuthCodeTarget::Record { reference: reference("hidden"), action: RecordAction::DeleteRecord };
		let payload = serde_json::to_value(&target).expect("Target should serialize.");

		assert_eq!(payload["type"], "record");
		assert_eq!(payload["action"], "delete_record");
		assert_eq!(payload["reference"]["uid_field"], "uid");
	}
}
