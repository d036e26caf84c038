//! Typed field values and the stored document shape

use crate::choice::FieldChoice;
use crate::kind::FieldKind;
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A typed field value as stored inside a content document.
///
/// The storage representation is type-tagged (`{"type": ..., "value": ...}`)
/// so documents survive schema evolution: readers can interpret a value
/// without consulting the schema that produced it, keys for soft-deleted
/// fields simply stay in place unread, and keys for newly added fields are
/// absent from older documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
	/// Text of either text kind
	Text(String),
	/// A finite number
	Number(f64),
	/// A calendar date
	Date(NaiveDate),
	/// A checkbox; `None` means the box was never touched, which is
	/// distinct from an explicit `false`
	Checkbox(Option<bool>),
	/// The developer name of the selected choice, if any
	Choice(Option<String>),
	/// Developer names of the selected choices, in selection order
	Choices(Vec<String>),
	/// The id of the related content item, if any
	Relationship(Option<Uuid>),
}

impl FieldValue {
	/// Whether this value carries no usable content.
	pub fn is_empty(&self) -> bool {
		match self {
			FieldValue::Text(s) => s.is_empty(),
			FieldValue::Number(_) | FieldValue::Date(_) => false,
			FieldValue::Checkbox(v) => v.is_none(),
			FieldValue::Choice(v) => v.is_none(),
			FieldValue::Choices(v) => v.is_empty(),
			FieldValue::Relationship(v) => v.is_none(),
		}
	}

	/// Whether this value is one the given kind could have produced.
	pub fn matches_kind(&self, kind: FieldKind) -> bool {
		matches!(
			(self, kind),
			(
				FieldValue::Text(_),
				FieldKind::SingleLineText | FieldKind::MultiLineText
			) | (FieldValue::Number(_), FieldKind::Number)
				| (FieldValue::Date(_), FieldKind::Date)
				| (FieldValue::Checkbox(_), FieldKind::Checkbox)
				| (FieldValue::Choice(_), FieldKind::SingleSelect)
				| (FieldValue::Choices(_), FieldKind::MultipleSelect)
				| (FieldValue::Relationship(_), FieldKind::OneToOneRelationship)
		)
	}

	/// Text content, when this is a text value.
	pub fn as_text(&self) -> Option<&str> {
		match self {
			FieldValue::Text(s) => Some(s),
			_ => None,
		}
	}

	/// Numeric content, when this is a number value.
	pub fn as_number(&self) -> Option<f64> {
		match self {
			FieldValue::Number(n) => Some(*n),
			_ => None,
		}
	}

	/// Date content, when this is a date value.
	pub fn as_date(&self) -> Option<NaiveDate> {
		match self {
			FieldValue::Date(d) => Some(*d),
			_ => None,
		}
	}

	/// Checkbox content, when this is a checkbox value with a state.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			FieldValue::Checkbox(v) => *v,
			_ => None,
		}
	}

	/// Related item id, when this is a relationship value with a target.
	pub fn as_relationship(&self) -> Option<Uuid> {
		match self {
			FieldValue::Relationship(v) => *v,
			_ => None,
		}
	}
}

/// A stored content document: an ordered map from field developer name to
/// typed value.
///
/// Lookups must tolerate missing keys (fields added after the document was
/// written) and unknown keys (fields soft-deleted since).
pub type Document = IndexMap<String, FieldValue>;

/// A client-submitted document: raw JSON values keyed by field developer
/// name, before cleaning.
pub type RawDocument = serde_json::Map<String, serde_json::Value>;

/// A borrowed view of one field's definition, as cleaning and display need
/// it. The schema crate produces these from its `ContentTypeField` entities.
#[derive(Debug, Clone, Copy)]
pub struct FieldDefinition<'a> {
	/// Immutable slug identifying the field inside documents
	pub developer_name: &'a str,
	/// Display label
	pub label: &'a str,
	/// Field kind
	pub kind: FieldKind,
	/// Whether a value must be present for the document to be accepted
	pub is_required: bool,
	/// Choice list, meaningful only for select kinds
	pub choices: &'a [FieldChoice],
}
