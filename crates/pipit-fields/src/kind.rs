//! The closed set of supported field kinds

use serde::{Deserialize, Serialize};

/// Kind of a content type field.
///
/// The set is closed: adding a kind means extending this enum and every
/// exhaustive match over it (cleaning, display, filter operators).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
	/// One line of text, leading/trailing whitespace stripped
	SingleLineText,
	/// Free-form text, whitespace preserved
	MultiLineText,
	/// A finite floating-point number
	Number,
	/// A calendar date without time of day
	Date,
	/// A boolean that distinguishes "unset" from "false"
	Checkbox,
	/// One selected choice out of the field's choice list
	SingleSelect,
	/// Any subset of the field's choice list, order preserved
	MultipleSelect,
	/// A reference to one content item of another content type
	OneToOneRelationship,
}

impl FieldKind {
	/// Human-readable label shown in the field-type picker.
	pub fn label(&self) -> &'static str {
		match self {
			FieldKind::SingleLineText => "Single line text",
			FieldKind::MultiLineText => "Multiple lines text",
			FieldKind::Number => "Number",
			FieldKind::Date => "Date",
			FieldKind::Checkbox => "Checkbox",
			FieldKind::SingleSelect => "Single select",
			FieldKind::MultipleSelect => "Multiple select",
			FieldKind::OneToOneRelationship => "One-to-one relationship",
		}
	}

	/// Whether this kind carries a choice list.
	pub fn has_choices(&self) -> bool {
		matches!(self, FieldKind::SingleSelect | FieldKind::MultipleSelect)
	}

	/// Whether this kind references another content type.
	pub fn is_relationship(&self) -> bool {
		matches!(self, FieldKind::OneToOneRelationship)
	}

	/// Every supported kind, in picker order.
	pub fn all() -> [FieldKind; 8] {
		[
			FieldKind::SingleLineText,
			FieldKind::MultiLineText,
			FieldKind::Number,
			FieldKind::Date,
			FieldKind::Checkbox,
			FieldKind::SingleSelect,
			FieldKind::MultipleSelect,
			FieldKind::OneToOneRelationship,
		]
	}
}
