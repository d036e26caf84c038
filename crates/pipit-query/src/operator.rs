//! Filter operators and which field kinds support them

use pipit_fields::FieldKind;
use serde::{Deserialize, Serialize};

/// A comparison applied to one field inside a filter condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
	/// Value equals the operand
	Equals,
	/// Value differs from the operand
	NotEquals,
	/// Text value contains the operand (case-insensitive)
	Contains,
	/// Text value starts with the operand (case-insensitive)
	StartsWith,
	/// Text value ends with the operand (case-insensitive)
	EndsWith,
	/// Value is absent or empty
	IsEmpty,
	/// Value is present and non-empty
	IsNotEmpty,
	/// Numeric or date value is below the operand
	LessThan,
	/// Numeric or date value is at most the operand
	LessThanOrEqual,
	/// Numeric or date value is above the operand
	GreaterThan,
	/// Numeric or date value is at least the operand
	GreaterThanOrEqual,
	/// Checkbox value is an explicit true
	IsTrue,
	/// Checkbox value is an explicit false
	IsFalse,
	/// Selection intersects the operand set
	In,
	/// Selection does not intersect the operand set
	NotIn,
}

impl FilterOperator {
	/// The operators a field of the given kind accepts, in picker order.
	pub fn supported_by(kind: FieldKind) -> &'static [FilterOperator] {
		use FilterOperator::*;
		match kind {
			FieldKind::SingleLineText | FieldKind::MultiLineText => &[
				Equals, NotEquals, Contains, StartsWith, EndsWith, IsEmpty, IsNotEmpty,
			],
			FieldKind::Number | FieldKind::Date => &[
				Equals,
				NotEquals,
				LessThan,
				LessThanOrEqual,
				GreaterThan,
				GreaterThanOrEqual,
				IsEmpty,
				IsNotEmpty,
			],
			FieldKind::Checkbox => &[IsTrue, IsFalse, IsEmpty, IsNotEmpty],
			FieldKind::SingleSelect => &[Equals, NotEquals, In, NotIn, IsEmpty, IsNotEmpty],
			FieldKind::MultipleSelect => &[In, NotIn, IsEmpty, IsNotEmpty],
			FieldKind::OneToOneRelationship => &[Equals, NotEquals, IsEmpty, IsNotEmpty],
		}
	}

	/// Whether `self` is valid for a field of the given kind.
	pub fn supports(self, kind: FieldKind) -> bool {
		Self::supported_by(kind).contains(&self)
	}

	/// Whether this operator compares against an operand value.
	pub fn needs_operand(self) -> bool {
		!matches!(
			self,
			FilterOperator::IsEmpty
				| FilterOperator::IsNotEmpty
				| FilterOperator::IsTrue
				| FilterOperator::IsFalse
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_text_supports_contains_but_number_does_not() {
		assert!(FilterOperator::Contains.supports(FieldKind::SingleLineText));
		assert!(!FilterOperator::Contains.supports(FieldKind::Number));
	}

	#[rstest]
	fn test_checkbox_operators() {
		assert!(FilterOperator::IsTrue.supports(FieldKind::Checkbox));
		assert!(!FilterOperator::IsTrue.supports(FieldKind::Date));
	}

	#[rstest]
	fn test_operand_free_operators() {
		assert!(!FilterOperator::IsEmpty.needs_operand());
		assert!(!FilterOperator::IsTrue.needs_operand());
		assert!(FilterOperator::Contains.needs_operand());
	}

	#[rstest]
	fn test_serde_tag_is_snake_case() {
		let json = serde_json::to_string(&FilterOperator::GreaterThanOrEqual).unwrap();
		assert_eq!(json, "\"greater_than_or_equal\"");
	}
}
