//! Filter condition trees
//!
//! A filter is an ordered tree: leaf conditions compare one field against an
//! operand, groups combine children with an explicit AND/OR join. The tree
//! serializes to JSON and deserializes back to an equal tree — joins, order,
//! operators, and operands all survive the round trip.

use crate::operator::FilterOperator;
use pipit_core::{EngineError, EngineResult};
use pipit_fields::FieldKind;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// How a group combines its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterJoin {
	/// Every child must match (AND)
	#[default]
	All,
	/// At least one child must match (OR)
	Any,
}

/// One node of a filter tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum FilterNode {
	/// A leaf comparison
	Condition {
		/// Developer name of the field (or a built-in field name)
		field: String,
		/// Comparison operator
		operator: FilterOperator,
		/// Operand, `null` for operand-free operators
		#[serde(default)]
		value: JsonValue,
	},
	/// An AND/OR group over ordered children
	Group {
		/// Join semantics for the children
		join: FilterJoin,
		/// Whether the group's outcome is negated
		#[serde(default)]
		negate: bool,
		/// Child nodes, order preserved
		children: Vec<FilterNode>,
	},
}

impl FilterNode {
	/// A leaf condition.
	pub fn condition(
		field: impl Into<String>,
		operator: FilterOperator,
		value: impl Into<JsonValue>,
	) -> Self {
		FilterNode::Condition {
			field: field.into(),
			operator,
			value: value.into(),
		}
	}

	/// An AND group.
	pub fn all(children: Vec<FilterNode>) -> Self {
		FilterNode::Group {
			join: FilterJoin::All,
			negate: false,
			children,
		}
	}

	/// An OR group.
	pub fn any(children: Vec<FilterNode>) -> Self {
		FilterNode::Group {
			join: FilterJoin::Any,
			negate: false,
			children,
		}
	}

	/// Negate this node by wrapping it in a negated single-child group.
	pub fn not(self) -> Self {
		FilterNode::Group {
			join: FilterJoin::All,
			negate: true,
			children: vec![self],
		}
	}

	/// Validate every leaf against the fields a view may reference.
	///
	/// `lookup` maps a field developer name (or built-in field name) to its
	/// kind; `None` means the field does not exist. Save-time validation is
	/// strict — unknown fields and unsupported operators are rejected here,
	/// while the evaluator later skips references that have gone stale
	/// after a field deletion.
	pub fn validate(&self, lookup: &dyn Fn(&str) -> Option<FieldKind>) -> EngineResult<()> {
		match self {
			FilterNode::Condition {
				field, operator, ..
			} => {
				let Some(kind) = lookup(field) else {
					return Err(EngineError::validation(
						field.clone(),
						"Filter references a field that does not exist on this content type.",
					));
				};
				if !operator.supports(kind) {
					return Err(EngineError::validation(
						field.clone(),
						format!(
							"Operator is not valid for a {} field.",
							kind.label().to_lowercase()
						),
					));
				}
				Ok(())
			}
			FilterNode::Group { children, .. } => {
				for child in children {
					child.validate(lookup)?;
				}
				Ok(())
			}
		}
	}
}
