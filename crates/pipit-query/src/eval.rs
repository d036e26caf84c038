//! In-memory evaluation of filter trees against documents
//!
//! A leaf whose field is missing from the document (or whose operand cannot
//! be interpreted for the stored value's kind) evaluates to "skip" rather
//! than an error; a group ignores skipped children. A filter that skips
//! entirely matches everything, which is what stale references after a
//! field deletion should do.

use crate::condition::{FilterJoin, FilterNode};
use crate::operator::FilterOperator;
use chrono::NaiveDate;
use pipit_fields::{Document, FieldValue};
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// Whether the document matches the filter.
pub fn matches(node: &FilterNode, document: &Document) -> bool {
	eval(node, document).unwrap_or(true)
}

/// `None` means the node could not be evaluated and should be skipped.
fn eval(node: &FilterNode, document: &Document) -> Option<bool> {
	match node {
		FilterNode::Condition {
			field,
			operator,
			value,
		} => eval_condition(document.get(field.as_str()), *operator, value),
		FilterNode::Group {
			join,
			negate,
			children,
		} => {
			let outcomes: Vec<bool> = children
				.iter()
				.filter_map(|child| eval(child, document))
				.collect();
			if outcomes.is_empty() {
				return None;
			}
			let combined = match join {
				FilterJoin::All => outcomes.iter().all(|v| *v),
				FilterJoin::Any => outcomes.iter().any(|v| *v),
			};
			Some(combined != *negate)
		}
	}
}

fn eval_condition(
	stored: Option<&FieldValue>,
	operator: FilterOperator,
	operand: &JsonValue,
) -> Option<bool> {
	use FilterOperator::*;

	// Presence operators are meaningful even without a stored value.
	match operator {
		IsEmpty => return Some(stored.map(FieldValue::is_empty).unwrap_or(true)),
		IsNotEmpty => return Some(stored.map(|v| !v.is_empty()).unwrap_or(false)),
		IsTrue => return Some(matches!(stored, Some(FieldValue::Checkbox(Some(true))))),
		IsFalse => return Some(matches!(stored, Some(FieldValue::Checkbox(Some(false))))),
		_ => {}
	}

	let stored = stored?;
	match stored {
		FieldValue::Text(text) => {
			let operand = operand.as_str()?;
			let haystack = text.to_lowercase();
			let needle = operand.to_lowercase();
			match operator {
				Equals => Some(haystack == needle),
				NotEquals => Some(haystack != needle),
				Contains => Some(haystack.contains(&needle)),
				StartsWith => Some(haystack.starts_with(&needle)),
				EndsWith => Some(haystack.ends_with(&needle)),
				_ => None,
			}
		}
		FieldValue::Number(number) => {
			let operand = operand_number(operand)?;
			compare_ordered(number.partial_cmp(&operand)?, operator)
		}
		FieldValue::Date(date) => {
			let operand = operand_date(operand)?;
			compare_ordered(date.cmp(&operand), operator)
		}
		FieldValue::Checkbox(state) => {
			let operand = operand.as_bool()?;
			match operator {
				Equals => Some(*state == Some(operand)),
				NotEquals => Some(*state != Some(operand)),
				_ => None,
			}
		}
		FieldValue::Choice(selected) => match operator {
			Equals => Some(selected.as_deref() == operand.as_str()),
			NotEquals => Some(selected.as_deref() != operand.as_str()),
			In => {
				let set = operand_set(operand)?;
				Some(selected.as_deref().is_some_and(|s| set.contains(&s)))
			}
			NotIn => {
				let set = operand_set(operand)?;
				Some(!selected.as_deref().is_some_and(|s| set.contains(&s)))
			}
			_ => None,
		},
		FieldValue::Choices(selected) => match operator {
			In => {
				let set = operand_set(operand)?;
				Some(selected.iter().any(|s| set.contains(&s.as_str())))
			}
			NotIn => {
				let set = operand_set(operand)?;
				Some(!selected.iter().any(|s| set.contains(&s.as_str())))
			}
			_ => None,
		},
		FieldValue::Relationship(target) => {
			let operand = operand.as_str().and_then(|s| Uuid::parse_str(s).ok())?;
			match operator {
				Equals => Some(*target == Some(operand)),
				NotEquals => Some(*target != Some(operand)),
				_ => None,
			}
		}
	}
}

fn compare_ordered(ordering: std::cmp::Ordering, operator: FilterOperator) -> Option<bool> {
	use std::cmp::Ordering::*;
	match operator {
		FilterOperator::Equals => Some(ordering == Equal),
		FilterOperator::NotEquals => Some(ordering != Equal),
		FilterOperator::LessThan => Some(ordering == Less),
		FilterOperator::LessThanOrEqual => Some(ordering != Greater),
		FilterOperator::GreaterThan => Some(ordering == Greater),
		FilterOperator::GreaterThanOrEqual => Some(ordering != Less),
		_ => None,
	}
}

fn operand_number(operand: &JsonValue) -> Option<f64> {
	match operand {
		JsonValue::Number(n) => n.as_f64(),
		JsonValue::String(s) => s.trim().parse().ok(),
		_ => None,
	}
}

fn operand_date(operand: &JsonValue) -> Option<NaiveDate> {
	NaiveDate::parse_from_str(operand.as_str()?, "%Y-%m-%d").ok()
}

fn operand_set(operand: &JsonValue) -> Option<Vec<&str>> {
	match operand {
		JsonValue::Array(values) => values.iter().map(JsonValue::as_str).collect(),
		JsonValue::String(s) => Some(vec![s.as_str()]),
		_ => None,
	}
}
