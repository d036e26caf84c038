//! Sort specifications and value ordering
//!
//! A sort is an ordered list of `{field, direction}` entries; the first
//! entry is the primary key. Items whose document lacks the field sort
//! after items that have it.

use pipit_fields::FieldValue;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Direction of one sort entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
	/// Smallest first
	#[default]
	Ascending,
	/// Largest first
	Descending,
}

/// One entry of a view's sort specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortEntry {
	/// Developer name of the field (or a built-in field name)
	pub field: String,
	/// Sort direction
	pub direction: SortDirection,
}

impl SortEntry {
	/// An ascending entry.
	pub fn ascending(field: impl Into<String>) -> Self {
		Self {
			field: field.into(),
			direction: SortDirection::Ascending,
		}
	}

	/// A descending entry.
	pub fn descending(field: impl Into<String>) -> Self {
		Self {
			field: field.into(),
			direction: SortDirection::Descending,
		}
	}
}

/// Order two optional field values; absent values sort last in ascending
/// order. Values of different variants fall back to a stable variant order
/// so mixed documents still sort deterministically.
pub fn compare_values(a: Option<&FieldValue>, b: Option<&FieldValue>) -> Ordering {
	match (a, b) {
		(None, None) => Ordering::Equal,
		(None, Some(_)) => Ordering::Greater,
		(Some(_), None) => Ordering::Less,
		(Some(a), Some(b)) => compare_present(a, b),
	}
}

fn compare_present(a: &FieldValue, b: &FieldValue) -> Ordering {
	match (a, b) {
		(FieldValue::Text(a), FieldValue::Text(b)) => {
			a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
		}
		(FieldValue::Number(a), FieldValue::Number(b)) => {
			a.partial_cmp(b).unwrap_or(Ordering::Equal)
		}
		(FieldValue::Date(a), FieldValue::Date(b)) => a.cmp(b),
		(FieldValue::Checkbox(a), FieldValue::Checkbox(b)) => a.cmp(b),
		(FieldValue::Choice(a), FieldValue::Choice(b)) => a.cmp(b),
		(FieldValue::Choices(a), FieldValue::Choices(b)) => a.cmp(b),
		(FieldValue::Relationship(a), FieldValue::Relationship(b)) => a.cmp(b),
		(a, b) => variant_rank(a).cmp(&variant_rank(b)),
	}
}

fn variant_rank(value: &FieldValue) -> u8 {
	match value {
		FieldValue::Text(_) => 0,
		FieldValue::Number(_) => 1,
		FieldValue::Date(_) => 2,
		FieldValue::Checkbox(_) => 3,
		FieldValue::Choice(_) => 4,
		FieldValue::Choices(_) => 5,
		FieldValue::Relationship(_) => 6,
	}
}

/// Stable multi-key sort of `items` by the given entries.
///
/// `key` extracts the value an entry's field has for an item; `None` when
/// the item has no such value (including stale references to deleted
/// fields, which thereby sort last rather than failing).
pub fn apply_sort<T>(
	items: &mut [T],
	entries: &[SortEntry],
	key: impl Fn(&T, &str) -> Option<FieldValue>,
) {
	if entries.is_empty() {
		return;
	}
	items.sort_by(|a, b| {
		for entry in entries {
			let va = key(a, &entry.field);
			let vb = key(b, &entry.field);
			let mut ordering = compare_values(va.as_ref(), vb.as_ref());
			if entry.direction == SortDirection::Descending {
				ordering = ordering.reverse();
			}
			if ordering != Ordering::Equal {
				return ordering;
			}
		}
		Ordering::Equal
	});
}
