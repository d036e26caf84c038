//! Display rendering for list views and templates
//!
//! Every value renders to a display string: dates follow the organization's
//! timezone and format settings, selections show their labels, relationship
//! values expand to the related item's primary field text through a
//! caller-supplied resolver.

use crate::value::{FieldDefinition, FieldValue};
use pipit_core::OrganizationSettings;
use std::collections::HashMap;
use uuid::Uuid;

/// Expands relationship targets to their primary-field display text.
///
/// The content store prefetches the targets a rendering pass needs and hands
/// the result in, so display stays synchronous and side-effect free.
pub trait RelatedItemResolver {
	/// Primary-field text of the given content item, if it exists.
	fn primary_text(&self, id: Uuid) -> Option<String>;
}

/// Resolver for contexts with no relationship fields in play.
pub struct NoRelatedItems;

impl RelatedItemResolver for NoRelatedItems {
	fn primary_text(&self, _id: Uuid) -> Option<String> {
		None
	}
}

impl RelatedItemResolver for HashMap<Uuid, String> {
	fn primary_text(&self, id: Uuid) -> Option<String> {
		self.get(&id).cloned()
	}
}

/// Render one value as a display string.
///
/// # Examples
///
/// ```
/// use pipit_fields::{
///     FieldDefinition, FieldKind, FieldValue, NoRelatedItems, display_value,
/// };
/// use pipit_core::OrganizationSettings;
///
/// let definition = FieldDefinition {
///     developer_name: "rating",
///     label: "Rating",
///     kind: FieldKind::Number,
///     is_required: false,
///     choices: &[],
/// };
/// let org = OrganizationSettings::default();
///
/// let text = display_value(
///     &FieldValue::Number(4.0),
///     &definition,
///     &org,
///     &NoRelatedItems,
/// );
/// assert_eq!(text, "4");
/// ```
pub fn display_value(
	value: &FieldValue,
	definition: &FieldDefinition<'_>,
	org: &OrganizationSettings,
	related: &dyn RelatedItemResolver,
) -> String {
	match value {
		FieldValue::Text(s) => s.clone(),
		FieldValue::Number(n) => format_number(*n),
		FieldValue::Date(d) => org.format_date(*d),
		FieldValue::Checkbox(Some(true)) => "Yes".to_string(),
		FieldValue::Checkbox(Some(false)) => "No".to_string(),
		FieldValue::Checkbox(None) => String::new(),
		FieldValue::Choice(Some(developer_name)) => choice_label(definition, developer_name),
		FieldValue::Choice(None) => String::new(),
		FieldValue::Choices(entries) => entries
			.iter()
			.map(|developer_name| choice_label(definition, developer_name))
			.collect::<Vec<_>>()
			.join(", "),
		FieldValue::Relationship(Some(id)) => related
			.primary_text(*id)
			.unwrap_or_else(|| id.to_string()),
		FieldValue::Relationship(None) => String::new(),
	}
}

/// Integers render without a decimal point; everything else uses the shortest
/// round-trippable form `f64` formatting produces.
fn format_number(n: f64) -> String {
	if n.fract() == 0.0 && n.abs() < 1e15 {
		format!("{}", n as i64)
	} else {
		n.to_string()
	}
}

fn choice_label(definition: &FieldDefinition<'_>, developer_name: &str) -> String {
	definition
		.choices
		.iter()
		.find(|c| c.developer_name == *developer_name)
		.map(|c| c.label.clone())
		.unwrap_or_else(|| developer_name.to_string())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::choice::FieldChoice;
	use crate::kind::FieldKind;
	use chrono::NaiveDate;
	use rstest::rstest;

	fn definition<'a>(kind: FieldKind, choices: &'a [FieldChoice]) -> FieldDefinition<'a> {
		FieldDefinition {
			developer_name: "field",
			label: "Field",
			kind,
			is_required: false,
			choices,
		}
	}

	#[rstest]
	#[case(FieldValue::Number(4.0), "4")]
	#[case(FieldValue::Number(4.5), "4.5")]
	#[case(FieldValue::Number(-2.0), "-2")]
	fn test_number_display(#[case] value: FieldValue, #[case] expected: &str) {
		let def = definition(FieldKind::Number, &[]);
		let org = OrganizationSettings::default();
		assert_eq!(display_value(&value, &def, &org, &NoRelatedItems), expected);
	}

	#[rstest]
	fn test_date_display_uses_org_format() {
		let def = definition(FieldKind::Date, &[]);
		let org = OrganizationSettings {
			date_format: "%d %b %Y".to_string(),
			..Default::default()
		};
		let value = FieldValue::Date(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
		assert_eq!(
			display_value(&value, &def, &org, &NoRelatedItems),
			"01 Jun 2024"
		);
	}

	#[rstest]
	fn test_multi_select_joins_labels() {
		let choices = vec![
			FieldChoice::new("Red").unwrap(),
			FieldChoice::new("Blue").unwrap(),
		];
		let def = definition(FieldKind::MultipleSelect, &choices);
		let org = OrganizationSettings::default();
		let value = FieldValue::Choices(vec!["blue".to_string(), "red".to_string()]);
		assert_eq!(
			display_value(&value, &def, &org, &NoRelatedItems),
			"Blue, Red"
		);
	}

	#[rstest]
	fn test_relationship_resolves_primary_text() {
		let def = definition(FieldKind::OneToOneRelationship, &[]);
		let org = OrganizationSettings::default();
		let id = Uuid::new_v4();
		let mut related = HashMap::new();
		related.insert(id, "Jane Doe".to_string());

		let value = FieldValue::Relationship(Some(id));
		assert_eq!(display_value(&value, &def, &org, &related), "Jane Doe");
	}

	#[rstest]
	fn test_unset_checkbox_renders_empty() {
		let def = definition(FieldKind::Checkbox, &[]);
		let org = OrganizationSettings::default();
		assert_eq!(
			display_value(&FieldValue::Checkbox(None), &def, &org, &NoRelatedItems),
			""
		);
	}
}
