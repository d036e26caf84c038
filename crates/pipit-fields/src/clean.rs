//! Cleaning: coercing raw client input into typed field values
//!
//! Each kind defines how a submitted `serde_json::Value` is coerced and
//! validated against the field definition. Failures are field-scoped errors;
//! nothing here panics on bad input.

use crate::value::{Document, FieldDefinition, FieldValue, RawDocument};
use chrono::NaiveDate;
use pipit_core::ValidationErrors;
use serde_json::Value as JsonValue;
use thiserror::Error;
use uuid::Uuid;

/// A field-scoped cleaning failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
	/// A required field was missing or empty
	#[error("This field is required.")]
	Required(String),
	/// The submitted value does not fit the field's kind or choices
	#[error("{0}")]
	Validation(String),
}

/// Result alias for single-field cleaning.
pub type FieldResult<T> = Result<T, FieldError>;

/// Clean one submitted value against its field definition.
///
/// Returns `Ok(None)` when the field was not submitted at all and is not
/// required; such fields are simply absent from the resulting document.
/// An explicit JSON `null` produces the kind's empty representation where
/// one exists (empty text, unset checkbox, cleared selection).
///
/// # Examples
///
/// ```
/// use pipit_fields::{FieldDefinition, FieldKind, FieldValue, clean_value};
/// use serde_json::json;
///
/// let definition = FieldDefinition {
///     developer_name: "title",
///     label: "Title",
///     kind: FieldKind::SingleLineText,
///     is_required: true,
///     choices: &[],
/// };
///
/// let value = clean_value(&definition, Some(&json!("  Hello  "))).unwrap();
/// assert_eq!(value, Some(FieldValue::Text("Hello".to_string())));
///
/// assert!(clean_value(&definition, None).is_err());
/// ```
pub fn clean_value(
	definition: &FieldDefinition<'_>,
	raw: Option<&JsonValue>,
) -> FieldResult<Option<FieldValue>> {
	use crate::kind::FieldKind::*;

	let required_err = || FieldError::Required(definition.developer_name.to_string());

	// Absent entirely: enforce required, otherwise leave the key out.
	let Some(raw) = raw else {
		if definition.is_required {
			return Err(required_err());
		}
		return Ok(None);
	};

	let cleaned = match definition.kind {
		SingleLineText => clean_text(raw, true)?,
		MultiLineText => clean_text(raw, false)?,
		Number => clean_number(raw)?,
		Date => clean_date(raw)?,
		Checkbox => clean_checkbox(raw)?,
		SingleSelect => clean_single_select(raw, definition)?,
		MultipleSelect => clean_multiple_select(raw, definition)?,
		OneToOneRelationship => clean_relationship(raw)?,
	};

	match cleaned {
		Some(value) if definition.is_required && value.is_empty() => Err(required_err()),
		None if definition.is_required => Err(required_err()),
		other => Ok(other),
	}
}

fn clean_text(raw: &JsonValue, strip: bool) -> FieldResult<Option<FieldValue>> {
	match raw {
		JsonValue::Null => Ok(Some(FieldValue::Text(String::new()))),
		JsonValue::String(s) => {
			let s = if strip { s.trim() } else { s.as_str() };
			Ok(Some(FieldValue::Text(s.to_string())))
		}
		_ => Err(FieldError::Validation("Value must be a string.".to_string())),
	}
}

fn clean_number(raw: &JsonValue) -> FieldResult<Option<FieldValue>> {
	let number = match raw {
		JsonValue::Null => return Ok(None),
		JsonValue::Number(n) => n
			.as_f64()
			.ok_or_else(|| FieldError::Validation("Enter a valid number.".to_string()))?,
		JsonValue::String(s) => {
			let trimmed = s.trim();
			if trimmed.is_empty() {
				return Ok(None);
			}
			trimmed
				.parse::<f64>()
				.map_err(|_| FieldError::Validation("Enter a valid number.".to_string()))?
		}
		_ => return Err(FieldError::Validation("Enter a valid number.".to_string())),
	};
	if !number.is_finite() {
		return Err(FieldError::Validation("Enter a finite number.".to_string()));
	}
	Ok(Some(FieldValue::Number(number)))
}

fn clean_date(raw: &JsonValue) -> FieldResult<Option<FieldValue>> {
	match raw {
		JsonValue::Null => Ok(None),
		JsonValue::String(s) => {
			let trimmed = s.trim();
			if trimmed.is_empty() {
				return Ok(None);
			}
			let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| {
				FieldError::Validation("Enter a valid date in YYYY-MM-DD format.".to_string())
			})?;
			Ok(Some(FieldValue::Date(date)))
		}
		_ => Err(FieldError::Validation(
			"Enter a valid date in YYYY-MM-DD format.".to_string(),
		)),
	}
}

fn clean_checkbox(raw: &JsonValue) -> FieldResult<Option<FieldValue>> {
	match raw {
		JsonValue::Null => Ok(Some(FieldValue::Checkbox(None))),
		JsonValue::Bool(b) => Ok(Some(FieldValue::Checkbox(Some(*b)))),
		JsonValue::String(s) => match s.trim().to_lowercase().as_str() {
			"true" | "on" | "1" => Ok(Some(FieldValue::Checkbox(Some(true)))),
			"false" | "0" => Ok(Some(FieldValue::Checkbox(Some(false)))),
			"" => Ok(Some(FieldValue::Checkbox(None))),
			_ => Err(FieldError::Validation("Enter true or false.".to_string())),
		},
		_ => Err(FieldError::Validation("Enter true or false.".to_string())),
	}
}

fn validate_choice(definition: &FieldDefinition<'_>, developer_name: &str) -> FieldResult<()> {
	let choice = definition
		.choices
		.iter()
		.find(|c| c.developer_name == *developer_name);
	match choice {
		Some(c) if c.disabled => Err(FieldError::Validation(format!(
			"'{}' is disabled and can no longer be selected.",
			developer_name
		))),
		Some(_) => Ok(()),
		None => Err(FieldError::Validation(format!(
			"Select a valid choice. '{}' is not one of the available choices.",
			developer_name
		))),
	}
}

fn clean_single_select(
	raw: &JsonValue,
	definition: &FieldDefinition<'_>,
) -> FieldResult<Option<FieldValue>> {
	match raw {
		JsonValue::Null => Ok(Some(FieldValue::Choice(None))),
		JsonValue::String(s) => {
			let trimmed = s.trim();
			if trimmed.is_empty() {
				return Ok(Some(FieldValue::Choice(None)));
			}
			validate_choice(definition, trimmed)?;
			Ok(Some(FieldValue::Choice(Some(trimmed.to_string()))))
		}
		_ => Err(FieldError::Validation("Select a valid choice.".to_string())),
	}
}

fn clean_multiple_select(
	raw: &JsonValue,
	definition: &FieldDefinition<'_>,
) -> FieldResult<Option<FieldValue>> {
	let entries: Vec<String> = match raw {
		JsonValue::Null => Vec::new(),
		// A lone string is accepted as a one-element selection
		JsonValue::String(s) if !s.trim().is_empty() => vec![s.trim().to_string()],
		JsonValue::String(_) => Vec::new(),
		JsonValue::Array(values) => {
			let mut entries = Vec::with_capacity(values.len());
			for value in values {
				match value {
					JsonValue::String(s) if !s.trim().is_empty() => {
						entries.push(s.trim().to_string());
					}
					JsonValue::String(_) => {}
					_ => {
						return Err(FieldError::Validation(
							"Selections must be strings.".to_string(),
						));
					}
				}
			}
			entries
		}
		_ => {
			return Err(FieldError::Validation(
				"Select one or more valid choices.".to_string(),
			));
		}
	};

	for entry in &entries {
		validate_choice(definition, entry)?;
	}
	Ok(Some(FieldValue::Choices(entries)))
}

fn clean_relationship(raw: &JsonValue) -> FieldResult<Option<FieldValue>> {
	match raw {
		JsonValue::Null => Ok(Some(FieldValue::Relationship(None))),
		JsonValue::String(s) => {
			let trimmed = s.trim();
			if trimmed.is_empty() {
				return Ok(Some(FieldValue::Relationship(None)));
			}
			let id = Uuid::parse_str(trimmed).map_err(|_| {
				FieldError::Validation("Select a valid related item.".to_string())
			})?;
			Ok(Some(FieldValue::Relationship(Some(id))))
		}
		_ => Err(FieldError::Validation(
			"Select a valid related item.".to_string(),
		)),
	}
}

/// Clean a whole submitted document against an active field list.
///
/// Fields are processed in schema order; every failure is collected rather
/// than stopping at the first, so the caller can redisplay the full form.
/// Raw keys that do not correspond to an active field are ignored — deleted
/// fields stop being accepted the moment they leave the active schema.
pub fn clean_document(
	definitions: &[FieldDefinition<'_>],
	raw: &RawDocument,
) -> Result<Document, ValidationErrors> {
	let mut document = Document::new();
	let mut errors = ValidationErrors::new();

	for definition in definitions {
		match clean_value(definition, raw.get(definition.developer_name)) {
			Ok(Some(value)) => {
				document.insert(definition.developer_name.to_string(), value);
			}
			Ok(None) => {}
			Err(err) => errors.push(definition.developer_name, err.to_string()),
		}
	}

	if errors.is_empty() {
		Ok(document)
	} else {
		Err(errors)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::choice::FieldChoice;
	use crate::kind::FieldKind;
	use rstest::rstest;
	use serde_json::json;

	fn definition<'a>(
		name: &'a str,
		kind: FieldKind,
		required: bool,
		choices: &'a [FieldChoice],
	) -> FieldDefinition<'a> {
		FieldDefinition {
			developer_name: name,
			label: name,
			kind,
			is_required: required,
			choices,
		}
	}

	#[rstest]
	fn test_single_line_text_strips_whitespace() {
		let def = definition("title", FieldKind::SingleLineText, false, &[]);
		let value = clean_value(&def, Some(&json!("  Hello  "))).unwrap();
		assert_eq!(value, Some(FieldValue::Text("Hello".to_string())));
	}

	#[rstest]
	fn test_multi_line_text_preserves_whitespace() {
		let def = definition("body", FieldKind::MultiLineText, false, &[]);
		let value = clean_value(&def, Some(&json!("line one\nline two\n"))).unwrap();
		assert_eq!(value, Some(FieldValue::Text("line one\nline two\n".to_string())));
	}

	#[rstest]
	fn test_required_text_rejects_missing_and_blank() {
		let def = definition("title", FieldKind::SingleLineText, true, &[]);
		assert!(clean_value(&def, None).is_err());
		assert!(clean_value(&def, Some(&json!(""))).is_err());
		assert!(clean_value(&def, Some(&json!("   "))).is_err());
	}

	#[rstest]
	fn test_text_rejects_non_string() {
		let def = definition("title", FieldKind::SingleLineText, false, &[]);
		assert!(clean_value(&def, Some(&json!(42))).is_err());
	}

	#[rstest]
	#[case(json!(4.5), 4.5)]
	#[case(json!("3.25"), 3.25)]
	#[case(json!(-7), -7.0)]
	fn test_number_coercion(#[case] raw: serde_json::Value, #[case] expected: f64) {
		let def = definition("rating", FieldKind::Number, false, &[]);
		let value = clean_value(&def, Some(&raw)).unwrap();
		assert_eq!(value, Some(FieldValue::Number(expected)));
	}

	#[rstest]
	fn test_number_rejects_garbage() {
		let def = definition("rating", FieldKind::Number, false, &[]);
		assert!(clean_value(&def, Some(&json!("abc"))).is_err());
		assert!(clean_value(&def, Some(&json!(true))).is_err());
	}

	#[rstest]
	fn test_date_parses_iso_format() {
		let def = definition("published_on", FieldKind::Date, false, &[]);
		let value = clean_value(&def, Some(&json!("2024-06-01"))).unwrap();
		assert_eq!(
			value,
			Some(FieldValue::Date(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()))
		);
		assert!(clean_value(&def, Some(&json!("06/01/2024"))).is_err());
	}

	#[rstest]
	fn test_checkbox_unset_vs_false() {
		let def = definition("featured", FieldKind::Checkbox, false, &[]);
		assert_eq!(
			clean_value(&def, Some(&json!(null))).unwrap(),
			Some(FieldValue::Checkbox(None))
		);
		assert_eq!(
			clean_value(&def, Some(&json!(false))).unwrap(),
			Some(FieldValue::Checkbox(Some(false)))
		);
	}

	#[rstest]
	fn test_required_checkbox_needs_a_state() {
		let def = definition("accepted", FieldKind::Checkbox, true, &[]);
		assert!(clean_value(&def, Some(&json!(null))).is_err());
		assert!(clean_value(&def, Some(&json!(false))).is_ok());
	}

	fn color_choices() -> Vec<FieldChoice> {
		let mut retired = FieldChoice::new("Green").unwrap();
		retired.disabled = true;
		vec![
			FieldChoice::new("Red").unwrap(),
			FieldChoice::new("Blue").unwrap(),
			retired,
		]
	}

	#[rstest]
	fn test_single_select_validates_membership() {
		let choices = color_choices();
		let def = definition("color", FieldKind::SingleSelect, false, &choices);

		assert_eq!(
			clean_value(&def, Some(&json!("red"))).unwrap(),
			Some(FieldValue::Choice(Some("red".to_string())))
		);
		assert!(clean_value(&def, Some(&json!("purple"))).is_err());
	}

	#[rstest]
	fn test_select_rejects_disabled_choice() {
		let choices = color_choices();
		let def = definition("color", FieldKind::SingleSelect, false, &choices);
		assert!(clean_value(&def, Some(&json!("green"))).is_err());
	}

	#[rstest]
	fn test_multiple_select_preserves_order() {
		let choices = color_choices();
		let def = definition("colors", FieldKind::MultipleSelect, false, &choices);
		let value = clean_value(&def, Some(&json!(["blue", "red"]))).unwrap();
		assert_eq!(
			value,
			Some(FieldValue::Choices(vec![
				"blue".to_string(),
				"red".to_string()
			]))
		);
	}

	#[rstest]
	fn test_required_multiple_select_rejects_empty_set() {
		let choices = color_choices();
		let def = definition("colors", FieldKind::MultipleSelect, true, &choices);
		assert!(clean_value(&def, Some(&json!([]))).is_err());
	}

	#[rstest]
	fn test_relationship_parses_uuid() {
		let def = definition("author", FieldKind::OneToOneRelationship, false, &[]);
		let id = Uuid::new_v4();
		let value = clean_value(&def, Some(&json!(id.to_string()))).unwrap();
		assert_eq!(value, Some(FieldValue::Relationship(Some(id))));
		assert!(clean_value(&def, Some(&json!("not-a-uuid"))).is_err());
	}

	#[rstest]
	fn test_clean_document_collects_all_errors() {
		let defs = [
			definition("title", FieldKind::SingleLineText, true, &[]),
			definition("rating", FieldKind::Number, true, &[]),
		];
		let raw = json!({"rating": "abc"});

		let errors = clean_document(&defs, raw.as_object().unwrap()).unwrap_err();
		assert_eq!(errors.len(), 2);
		assert!(errors.has_field("title"));
		assert!(errors.has_field("rating"));
	}

	#[rstest]
	fn test_clean_document_ignores_unknown_keys() {
		let defs = [definition("title", FieldKind::SingleLineText, false, &[])];
		let raw = json!({"title": "Hello", "legacy_field": "ignored"});

		let document = clean_document(&defs, raw.as_object().unwrap()).unwrap();
		assert_eq!(document.len(), 1);
		assert!(document.contains_key("title"));
	}
}
