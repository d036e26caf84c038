//! Error taxonomy for engine operations
//!
//! Expected failures fall into three buckets: validation (field-scoped,
//! reported without mutating state), not-found, and conflict (unique
//! constraint violations detected at commit). Mutating operations return
//! [`EngineResult`]; only genuinely unexpected failures should panic.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A single field-scoped validation message.
///
/// `field` holds the developer name of the offending field, or a pseudo-field
/// name such as `developer_name` or `route_path` for entity-level problems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMessage {
	/// Field the message applies to
	pub field: String,
	/// Human-readable description of the problem
	pub message: String,
}

/// An ordered list of field-scoped validation messages.
///
/// Order follows the order in which problems were detected, which for
/// document validation is the schema's field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
	errors: Vec<FieldMessage>,
}

impl ValidationErrors {
	/// Create an empty error list.
	pub fn new() -> Self {
		Self::default()
	}

	/// Create a list holding a single message.
	pub fn of(field: impl Into<String>, message: impl Into<String>) -> Self {
		let mut errors = Self::new();
		errors.push(field, message);
		errors
	}

	/// Append a message.
	pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
		self.errors.push(FieldMessage {
			field: field.into(),
			message: message.into(),
		});
	}

	/// Append every message from `other`.
	pub fn merge(&mut self, other: ValidationErrors) {
		self.errors.extend(other.errors);
	}

	/// Returns true when no messages have been recorded.
	pub fn is_empty(&self) -> bool {
		self.errors.is_empty()
	}

	/// Number of recorded messages.
	pub fn len(&self) -> usize {
		self.errors.len()
	}

	/// Iterate over the recorded messages in order.
	pub fn iter(&self) -> impl Iterator<Item = &FieldMessage> {
		self.errors.iter()
	}

	/// Returns true when any message targets the given field.
	pub fn has_field(&self, field: &str) -> bool {
		self.errors.iter().any(|e| e.field == field)
	}

	/// Convert into `Err(EngineError::Validation)` when non-empty.
	pub fn into_result(self) -> EngineResult<()> {
		if self.is_empty() {
			Ok(())
		} else {
			Err(EngineError::Validation(self))
		}
	}
}

impl fmt::Display for ValidationErrors {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (i, e) in self.errors.iter().enumerate() {
			if i > 0 {
				write!(f, "; ")?;
			}
			write!(f, "{}: {}", e.field, e.message)?;
		}
		Ok(())
	}
}

impl IntoIterator for ValidationErrors {
	type Item = FieldMessage;
	type IntoIter = std::vec::IntoIter<FieldMessage>;

	fn into_iter(self) -> Self::IntoIter {
		self.errors.into_iter()
	}
}

/// Engine-level error returned by every mutating operation.
#[derive(Debug, Error)]
pub enum EngineError {
	/// One or more submitted values failed validation; no state was mutated.
	#[error("validation failed: {0}")]
	Validation(ValidationErrors),

	/// The referenced entity does not exist (or has been purged).
	#[error("{entity} not found: {id}")]
	NotFound {
		/// Entity kind, e.g. `"content item"`
		entity: &'static str,
		/// Stringified identifier that failed to resolve
		id: String,
	},

	/// A uniqueness constraint was violated at commit time.
	#[error("conflict: {0}")]
	Conflict(String),
}

impl EngineError {
	/// Shorthand for a single-message validation error.
	pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
		EngineError::Validation(ValidationErrors::of(field, message))
	}

	/// Shorthand for a not-found error.
	pub fn not_found(entity: &'static str, id: impl fmt::Display) -> Self {
		EngineError::NotFound {
			entity,
			id: id.to_string(),
		}
	}

	/// Returns true for the validation variant.
	pub fn is_validation(&self) -> bool {
		matches!(self, EngineError::Validation(_))
	}

	/// Returns true for the not-found variant.
	pub fn is_not_found(&self) -> bool {
		matches!(self, EngineError::NotFound { .. })
	}
}

/// Result alias used throughout the engine.
pub type EngineResult<T> = Result<T, EngineError>;
