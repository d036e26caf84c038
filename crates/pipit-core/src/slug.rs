//! Developer names: immutable, URL-safe slug identifiers
//!
//! A developer name identifies a content type, field, view, or template in
//! routes, stored documents, and template variables. It is distinct from the
//! display label, assigned once at creation, and never changed afterwards.

use crate::error::{EngineError, EngineResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowercase letters, digits, and underscores, with single hyphens allowed
/// between runs. No leading or trailing hyphen.
static SLUG_REGEX: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"^[a-z0-9_]+(?:-[a-z0-9_]+)*$").expect("slug regex is valid"));

const MAX_LENGTH: usize = 64;

/// An immutable, URL-safe slug identifier.
///
/// # Examples
///
/// ```
/// use pipit_core::slug::DeveloperName;
///
/// let name = DeveloperName::parse("Blog Posts").unwrap();
/// assert_eq!(name.as_str(), "blog-posts");
///
/// assert!(DeveloperName::parse("-leading").is_err());
/// assert!(DeveloperName::parse("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeveloperName(String);

impl DeveloperName {
	/// Normalize and validate `input` into a developer name.
	///
	/// Input is trimmed and lowercased, and interior whitespace is folded
	/// into single hyphens before validation, so `"Blog Posts"` becomes
	/// `blog-posts`. Anything that still fails the slug rules is a
	/// validation error on the pseudo-field `developer_name`.
	pub fn parse(input: &str) -> EngineResult<Self> {
		let normalized = input
			.trim()
			.to_lowercase()
			.split_whitespace()
			.collect::<Vec<_>>()
			.join("-");

		if normalized.is_empty() {
			return Err(EngineError::validation(
				"developer_name",
				"Enter a non-empty developer name.",
			));
		}
		if normalized.chars().count() > MAX_LENGTH {
			return Err(EngineError::validation(
				"developer_name",
				format!("Ensure the developer name has at most {} characters.", MAX_LENGTH),
			));
		}
		if !SLUG_REGEX.is_match(&normalized) {
			return Err(EngineError::validation(
				"developer_name",
				"Enter a valid developer name consisting of lowercase letters, numbers, \
				 hyphens, or underscores. It must not start or end with a hyphen.",
			));
		}

		Ok(Self(normalized))
	}

	/// The slug as a string slice.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for DeveloperName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl AsRef<str> for DeveloperName {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl PartialEq<str> for DeveloperName {
	fn eq(&self, other: &str) -> bool {
		self.0 == other
	}
}

impl PartialEq<&str> for DeveloperName {
	fn eq(&self, other: &&str) -> bool {
		self.0 == *other
	}
}

impl TryFrom<String> for DeveloperName {
	type Error = EngineError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		DeveloperName::parse(&value)
	}
}

impl From<DeveloperName> for String {
	fn from(name: DeveloperName) -> Self {
		name.0
	}
}
