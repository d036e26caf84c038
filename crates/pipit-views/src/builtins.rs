//! Built-in fields every content type exposes
//!
//! Columns, filters, and sorts may reference these names alongside the
//! content type's own fields. They survive any schema change, so a view
//! that only uses built-ins never goes stale.

use pipit_fields::FieldKind;

/// The item's primary-field display text.
pub const BUILT_IN_PRIMARY_FIELD: &str = "PrimaryField";

/// When the item was created.
pub const BUILT_IN_CREATED_AT: &str = "CreationTime";

/// When the item was last modified.
pub const BUILT_IN_UPDATED_AT: &str = "LastModificationTime";

/// All built-in field names.
pub const BUILT_IN_FIELDS: [&str; 3] = [
	BUILT_IN_PRIMARY_FIELD,
	BUILT_IN_CREATED_AT,
	BUILT_IN_UPDATED_AT,
];

/// The kind a built-in field behaves as for operator and sort purposes.
pub fn built_in_kind(name: &str) -> Option<FieldKind> {
	match name {
		BUILT_IN_PRIMARY_FIELD => Some(FieldKind::SingleLineText),
		BUILT_IN_CREATED_AT | BUILT_IN_UPDATED_AT => Some(FieldKind::Date),
		_ => None,
	}
}
