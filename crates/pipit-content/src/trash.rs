//! Soft-deleted content items
//!
//! Deletion is a two-step lifecycle: a delete moves the item into the trash
//! with its resolved title, route, and documents; from there it is either
//! restored under its original id and route, or purged for good along with
//! its revision history.

use pipit_core::{AuditStamp, ContentItemId, ContentTypeId, DeletionStamp, TemplateId};
use pipit_fields::Document;

/// Where a content item currently is in its deletion lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemState {
	/// Live in the content store
	Active,
	/// In the trash, restorable
	Trashed,
	/// Gone — never existed, or permanently purged
	Purged,
}

/// A content item parked in the trash.
///
/// Carries everything a restore needs to bring the item back exactly as it
/// was: same id, same route path, same draft and published documents.
#[derive(Debug, Clone)]
pub struct DeletedContentItem {
	/// The item's original identifier, reused on restore
	pub id: ContentItemId,
	/// Owning content type
	pub content_type_id: ContentTypeId,
	/// Primary-field text resolved at deletion time, for trash listings
	pub primary_text: String,
	/// The route path the item owned, re-claimed on restore
	pub route_path: String,
	/// Published document at deletion time, if the item was ever published
	pub published: Option<Document>,
	/// Draft document at deletion time
	pub draft: Document,
	/// Whether the item was publicly visible when deleted
	pub was_published: bool,
	/// Render template assignment
	pub web_template_id: Option<TemplateId>,
	/// Audit bookkeeping carried over from the live item
	pub audit: AuditStamp,
	/// Who deleted the item, and when
	pub deleted: DeletionStamp,
}
