//! Content items and the draft/publish lifecycle
//!
//! Every item carries two documents: a draft that editing always writes to,
//! and a published document that only a publish updates. Publishing
//! snapshots the new published document into the revision log, so the
//! published document of a live item always equals its latest revision.
//! Deletion moves items into the trash (see [`crate::trash`]); purging is
//! the only operation that destroys history.

use crate::routes::{RouteRegistry, RouteTarget};
use crate::schema::ContentType;
use crate::trash::{DeletedContentItem, ItemState};
use chrono::{Datelike, Utc};
use dashmap::DashMap;
use pipit_core::{
	AuditStamp, ContentItemId, DeletionStamp, EngineError, EngineResult, OrganizationSettings,
	PageLimits, PageRequest, Paged, RequestContext, Revision, RevisionId, RevisionLog,
	RevisionSort, TemplateId,
};
use pipit_fields::{Document, NoRelatedItems, RawDocument, clean_document, display_value};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// One record of a content type.
#[derive(Debug, Clone)]
pub struct ContentItem {
	/// Item identifier
	pub id: ContentItemId,
	/// Owning content type
	pub content_type_id: pipit_core::ContentTypeId,
	/// Whether the item is publicly visible
	pub is_published: bool,
	/// The document editing writes to
	pub draft: Document,
	/// The document the public surface renders, present once first published
	pub published: Option<Document>,
	/// The item's unique public path
	pub route_path: String,
	/// Render template assignment
	pub web_template_id: Option<TemplateId>,
	/// Audit bookkeeping
	pub audit: AuditStamp,
}

impl ContentItem {
	/// Whether the draft differs from what is published. True for items
	/// that have never been published.
	pub fn has_unsaved_changes(&self) -> bool {
		self.published.as_ref() != Some(&self.draft)
	}

	/// Alias for [`ContentItem::has_unsaved_changes`], matching the
	/// admin's "Draft" badge.
	pub fn is_draft(&self) -> bool {
		self.has_unsaved_changes()
	}

	/// The item's human-readable title: the display rendering of its
	/// primary field, from the published document when there is one.
	pub fn primary_text(&self, content_type: &ContentType, org: &OrganizationSettings) -> String {
		let Some(field) = content_type.primary_field() else {
			return self.id.to_string();
		};
		let document = self.published.as_ref().unwrap_or(&self.draft);
		match document.get(field.developer_name.as_str()) {
			Some(value) => display_value(value, &field.definition(), org, &NoRelatedItems),
			None => String::new(),
		}
	}
}

/// The store of live content items, their revisions, and the trash.
#[derive(Debug)]
pub struct ContentStore {
	items: DashMap<ContentItemId, ContentItem>,
	revisions: RevisionLog<Document>,
	trash: DashMap<ContentItemId, DeletedContentItem>,
	routes: Arc<RouteRegistry>,
}

impl ContentStore {
	/// Create an empty store sharing the given route registry.
	pub fn new(routes: Arc<RouteRegistry>) -> Self {
		Self {
			items: DashMap::new(),
			revisions: RevisionLog::new(),
			trash: DashMap::new(),
			routes,
		}
	}

	/// The route registry this store claims paths in.
	pub fn routes(&self) -> &Arc<RouteRegistry> {
		&self.routes
	}

	/// Create a content item from submitted values.
	///
	/// Values are cleaned against the content type's active schema; the
	/// route path comes from the type's default route template. With
	/// `save_as_draft` false the item is published immediately, which
	/// appends its first revision.
	pub async fn create_item(
		&self,
		content_type: &ContentType,
		values: &RawDocument,
		save_as_draft: bool,
		web_template_id: Option<TemplateId>,
		ctx: &RequestContext,
	) -> EngineResult<ContentItem> {
		let definitions = content_type.definitions();
		let draft = clean_document(&definitions, values).map_err(EngineError::Validation)?;

		let id = Uuid::new_v4();
		let route_path = route_from_template(content_type, &draft, id, &ctx.organization);
		let route_path = self
			.routes
			.claim(&route_path, RouteTarget::ContentItem(id))?;

		let mut item = ContentItem {
			id,
			content_type_id: content_type.id,
			is_published: false,
			draft,
			published: None,
			route_path,
			web_template_id,
			audit: AuditStamp::new(ctx),
		};
		if !save_as_draft {
			self.publish_document(&mut item, ctx);
		}
		info!(
			content_type = %content_type.developer_name,
			item_id = %item.id,
			published = item.is_published,
			"created content item"
		);
		self.items.insert(item.id, item.clone());
		Ok(item)
	}

	/// Fetch a live content item.
	pub async fn get(&self, id: ContentItemId) -> EngineResult<ContentItem> {
		self.items
			.get(&id)
			.map(|item| item.clone())
			.ok_or_else(|| EngineError::not_found("content item", id))
	}

	/// All live items of one content type, oldest first.
	pub async fn list_by_type(
		&self,
		content_type_id: pipit_core::ContentTypeId,
	) -> Vec<ContentItem> {
		let mut items: Vec<ContentItem> = self
			.items
			.iter()
			.filter(|item| item.content_type_id == content_type_id)
			.map(|item| item.clone())
			.collect();
		items.sort_by(|a, b| {
			a.audit
				.created_at
				.cmp(&b.audit.created_at)
				.then_with(|| a.id.cmp(&b.id))
		});
		items
	}

	/// Edit a content item's document.
	///
	/// The submitted values replace the active fields of the draft; keys
	/// belonging to soft-deleted fields are carried over untouched so
	/// historical data survives schema changes. With `save_as_draft` false
	/// the new draft is published, appending a revision.
	pub async fn edit_item(
		&self,
		id: ContentItemId,
		content_type: &ContentType,
		values: &RawDocument,
		save_as_draft: bool,
		ctx: &RequestContext,
	) -> EngineResult<ContentItem> {
		let definitions = content_type.definitions();
		let cleaned = clean_document(&definitions, values).map_err(EngineError::Validation)?;

		let mut entry = self
			.items
			.get_mut(&id)
			.ok_or_else(|| EngineError::not_found("content item", id))?;

		// Rebuild the draft in schema order, then carry over legacy keys
		// the active schema no longer knows.
		let mut draft = cleaned;
		let active: Vec<&str> = definitions.iter().map(|d| d.developer_name).collect();
		for (key, value) in entry.draft.iter() {
			if !active.contains(&key.as_str()) {
				draft.insert(key.clone(), value.clone());
			}
		}
		entry.draft = draft;
		entry.audit.touch(ctx);
		if !save_as_draft {
			self.publish_document(&mut entry, ctx);
		}
		debug!(item_id = %id, published = !save_as_draft, "edited content item");
		Ok(entry.clone())
	}

	/// Change an item's route path and template assignment. `None` keeps
	/// the current value.
	pub async fn edit_item_settings(
		&self,
		id: ContentItemId,
		route_path: Option<String>,
		web_template_id: Option<TemplateId>,
		ctx: &RequestContext,
	) -> EngineResult<ContentItem> {
		let mut entry = self
			.items
			.get_mut(&id)
			.ok_or_else(|| EngineError::not_found("content item", id))?;

		if let Some(new_path) = route_path {
			let claimed = self.routes.reassign(
				&entry.route_path,
				&new_path,
				RouteTarget::ContentItem(id),
			)?;
			entry.route_path = claimed;
		}
		if web_template_id.is_some() {
			entry.web_template_id = web_template_id;
		}
		entry.audit.touch(ctx);
		Ok(entry.clone())
	}

	/// Remove an item from the public surface without touching its draft.
	pub async fn unpublish(&self, id: ContentItemId, ctx: &RequestContext) -> EngineResult<ContentItem> {
		let mut entry = self
			.items
			.get_mut(&id)
			.ok_or_else(|| EngineError::not_found("content item", id))?;
		if !entry.is_published {
			return Err(EngineError::validation(
				"item",
				"The item is not published.",
			));
		}
		entry.is_published = false;
		entry.published = None;
		entry.audit.touch(ctx);
		info!(item_id = %id, "unpublished content item");
		Ok(entry.clone())
	}

	/// Reset the draft back to the last published document.
	///
	/// An item that has never been published has nothing to discard to;
	/// that is a validation error. An unpublished item falls back to its
	/// latest revision.
	pub async fn discard_draft(
		&self,
		id: ContentItemId,
		ctx: &RequestContext,
	) -> EngineResult<ContentItem> {
		let mut entry = self
			.items
			.get_mut(&id)
			.ok_or_else(|| EngineError::not_found("content item", id))?;

		if let Some(published) = &entry.published {
			entry.draft = published.clone();
		} else if let Some(revision) = self.revisions.latest(id) {
			entry.draft = revision.snapshot;
		} else {
			return Err(EngineError::validation(
				"draft",
				"The item has never been published; there is no version to discard to.",
			));
		}
		entry.audit.touch(ctx);
		Ok(entry.clone())
	}

	/// Move an item to the trash, releasing its route.
	pub async fn delete(
		&self,
		id: ContentItemId,
		content_type: &ContentType,
		ctx: &RequestContext,
	) -> EngineResult<DeletedContentItem> {
		let (_, item) = self
			.items
			.remove(&id)
			.ok_or_else(|| EngineError::not_found("content item", id))?;
		self.routes.release(&item.route_path);

		let deleted = DeletedContentItem {
			id: item.id,
			content_type_id: item.content_type_id,
			primary_text: item.primary_text(content_type, &ctx.organization),
			route_path: item.route_path,
			published: item.published,
			draft: item.draft,
			was_published: item.is_published,
			web_template_id: item.web_template_id,
			audit: item.audit,
			deleted: DeletionStamp::new(ctx),
		};
		info!(item_id = %id, "moved content item to trash");
		self.trash.insert(id, deleted.clone());
		Ok(deleted)
	}

	/// Bring a trashed item back under its original id, route, and content.
	pub async fn restore(
		&self,
		id: ContentItemId,
		ctx: &RequestContext,
	) -> EngineResult<ContentItem> {
		let deleted = self
			.trash
			.get(&id)
			.map(|d| d.clone())
			.ok_or_else(|| EngineError::not_found("deleted content item", id))?;

		// Claim before removing from the trash: a collision leaves the
		// trash entry intact.
		let route_path = self
			.routes
			.claim(&deleted.route_path, RouteTarget::ContentItem(id))?;
		self.trash.remove(&id);

		let mut item = ContentItem {
			id: deleted.id,
			content_type_id: deleted.content_type_id,
			is_published: deleted.was_published,
			draft: deleted.draft,
			published: deleted.published,
			route_path,
			web_template_id: deleted.web_template_id,
			audit: deleted.audit,
		};
		item.audit.touch(ctx);
		info!(item_id = %id, "restored content item");
		self.items.insert(id, item.clone());
		Ok(item)
	}

	/// Permanently destroy a trashed item and its revision history.
	pub async fn purge(&self, id: ContentItemId, _ctx: &RequestContext) -> EngineResult<()> {
		self.trash
			.remove(&id)
			.ok_or_else(|| EngineError::not_found("deleted content item", id))?;
		let removed = self.revisions.purge_parent(id);
		info!(item_id = %id, revisions_removed = removed, "purged content item");
		Ok(())
	}

	/// Adopt an old revision's content as the item's current draft and
	/// published document.
	///
	/// The adopted snapshot is appended as a fresh revision, so history
	/// only ever grows and the published document still equals the latest
	/// revision afterwards.
	pub async fn revert(
		&self,
		revision_id: RevisionId,
		ctx: &RequestContext,
	) -> EngineResult<ContentItem> {
		let revision = self
			.revisions
			.get(revision_id)
			.ok_or_else(|| EngineError::not_found("content item revision", revision_id))?;

		let mut entry = self
			.items
			.get_mut(&revision.parent_id)
			.ok_or_else(|| EngineError::not_found("content item", revision.parent_id))?;

		entry.draft = revision.snapshot.clone();
		entry.published = Some(revision.snapshot.clone());
		entry.is_published = true;
		entry.audit.touch(ctx);
		self.revisions.append(entry.id, revision.snapshot, ctx);
		info!(item_id = %entry.id, %revision_id, "reverted content item");
		Ok(entry.clone())
	}

	/// One page of an item's revision history.
	pub async fn revisions_for(
		&self,
		id: ContentItemId,
		request: PageRequest,
		sort: RevisionSort,
	) -> Paged<Revision<Document>> {
		self.revisions.list(id, request, &PageLimits::default(), sort)
	}

	/// Number of revisions recorded for an item.
	pub async fn revision_count(&self, id: ContentItemId) -> usize {
		self.revisions.count(id)
	}

	/// Where the item currently is in its deletion lifecycle.
	pub async fn state_of(&self, id: ContentItemId) -> ItemState {
		if self.items.contains_key(&id) {
			ItemState::Active
		} else if self.trash.contains_key(&id) {
			ItemState::Trashed
		} else {
			ItemState::Purged
		}
	}

	/// Fetch a trashed item.
	pub async fn get_deleted(&self, id: ContentItemId) -> EngineResult<DeletedContentItem> {
		self.trash
			.get(&id)
			.map(|d| d.clone())
			.ok_or_else(|| EngineError::not_found("deleted content item", id))
	}

	/// Everything in the trash, most recently deleted first.
	pub async fn deleted_items(&self) -> Vec<DeletedContentItem> {
		let mut items: Vec<DeletedContentItem> =
			self.trash.iter().map(|d| d.clone()).collect();
		items.sort_by(|a, b| b.deleted.deleted_at.cmp(&a.deleted.deleted_at));
		items
	}

	fn publish_document(&self, item: &mut ContentItem, ctx: &RequestContext) {
		item.published = Some(item.draft.clone());
		item.is_published = true;
		self.revisions.append(item.id, item.draft.clone(), ctx);
	}
}

/// Substitute a content type's default route template for a new item.
///
/// `{PrimaryField}` uses the slugified display text of the item's primary
/// field, falling back to the item id when that renders empty.
fn route_from_template(
	content_type: &ContentType,
	document: &Document,
	id: ContentItemId,
	org: &OrganizationSettings,
) -> String {
	let primary = content_type
		.primary_field()
		.and_then(|field| {
			document
				.get(field.developer_name.as_str())
				.map(|value| display_value(value, &field.definition(), org, &NoRelatedItems))
		})
		.map(|text| slugify(&text))
		.filter(|slug| !slug.is_empty())
		.unwrap_or_else(|| id.to_string());

	let now = Utc::now();
	content_type
		.default_route_template
		.replace("{ContentTypeDeveloperName}", content_type.developer_name.as_str())
		.replace("{PrimaryField}", &primary)
		.replace("{Id}", &id.to_string())
		.replace("{CurrentYear}", &now.year().to_string())
		.replace("{CurrentMonth}", &format!("{:02}", now.month()))
}

/// Reduce arbitrary display text to a route segment.
fn slugify(text: &str) -> String {
	let mut slug = String::with_capacity(text.len());
	let mut last_was_dash = true;
	for c in text.chars() {
		if c.is_alphanumeric() {
			slug.extend(c.to_lowercase());
			last_was_dash = false;
		} else if !last_was_dash {
			slug.push('-');
			last_was_dash = true;
		}
	}
	while slug.ends_with('-') {
		slug.pop();
	}
	slug
}
