//! View execution
//!
//! Runs a view against the content store: published items only, the stored
//! filter and sort always applied, client overrides only when the view
//! allows them, page size clamped to the view's maximum. Column projection
//! produces display strings; stale references to deleted fields are
//! skipped, never errors.

use crate::builtins::{BUILT_IN_CREATED_AT, BUILT_IN_PRIMARY_FIELD, BUILT_IN_UPDATED_AT};
use crate::view::View;
use indexmap::IndexMap;
use pipit_content::items::{ContentItem, ContentStore};
use pipit_content::schema::{ContentType, SchemaRegistry};
use pipit_core::{
	ContentItemId, EngineResult, OrganizationSettings, PageRequest, Paged,
};
use pipit_fields::{Document, FieldValue, display_value};
use pipit_query::{FilterNode, SortEntry, apply_sort, matches};
use std::collections::HashMap;
use uuid::Uuid;

/// Caller-supplied query parameters layered onto a view.
#[derive(Debug, Clone, Default)]
pub struct ViewQuery {
	/// Requested page and size; the size clamps to the view's maximum
	pub page: PageRequest,
	/// Extra filter, honored only when the view allows client overrides
	pub filter: Option<FilterNode>,
	/// Replacement sort, honored only when the view allows client overrides
	pub sort: Vec<SortEntry>,
}

/// One projected row of a view's result.
#[derive(Debug, Clone)]
pub struct ViewRow {
	/// The underlying content item
	pub item_id: ContentItemId,
	/// The item's public path
	pub route_path: String,
	/// Column name → display string, in the view's column order. Columns
	/// referencing deleted fields are absent.
	pub columns: IndexMap<String, String>,
}

/// Execute a view and project one page of rows.
pub async fn run_view(
	view: &View,
	query: &ViewQuery,
	schemas: &SchemaRegistry,
	store: &ContentStore,
	org: &OrganizationSettings,
) -> EngineResult<Paged<ViewRow>> {
	let content_type = schemas.get(view.content_type_id).await?;

	let mut candidates: Vec<(ContentItem, Document)> = store
		.list_by_type(view.content_type_id)
		.await
		.into_iter()
		.filter(|item| item.is_published && item.published.is_some())
		.map(|item| {
			let document = augmented_document(&item, &content_type, org);
			(item, document)
		})
		.collect();

	if let Some(filter) = &view.filter {
		candidates.retain(|(_, document)| matches(filter, document));
	}

	let client_overrides = !view.ignore_client_filter_and_sort;
	if client_overrides && let Some(filter) = &query.filter {
		candidates.retain(|(_, document)| matches(filter, document));
	}

	let sort = if client_overrides && !query.sort.is_empty() {
		&query.sort
	} else {
		&view.sort
	};
	apply_sort(&mut candidates, sort, |(_, document), field| {
		document.get(field).cloned()
	});

	let page = Paged::slice(candidates, query.page, &view.limits);
	let related = prefetch_related(&page.items, &content_type, schemas, store, org).await;

	let rows = page
		.items
		.into_iter()
		.map(|(item, document)| project_row(&item, &document, view, &content_type, org, &related))
		.collect();
	Ok(Paged {
		items: rows,
		total: page.total,
		page: page.page,
		page_size: page.page_size,
	})
}

/// The item's published document plus the built-in fields, so filters and
/// sorts can reference both uniformly.
fn augmented_document(
	item: &ContentItem,
	content_type: &ContentType,
	org: &OrganizationSettings,
) -> Document {
	let mut document = item.published.clone().unwrap_or_default();
	document.insert(
		BUILT_IN_PRIMARY_FIELD.to_string(),
		FieldValue::Text(item.primary_text(content_type, org)),
	);
	document.insert(
		BUILT_IN_CREATED_AT.to_string(),
		FieldValue::Date(item.audit.created_at.date_naive()),
	);
	document.insert(
		BUILT_IN_UPDATED_AT.to_string(),
		FieldValue::Date(item.audit.updated_at.date_naive()),
	);
	document
}

/// Resolve the primary texts of every relationship target on the served
/// page in one pass, so projection never reaches back into the store.
async fn prefetch_related(
	rows: &[(ContentItem, Document)],
	content_type: &ContentType,
	schemas: &SchemaRegistry,
	store: &ContentStore,
	org: &OrganizationSettings,
) -> HashMap<Uuid, String> {
	let mut targets: Vec<Uuid> = Vec::new();
	for field in content_type.active_fields().filter(|f| f.kind.is_relationship()) {
		for (item, _) in rows {
			let document = item.published.as_ref().unwrap_or(&item.draft);
			if let Some(value) = document.get(field.developer_name.as_str())
				&& let Some(target) = value.as_relationship()
				&& !targets.contains(&target)
			{
				targets.push(target);
			}
		}
	}

	let mut related = HashMap::new();
	for target in targets {
		let Ok(item) = store.get(target).await else {
			continue;
		};
		let Ok(target_type) = schemas.get(item.content_type_id).await else {
			continue;
		};
		related.insert(target, item.primary_text(&target_type, org));
	}
	related
}

fn project_row(
	item: &ContentItem,
	document: &Document,
	view: &View,
	content_type: &ContentType,
	org: &OrganizationSettings,
	related: &HashMap<Uuid, String>,
) -> ViewRow {
	let mut columns = IndexMap::new();
	for column in &view.columns {
		match column.as_str() {
			BUILT_IN_PRIMARY_FIELD => {
				columns.insert(column.clone(), item.primary_text(content_type, org));
			}
			BUILT_IN_CREATED_AT => {
				columns.insert(column.clone(), org.format_datetime(item.audit.created_at));
			}
			BUILT_IN_UPDATED_AT => {
				columns.insert(column.clone(), org.format_datetime(item.audit.updated_at));
			}
			name => {
				// Stale column references are skipped rather than erroring.
				let Some(field) = content_type.field(name) else {
					continue;
				};
				let text = document
					.get(name)
					.map(|value| display_value(value, &field.definition(), org, related))
					.unwrap_or_default();
				columns.insert(column.clone(), text);
			}
		}
	}
	ViewRow {
		item_id: item.id,
		route_path: item.route_path.clone(),
		columns,
	}
}
