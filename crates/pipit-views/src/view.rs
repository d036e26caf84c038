//! View entities and their store

use crate::builtins::built_in_kind;
use dashmap::DashMap;
use pipit_content::routes::{RouteRegistry, RouteTarget};
use pipit_content::schema::ContentType;
use pipit_core::{
	AuditStamp, ContentTypeId, DeveloperName, EngineError, EngineResult, PageLimits,
	RequestContext, UserId, ViewId,
};
use pipit_fields::FieldKind;
use pipit_query::{FilterNode, SortEntry};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::builtins::{BUILT_IN_CREATED_AT, BUILT_IN_PRIMARY_FIELD};

/// A saved filter/sort/column query over one content type's items.
#[derive(Debug, Clone)]
pub struct View {
	/// View identifier
	pub id: ViewId,
	/// The content type this view queries
	pub content_type_id: ContentTypeId,
	/// Display label
	pub label: String,
	/// Free-form description
	pub description: String,
	/// Immutable slug, unique among the content type's views
	pub developer_name: DeveloperName,
	/// Public path of the view
	pub route_path: String,
	/// Ordered column projection: field developer names and built-ins
	pub columns: Vec<String>,
	/// Stored filter, always applied
	pub filter: Option<FilterNode>,
	/// Stored sort, first entry is the primary key
	pub sort: Vec<SortEntry>,
	/// Whether the view is reachable on the public surface
	pub is_published: bool,
	/// When set, public callers cannot override filter or sort
	pub ignore_client_filter_and_sort: bool,
	/// Default and maximum page sizes for this view
	pub limits: PageLimits,
	/// Audit bookkeeping
	pub audit: AuditStamp,
}

impl View {
	/// Kind of a field this view may reference: the content type's active
	/// fields plus the built-ins.
	pub fn referencable_kind(content_type: &ContentType, name: &str) -> Option<FieldKind> {
		built_in_kind(name).or_else(|| content_type.field_kind(name))
	}
}

/// Input for [`ViewStore::create_view`].
#[derive(Debug, Clone)]
pub struct NewView {
	/// Display label
	pub label: String,
	/// Developer name; normalized and validated as a slug
	pub developer_name: String,
	/// Free-form description
	pub description: String,
}

/// Input for [`ViewStore::edit_public_settings`].
#[derive(Debug, Clone)]
pub struct EditPublicSettings {
	/// Publish or retract the view
	pub is_published: bool,
	/// New route path, `None` to keep the current one
	pub route_path: Option<String>,
	/// Whether to drop caller-supplied filter/sort overrides
	pub ignore_client_filter_and_sort: bool,
	/// Page size used when the caller requests none
	pub default_page_size: u32,
	/// Hard page-size ceiling
	pub max_page_size: u32,
}

/// The store of saved views and per-admin favorites.
#[derive(Debug)]
pub struct ViewStore {
	views: DashMap<ViewId, View>,
	favorites: DashMap<UserId, Vec<ViewId>>,
	routes: Arc<RouteRegistry>,
}

impl ViewStore {
	/// Create an empty store sharing the given route registry.
	pub fn new(routes: Arc<RouteRegistry>) -> Self {
		Self {
			views: DashMap::new(),
			favorites: DashMap::new(),
			routes,
		}
	}

	/// Create a view over a content type.
	///
	/// New views start unpublished with the default column set
	/// (primary field and creation time), a newest-first sort, and
	/// conservative pagination limits.
	pub async fn create_view(
		&self,
		content_type: &ContentType,
		input: NewView,
		ctx: &RequestContext,
	) -> EngineResult<View> {
		let developer_name = DeveloperName::parse(&input.developer_name)?;
		let taken = self.views.iter().any(|v| {
			v.content_type_id == content_type.id && v.developer_name == developer_name
		});
		if taken {
			return Err(EngineError::validation(
				"developer_name",
				format!(
					"The developer name '{}' is already in use by another view of this content type.",
					developer_name
				),
			));
		}

		let id = Uuid::new_v4();
		let route_path = format!("{}/{}", content_type.developer_name, developer_name);
		let route_path = self.routes.claim(&route_path, RouteTarget::View(id))?;

		let view = View {
			id,
			content_type_id: content_type.id,
			label: input.label,
			description: input.description,
			developer_name,
			route_path,
			columns: vec![
				BUILT_IN_PRIMARY_FIELD.to_string(),
				BUILT_IN_CREATED_AT.to_string(),
			],
			filter: None,
			sort: vec![SortEntry::descending(BUILT_IN_CREATED_AT)],
			is_published: false,
			ignore_client_filter_and_sort: false,
			limits: PageLimits {
				default_page_size: 25,
				max_page_size: 250,
			},
			audit: AuditStamp::new(ctx),
		};
		info!(view = %view.developer_name, content_type = %content_type.developer_name, "created view");
		self.views.insert(id, view.clone());
		Ok(view)
	}

	/// Fetch a view.
	pub async fn get(&self, id: ViewId) -> EngineResult<View> {
		self.views
			.get(&id)
			.map(|v| v.clone())
			.ok_or_else(|| EngineError::not_found("view", id))
	}

	/// All views of one content type, ordered by label.
	pub async fn list_for_type(&self, content_type_id: ContentTypeId) -> Vec<View> {
		let mut views: Vec<View> = self
			.views
			.iter()
			.filter(|v| v.content_type_id == content_type_id)
			.map(|v| v.clone())
			.collect();
		views.sort_by(|a, b| a.label.cmp(&b.label));
		views
	}

	/// Edit a view's label and description.
	pub async fn edit_view(
		&self,
		id: ViewId,
		label: String,
		description: String,
		ctx: &RequestContext,
	) -> EngineResult<View> {
		let mut entry = self
			.views
			.get_mut(&id)
			.ok_or_else(|| EngineError::not_found("view", id))?;
		entry.label = label;
		entry.description = description;
		entry.audit.touch(ctx);
		Ok(entry.clone())
	}

	/// Edit a view's public-surface settings.
	pub async fn edit_public_settings(
		&self,
		id: ViewId,
		input: EditPublicSettings,
		ctx: &RequestContext,
	) -> EngineResult<View> {
		if input.default_page_size == 0 || input.max_page_size == 0 {
			return Err(EngineError::validation(
				"page_size",
				"Page sizes must be at least 1.",
			));
		}

		let mut entry = self
			.views
			.get_mut(&id)
			.ok_or_else(|| EngineError::not_found("view", id))?;

		if let Some(new_path) = input.route_path {
			let claimed =
				self.routes
					.reassign(&entry.route_path, &new_path, RouteTarget::View(id))?;
			entry.route_path = claimed;
		}
		entry.is_published = input.is_published;
		entry.ignore_client_filter_and_sort = input.ignore_client_filter_and_sort;
		entry.limits = PageLimits {
			default_page_size: input.default_page_size,
			max_page_size: input.max_page_size,
		};
		entry.audit.touch(ctx);
		Ok(entry.clone())
	}

	/// Replace the view's filter. Every referenced field must exist on the
	/// content type (or be a built-in) at save time.
	pub async fn edit_filter(
		&self,
		id: ViewId,
		filter: Option<FilterNode>,
		content_type: &ContentType,
		ctx: &RequestContext,
	) -> EngineResult<View> {
		if let Some(node) = &filter {
			node.validate(&|name| View::referencable_kind(content_type, name))?;
		}

		let mut entry = self
			.views
			.get_mut(&id)
			.ok_or_else(|| EngineError::not_found("view", id))?;
		entry.filter = filter;
		entry.audit.touch(ctx);
		debug!(view = %entry.developer_name, "edited view filter");
		Ok(entry.clone())
	}

	/// Replace the column projection. Every column must be an active field
	/// or a built-in.
	pub async fn set_columns(
		&self,
		id: ViewId,
		columns: Vec<String>,
		content_type: &ContentType,
		ctx: &RequestContext,
	) -> EngineResult<View> {
		for column in &columns {
			if View::referencable_kind(content_type, column).is_none() {
				return Err(EngineError::validation(
					column.clone(),
					"Column references a field that does not exist on this content type.",
				));
			}
		}

		let mut entry = self
			.views
			.get_mut(&id)
			.ok_or_else(|| EngineError::not_found("view", id))?;
		entry.columns = columns;
		entry.audit.touch(ctx);
		Ok(entry.clone())
	}

	/// Move a column to a new position; the position clamps to the column
	/// count and the rest keep their relative order.
	pub async fn reorder_column(
		&self,
		id: ViewId,
		column: &str,
		new_position: u32,
		ctx: &RequestContext,
	) -> EngineResult<View> {
		let mut entry = self
			.views
			.get_mut(&id)
			.ok_or_else(|| EngineError::not_found("view", id))?;

		let from = entry
			.columns
			.iter()
			.position(|c| c == column)
			.ok_or_else(|| {
				EngineError::validation(column.to_string(), "The view has no such column.")
			})?;
		let to = (new_position as usize).min(entry.columns.len() - 1);
		let moved = entry.columns.remove(from);
		entry.columns.insert(to, moved);
		entry.audit.touch(ctx);
		Ok(entry.clone())
	}

	/// Replace the sort specification. Every entry must reference an
	/// active field or a built-in.
	pub async fn set_sort(
		&self,
		id: ViewId,
		sort: Vec<SortEntry>,
		content_type: &ContentType,
		ctx: &RequestContext,
	) -> EngineResult<View> {
		for entry in &sort {
			if View::referencable_kind(content_type, &entry.field).is_none() {
				return Err(EngineError::validation(
					entry.field.clone(),
					"Sort references a field that does not exist on this content type.",
				));
			}
		}

		let mut entry = self
			.views
			.get_mut(&id)
			.ok_or_else(|| EngineError::not_found("view", id))?;
		entry.sort = sort;
		entry.audit.touch(ctx);
		Ok(entry.clone())
	}

	/// Move a sort entry to a new position.
	pub async fn reorder_sort(
		&self,
		id: ViewId,
		field: &str,
		new_position: u32,
		ctx: &RequestContext,
	) -> EngineResult<View> {
		let mut entry = self
			.views
			.get_mut(&id)
			.ok_or_else(|| EngineError::not_found("view", id))?;

		let from = entry
			.sort
			.iter()
			.position(|s| s.field == field)
			.ok_or_else(|| {
				EngineError::validation(field.to_string(), "The view has no such sort entry.")
			})?;
		let to = (new_position as usize).min(entry.sort.len() - 1);
		let moved = entry.sort.remove(from);
		entry.sort.insert(to, moved);
		entry.audit.touch(ctx);
		Ok(entry.clone())
	}

	/// Remove the sort entry for one field, leaving the relative order of
	/// the remaining entries unchanged. Removing an absent entry is a
	/// no-op.
	pub async fn remove_sort_entry(
		&self,
		id: ViewId,
		field: &str,
		ctx: &RequestContext,
	) -> EngineResult<View> {
		let mut entry = self
			.views
			.get_mut(&id)
			.ok_or_else(|| EngineError::not_found("view", id))?;
		entry.sort.retain(|s| s.field != field);
		entry.audit.touch(ctx);
		Ok(entry.clone())
	}

	/// Delete a view and release its route.
	pub async fn delete_view(&self, id: ViewId, _ctx: &RequestContext) -> EngineResult<()> {
		let (_, view) = self
			.views
			.remove(&id)
			.ok_or_else(|| EngineError::not_found("view", id))?;
		self.routes.release(&view.route_path);
		for mut favorites in self.favorites.iter_mut() {
			favorites.retain(|&v| v != id);
		}
		info!(view = %view.developer_name, "deleted view");
		Ok(())
	}

	/// Toggle a view on or off an admin's favorites. Returns whether the
	/// view is a favorite afterwards.
	pub async fn toggle_favorite(
		&self,
		admin: UserId,
		view: ViewId,
	) -> EngineResult<bool> {
		if !self.views.contains_key(&view) {
			return Err(EngineError::not_found("view", view));
		}
		let mut favorites = self.favorites.entry(admin).or_default();
		if let Some(position) = favorites.iter().position(|&v| v == view) {
			favorites.remove(position);
			Ok(false)
		} else {
			favorites.push(view);
			Ok(true)
		}
	}

	/// An admin's favorite views, in the order they were favorited.
	pub async fn favorites_for(&self, admin: UserId) -> Vec<ViewId> {
		self.favorites
			.get(&admin)
			.map(|f| f.clone())
			.unwrap_or_default()
	}
}
