//! Navigation menus
//!
//! Menus hold an ordered list of items; one menu is designated the main
//! menu and cannot be deleted while it holds that designation. Every item
//! mutation appends a snapshot of the full item list to the menu's revision
//! log, following the same adopt-and-append revert rule as every other
//! revisioned entity.

use dashmap::DashMap;
use pipit_core::{
	AuditStamp, DeveloperName, EngineError, EngineResult, MenuId, MenuItemId, PageLimits,
	PageRequest, Paged, RequestContext, Revision, RevisionId, RevisionLog, RevisionSort,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

/// One entry of a navigation menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationMenuItem {
	/// Item identifier
	pub id: MenuItemId,
	/// Display label
	pub label: String,
	/// Link target
	pub url: String,
	/// Disabled items stay configured but are not rendered
	pub is_disabled: bool,
	/// Whether the link opens in a new tab
	pub open_in_new_tab: bool,
	/// Dense position within the menu
	pub ordinal: u32,
	/// Optional parent for nested menus
	pub parent_item_id: Option<MenuItemId>,
}

/// A named navigation menu.
#[derive(Debug, Clone)]
pub struct NavigationMenu {
	/// Menu identifier
	pub id: MenuId,
	/// Display label
	pub label: String,
	/// Immutable slug, unique among menus
	pub developer_name: DeveloperName,
	/// Whether this is the site's main menu
	pub is_main_menu: bool,
	/// Menu items in ordinal order
	pub items: Vec<NavigationMenuItem>,
	/// Audit bookkeeping
	pub audit: AuditStamp,
}

impl NavigationMenu {
	fn renumber(&mut self) {
		self.items.sort_by_key(|i| i.ordinal);
		for (ordinal, item) in self.items.iter_mut().enumerate() {
			item.ordinal = ordinal as u32;
		}
	}
}

/// Input for [`MenuStore::add_item`].
#[derive(Debug, Clone)]
pub struct NewMenuItem {
	/// Display label
	pub label: String,
	/// Link target
	pub url: String,
	/// Whether the item starts disabled
	pub is_disabled: bool,
	/// Whether the link opens in a new tab
	pub open_in_new_tab: bool,
	/// Optional parent item
	pub parent_item_id: Option<MenuItemId>,
}

/// The store of navigation menus and their revision log.
#[derive(Debug, Default)]
pub struct MenuStore {
	menus: DashMap<MenuId, NavigationMenu>,
	revisions: RevisionLog<Vec<NavigationMenuItem>>,
}

impl MenuStore {
	/// Create an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Create a menu. The first menu created becomes the main menu.
	pub async fn create_menu(
		&self,
		label: String,
		developer_name: &str,
		ctx: &RequestContext,
	) -> EngineResult<NavigationMenu> {
		let developer_name = DeveloperName::parse(developer_name)?;
		if self
			.menus
			.iter()
			.any(|m| m.developer_name == developer_name)
		{
			return Err(EngineError::validation(
				"developer_name",
				format!("The developer name '{}' is already in use.", developer_name),
			));
		}

		let menu = NavigationMenu {
			id: Uuid::new_v4(),
			label,
			developer_name,
			is_main_menu: self.menus.is_empty(),
			items: Vec::new(),
			audit: AuditStamp::new(ctx),
		};
		info!(menu = %menu.developer_name, main = menu.is_main_menu, "created navigation menu");
		self.menus.insert(menu.id, menu.clone());
		Ok(menu)
	}

	/// Fetch a menu.
	pub async fn get(&self, id: MenuId) -> EngineResult<NavigationMenu> {
		self.menus
			.get(&id)
			.map(|m| m.clone())
			.ok_or_else(|| EngineError::not_found("navigation menu", id))
	}

	/// All menus, ordered by label.
	pub async fn list(&self) -> Vec<NavigationMenu> {
		let mut menus: Vec<NavigationMenu> = self.menus.iter().map(|m| m.clone()).collect();
		menus.sort_by(|a, b| a.label.cmp(&b.label));
		menus
	}

	/// The current main menu, if any menu exists.
	pub async fn main_menu(&self) -> Option<NavigationMenu> {
		self.menus
			.iter()
			.find(|m| m.is_main_menu)
			.map(|m| m.clone())
	}

	/// Rename a menu.
	pub async fn edit_menu(
		&self,
		id: MenuId,
		label: String,
		ctx: &RequestContext,
	) -> EngineResult<NavigationMenu> {
		let mut entry = self
			.menus
			.get_mut(&id)
			.ok_or_else(|| EngineError::not_found("navigation menu", id))?;
		entry.label = label;
		entry.audit.touch(ctx);
		Ok(entry.clone())
	}

	/// Designate a menu as the main menu, clearing the previous holder.
	pub async fn set_as_main_menu(&self, id: MenuId, ctx: &RequestContext) -> EngineResult<()> {
		if !self.menus.contains_key(&id) {
			return Err(EngineError::not_found("navigation menu", id));
		}
		for mut menu in self.menus.iter_mut() {
			let is_target = menu.id == id;
			if menu.is_main_menu != is_target {
				menu.is_main_menu = is_target;
				menu.audit.touch(ctx);
			}
		}
		info!(menu_id = %id, "designated main menu");
		Ok(())
	}

	/// Delete a menu and its revision history. The main menu cannot be
	/// deleted; designate another first.
	pub async fn delete_menu(&self, id: MenuId, _ctx: &RequestContext) -> EngineResult<()> {
		let is_main = self
			.menus
			.get(&id)
			.map(|m| m.is_main_menu)
			.ok_or_else(|| EngineError::not_found("navigation menu", id))?;
		if is_main {
			return Err(EngineError::validation(
				"menu",
				"The main menu cannot be deleted. Designate another main menu first.",
			));
		}
		self.menus.remove(&id);
		self.revisions.purge_parent(id);
		info!(menu_id = %id, "deleted navigation menu");
		Ok(())
	}

	/// Append an item to a menu.
	pub async fn add_item(
		&self,
		menu_id: MenuId,
		input: NewMenuItem,
		ctx: &RequestContext,
	) -> EngineResult<NavigationMenuItem> {
		let mut entry = self
			.menus
			.get_mut(&menu_id)
			.ok_or_else(|| EngineError::not_found("navigation menu", menu_id))?;

		if let Some(parent) = input.parent_item_id
			&& !entry.items.iter().any(|i| i.id == parent)
		{
			return Err(EngineError::validation(
				"parent_item_id",
				"The parent menu item does not exist in this menu.",
			));
		}

		let item = NavigationMenuItem {
			id: Uuid::new_v4(),
			label: input.label,
			url: input.url,
			is_disabled: input.is_disabled,
			open_in_new_tab: input.open_in_new_tab,
			ordinal: entry.items.len() as u32,
			parent_item_id: input.parent_item_id,
		};
		entry.items.push(item.clone());
		entry.audit.touch(ctx);
		let snapshot = entry.items.clone();
		drop(entry);
		self.revisions.append(menu_id, snapshot, ctx);
		debug!(menu_id = %menu_id, item = %item.label, "added menu item");
		Ok(item)
	}

	/// Edit a menu item's presentation.
	pub async fn edit_item(
		&self,
		menu_id: MenuId,
		item_id: MenuItemId,
		label: String,
		url: String,
		is_disabled: bool,
		open_in_new_tab: bool,
		ctx: &RequestContext,
	) -> EngineResult<NavigationMenuItem> {
		let mut entry = self
			.menus
			.get_mut(&menu_id)
			.ok_or_else(|| EngineError::not_found("navigation menu", menu_id))?;
		let item = entry
			.items
			.iter_mut()
			.find(|i| i.id == item_id)
			.ok_or_else(|| EngineError::not_found("navigation menu item", item_id))?;
		item.label = label;
		item.url = url;
		item.is_disabled = is_disabled;
		item.open_in_new_tab = open_in_new_tab;
		let item = item.clone();
		entry.audit.touch(ctx);
		let snapshot = entry.items.clone();
		drop(entry);
		self.revisions.append(menu_id, snapshot, ctx);
		Ok(item)
	}

	/// Remove an item (and orphan its children to the top level).
	pub async fn remove_item(
		&self,
		menu_id: MenuId,
		item_id: MenuItemId,
		ctx: &RequestContext,
	) -> EngineResult<()> {
		let mut entry = self
			.menus
			.get_mut(&menu_id)
			.ok_or_else(|| EngineError::not_found("navigation menu", menu_id))?;
		let before = entry.items.len();
		entry.items.retain(|i| i.id != item_id);
		if entry.items.len() == before {
			return Err(EngineError::not_found("navigation menu item", item_id));
		}
		for item in entry.items.iter_mut() {
			if item.parent_item_id == Some(item_id) {
				item.parent_item_id = None;
			}
		}
		entry.renumber();
		entry.audit.touch(ctx);
		let snapshot = entry.items.clone();
		drop(entry);
		self.revisions.append(menu_id, snapshot, ctx);
		Ok(())
	}

	/// Move an item to a new position; positions clamp and stay dense.
	pub async fn reorder_item(
		&self,
		menu_id: MenuId,
		item_id: MenuItemId,
		new_position: u32,
		ctx: &RequestContext,
	) -> EngineResult<Vec<NavigationMenuItem>> {
		let mut entry = self
			.menus
			.get_mut(&menu_id)
			.ok_or_else(|| EngineError::not_found("navigation menu", menu_id))?;

		entry.items.sort_by_key(|i| i.ordinal);
		let from = entry
			.items
			.iter()
			.position(|i| i.id == item_id)
			.ok_or_else(|| EngineError::not_found("navigation menu item", item_id))?;
		let to = (new_position as usize).min(entry.items.len() - 1);
		let moved = entry.items.remove(from);
		entry.items.insert(to, moved);
		entry.renumber();
		entry.audit.touch(ctx);
		let snapshot = entry.items.clone();
		let items = entry.items.clone();
		drop(entry);
		self.revisions.append(menu_id, snapshot, ctx);
		Ok(items)
	}

	/// One page of a menu's revision history.
	pub async fn revisions_for(
		&self,
		menu_id: MenuId,
		request: PageRequest,
		sort: RevisionSort,
	) -> Paged<Revision<Vec<NavigationMenuItem>>> {
		self.revisions
			.list(menu_id, request, &PageLimits::default(), sort)
	}

	/// Adopt an old item list and append it as a fresh revision.
	pub async fn revert_menu(
		&self,
		revision_id: RevisionId,
		ctx: &RequestContext,
	) -> EngineResult<NavigationMenu> {
		let revision = self
			.revisions
			.get(revision_id)
			.ok_or_else(|| EngineError::not_found("navigation menu revision", revision_id))?;

		let mut entry = self
			.menus
			.get_mut(&revision.parent_id)
			.ok_or_else(|| EngineError::not_found("navigation menu", revision.parent_id))?;
		entry.items = revision.snapshot.clone();
		entry.audit.touch(ctx);
		let menu = entry.clone();
		drop(entry);
		self.revisions.append(menu.id, revision.snapshot, ctx);
		info!(menu = %menu.developer_name, %revision_id, "reverted navigation menu");
		Ok(menu)
	}
}
