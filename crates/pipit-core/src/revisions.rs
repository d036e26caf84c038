//! Generic append-only revision log
//!
//! One implementation backs every revisioned entity kind: content items,
//! web templates, email templates, and navigation menus. Each parent type
//! supplies its own snapshot shape `S`. Records are never mutated; restoring
//! an old snapshot is the caller's job and must itself append.

use crate::context::RequestContext;
use crate::ids::RevisionId;
use crate::pagination::{PageLimits, PageRequest, Paged};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

/// One immutable snapshot of a parent entity's content.
#[derive(Debug, Clone, PartialEq)]
pub struct Revision<S> {
	/// Identifier of this revision record
	pub id: RevisionId,
	/// The entity this revision belongs to
	pub parent_id: Uuid,
	/// Snapshot taken when the revision was appended
	pub snapshot: S,
	/// When the revision was appended
	pub created_at: DateTime<Utc>,
	/// Acting user, if any
	pub created_by: Option<crate::ids::UserId>,
}

/// Ordering for revision listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevisionSort {
	/// Most recent first (the admin history default)
	#[default]
	NewestFirst,
	/// Oldest first
	OldestFirst,
}

/// Append-only history keyed by parent entity id.
#[derive(Debug)]
pub struct RevisionLog<S> {
	by_parent: RwLock<HashMap<Uuid, Vec<Revision<S>>>>,
	parent_of: RwLock<HashMap<RevisionId, Uuid>>,
}

impl<S: Clone> RevisionLog<S> {
	/// Create an empty log.
	pub fn new() -> Self {
		Self {
			by_parent: RwLock::new(HashMap::new()),
			parent_of: RwLock::new(HashMap::new()),
		}
	}

	/// Append a snapshot for `parent_id` and return the new record.
	pub fn append(&self, parent_id: Uuid, snapshot: S, ctx: &RequestContext) -> Revision<S> {
		let revision = Revision {
			id: Uuid::new_v4(),
			parent_id,
			snapshot,
			created_at: Utc::now(),
			created_by: ctx.user_id,
		};
		self.parent_of.write().insert(revision.id, parent_id);
		self.by_parent
			.write()
			.entry(parent_id)
			.or_default()
			.push(revision.clone());
		debug!(%parent_id, revision_id = %revision.id, "appended revision");
		revision
	}

	/// Fetch one revision by its own id.
	pub fn get(&self, revision_id: RevisionId) -> Option<Revision<S>> {
		let parent_id = *self.parent_of.read().get(&revision_id)?;
		self.by_parent
			.read()
			.get(&parent_id)?
			.iter()
			.find(|r| r.id == revision_id)
			.cloned()
	}

	/// The most recently appended revision for `parent_id`.
	pub fn latest(&self, parent_id: Uuid) -> Option<Revision<S>> {
		self.by_parent.read().get(&parent_id)?.last().cloned()
	}

	/// Number of revisions recorded for `parent_id`.
	pub fn count(&self, parent_id: Uuid) -> usize {
		self.by_parent
			.read()
			.get(&parent_id)
			.map(|v| v.len())
			.unwrap_or(0)
	}

	/// One page of `parent_id`'s history.
	pub fn list(
		&self,
		parent_id: Uuid,
		request: PageRequest,
		limits: &PageLimits,
		sort: RevisionSort,
	) -> Paged<Revision<S>> {
		let mut all = self
			.by_parent
			.read()
			.get(&parent_id)
			.cloned()
			.unwrap_or_default();
		if sort == RevisionSort::NewestFirst {
			all.reverse();
		}
		Paged::slice(all, request, limits)
	}

	/// Permanently remove every revision of `parent_id`.
	///
	/// Only the hard-purge path of a parent entity may call this; logical
	/// deletion keeps history intact.
	pub fn purge_parent(&self, parent_id: Uuid) -> usize {
		let removed = self.by_parent.write().remove(&parent_id);
		let count = removed.as_ref().map(|v| v.len()).unwrap_or(0);
		if let Some(revisions) = removed {
			let mut parent_of = self.parent_of.write();
			for revision in revisions {
				parent_of.remove(&revision.id);
			}
		}
		if count > 0 {
			debug!(%parent_id, count, "purged revision history");
		}
		count
	}
}

impl<S: Clone> Default for RevisionLog<S> {
	fn default() -> Self {
		Self::new()
	}
}
