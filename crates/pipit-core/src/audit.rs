//! Audit and soft-delete bookkeeping
//!
//! Mirrors the audit columns a relational rendition would carry on every
//! entity: creation/modification time and user, plus a separate stamp for
//! logical deletion.

use crate::context::RequestContext;
use crate::ids::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Creation and last-modification metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStamp {
	/// When the entity was created
	pub created_at: DateTime<Utc>,
	/// Acting user at creation, if any
	pub created_by: Option<UserId>,
	/// When the entity was last modified
	pub updated_at: DateTime<Utc>,
	/// Acting user at last modification, if any
	pub updated_by: Option<UserId>,
}

impl AuditStamp {
	/// Stamp a freshly created entity.
	pub fn new(ctx: &RequestContext) -> Self {
		let now = Utc::now();
		Self {
			created_at: now,
			created_by: ctx.user_id,
			updated_at: now,
			updated_by: ctx.user_id,
		}
	}

	/// Record a modification.
	pub fn touch(&mut self, ctx: &RequestContext) {
		self.updated_at = Utc::now();
		self.updated_by = ctx.user_id;
	}
}

/// Logical-deletion metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionStamp {
	/// When the entity was logically deleted
	pub deleted_at: DateTime<Utc>,
	/// Acting user at deletion, if any
	pub deleted_by: Option<UserId>,
}

impl DeletionStamp {
	/// Stamp a logical deletion.
	pub fn new(ctx: &RequestContext) -> Self {
		Self {
			deleted_at: Utc::now(),
			deleted_by: ctx.user_id,
		}
	}
}
