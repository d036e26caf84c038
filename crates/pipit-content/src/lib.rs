//! # Pipit Content
//!
//! The content engine: user-defined content types with typed, orderable,
//! soft-deletable fields, and content items carrying independent draft and
//! published documents with full revision history.
//!
//! ```text
//! pipit-content
//! ├── schema  - content types and their field definitions
//! ├── items   - content items, draft/publish lifecycle, revisions
//! ├── routes  - the global public route registry
//! └── trash   - soft-deleted items awaiting restore or purge
//! ```
//!
//! Stores hold their state behind concurrent maps; multi-entity mutations
//! such as field reordering happen against a single map entry so concurrent
//! readers never observe a half-renumbered schema.

#![warn(rustdoc::broken_intra_doc_links)]

pub mod items;
pub mod routes;
pub mod schema;
pub mod trash;

pub mod prelude {
	//! Convenient re-exports of commonly used items

	pub use crate::items::{ContentItem, ContentStore};
	pub use crate::routes::{RouteRegistry, RouteTarget};
	pub use crate::schema::{
		ContentType, ContentTypeField, EditContentType, EditField, NewContentType, NewField,
		SchemaRegistry,
	};
	pub use crate::trash::{DeletedContentItem, ItemState};
}

pub use prelude::*;
