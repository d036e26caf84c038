//! # Pipit Core
//!
//! Shared infrastructure for the Pipit content engine:
//!
//! - **Error taxonomy**: field-scoped validation errors, not-found, conflict
//! - **Identifiers**: UUID aliases for every entity kind
//! - **Developer names**: immutable, URL-safe slug identifiers
//! - **Audit stamps**: creation/modification/deletion bookkeeping
//! - **Request context**: acting user plus organization settings, passed
//!   explicitly into every operation instead of ambient state
//! - **Pagination**: page requests, per-surface limits, clamping
//! - **Revision log**: generic append-only history reused by content items,
//!   templates, and navigation menus

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod audit;
pub mod context;
pub mod error;
pub mod ids;
pub mod pagination;
pub mod revisions;
pub mod slug;

pub use audit::{AuditStamp, DeletionStamp};
pub use context::{OrganizationSettings, RequestContext};
pub use error::{EngineError, EngineResult, FieldMessage, ValidationErrors};
pub use ids::{
	ContentItemId, ContentTypeId, FieldId, FunctionId, MenuId, MenuItemId, RevisionId, TemplateId,
	UserId, ViewId,
};
pub use pagination::{PageLimits, PageRequest, Paged};
pub use revisions::{Revision, RevisionLog, RevisionSort};
pub use slug::DeveloperName;
