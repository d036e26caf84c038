//! # Pipit
//!
//! A headless content management engine for Rust, inspired by the
//! dynamic-schema CMS tradition: administrators define content types with
//! typed fields at runtime, editors work in independent draft and published
//! documents with full revision history, and saved views expose filtered,
//! sorted, paginated projections to both the admin and the public surface.
//!
//! ## Crates
//!
//! - [`core`]: errors, identifiers, developer-name slugs, audit stamps,
//!   request context, pagination, and the generic revision log
//! - [`fields`]: the field type registry — kinds, typed values, cleaning,
//!   display rendering
//! - [`query`]: filter condition trees, operators, and sort specifications
//! - [`content`]: content type schemas and the content item store with the
//!   draft/publish/trash lifecycle
//! - [`views`]: saved filter/sort/column queries with pagination clamping
//! - [`templating`]: revisioned web/email templates, navigation menus, the
//!   template variable resolver, and Tera-backed rendering
//! - [`functions`]: revisioned user-defined scripts bound to HTTP or content
//!   item triggers
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use pipit::prelude::*;
//! use serde_json::json;
//!
//! let ctx = RequestContext::system();
//! let schemas = SchemaRegistry::new();
//!
//! let blog = schemas
//!     .create_content_type(
//!         NewContentType {
//!             label_singular: "Post".into(),
//!             label_plural: "Posts".into(),
//!             developer_name: "posts".into(),
//!             default_route_template: "{ContentTypeDeveloperName}/{PrimaryField}".into(),
//!             description: String::new(),
//!         },
//!         &ctx,
//!     )
//!     .await?;
//! ```

pub use pipit_content as content;
pub use pipit_core as core;
pub use pipit_fields as fields;
pub use pipit_functions as functions;
pub use pipit_query as query;
pub use pipit_templating as templating;
pub use pipit_views as views;

pub mod prelude {
	//! Convenient re-exports of commonly used items

	pub use pipit_core::{
		DeveloperName, EngineError, EngineResult, OrganizationSettings, PageLimits, PageRequest,
		Paged, RequestContext, RevisionSort, ValidationErrors,
	};
	pub use pipit_fields::{Document, FieldChoice, FieldKind, FieldValue};
	pub use pipit_query::{FilterJoin, FilterNode, FilterOperator, SortDirection, SortEntry};

	pub use pipit_content::items::{ContentItem, ContentStore};
	pub use pipit_content::routes::{RouteRegistry, RouteTarget};
	pub use pipit_content::schema::{
		ContentType, EditContentType, EditField, NewContentType, NewField, SchemaRegistry,
	};
	pub use pipit_content::trash::ItemState;

	pub use pipit_views::{EditPublicSettings, NewView, View, ViewQuery, ViewStore, run_view};

	pub use pipit_templating::{
		MenuStore, TemplateStore, template_variables,
	};

	pub use pipit_functions::{FunctionStore, FunctionTrigger};
}
