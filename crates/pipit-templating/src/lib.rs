//! # Pipit Templating
//!
//! The rendering side of the engine: web and email templates with full
//! revision history, navigation menus, and the template variable resolver
//! that maps a content type's schema (plus the built-in categories) onto
//! the variables authors can insert.
//!
//! Rendering itself is delegated to Tera; the resolver is pure metadata
//! and recomputes from the live schema on every call, so it can never show
//! variables for fields that no longer exist.

#![warn(rustdoc::broken_intra_doc_links)]

pub mod menus;
pub mod render;
pub mod templates;
pub mod variables;

pub use menus::{MenuStore, NavigationMenu, NavigationMenuItem, NewMenuItem};
pub use render::{
	RenderError, RenderedEmail, item_render_context, menu_context_value, render_email,
	render_web_page,
};
pub use templates::{EmailTemplate, TemplateStore, WebTemplate};
pub use variables::{TemplateVariable, VariableCategory, VariableGroup, template_variables};
