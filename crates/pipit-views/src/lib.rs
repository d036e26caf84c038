//! # Pipit Views
//!
//! Saved, named queries over one content type: an ordered column projection,
//! a filter condition tree, and a sort specification, shared by the admin
//! list screens and the public delivery surface.
//!
//! A view's stored filter and sort always apply; whether public callers may
//! layer their own on top is the view's `ignore_client_filter_and_sort`
//! call — when set, query-string overrides are dropped and only the
//! server-defined query runs. Page sizes are clamped to the view's maximum
//! no matter what the caller asks for.

#![warn(rustdoc::broken_intra_doc_links)]

pub mod builtins;
pub mod runner;
pub mod view;

pub use builtins::{BUILT_IN_CREATED_AT, BUILT_IN_PRIMARY_FIELD, BUILT_IN_UPDATED_AT, built_in_kind};
pub use runner::{ViewQuery, ViewRow, run_view};
pub use view::{EditPublicSettings, NewView, View, ViewStore};
