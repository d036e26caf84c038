//! Global route registry
//!
//! Every public path points at exactly one content item or view. Paths are
//! normalized before use; claiming an already-taken path is a validation
//! error on the pseudo-field `route_path` — generated paths are never
//! auto-suffixed.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use pipit_core::{ContentItemId, EngineError, EngineResult, ViewId};
use tracing::debug;

/// What a public route resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteTarget {
	/// A single content item
	ContentItem(ContentItemId),
	/// A published view
	View(ViewId),
}

/// The path → target map shared by the content and view stores.
#[derive(Debug, Default)]
pub struct RouteRegistry {
	by_path: DashMap<String, RouteTarget>,
}

impl RouteRegistry {
	/// Create an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Lowercase, trim surrounding slashes and whitespace, and collapse
	/// duplicate slashes.
	pub fn normalize(path: &str) -> String {
		path.trim()
			.to_lowercase()
			.split('/')
			.filter(|segment| !segment.is_empty())
			.collect::<Vec<_>>()
			.join("/")
	}

	/// Claim a path for a target, returning the normalized path.
	pub fn claim(&self, path: &str, target: RouteTarget) -> EngineResult<String> {
		let normalized = Self::normalize(path);
		if normalized.is_empty() {
			return Err(EngineError::validation(
				"route_path",
				"Enter a non-empty route path.",
			));
		}
		match self.by_path.entry(normalized.clone()) {
			Entry::Occupied(entry) if *entry.get() != target => Err(EngineError::validation(
				"route_path",
				format!("The route path '{}' is already in use.", normalized),
			)),
			Entry::Occupied(_) => Ok(normalized),
			Entry::Vacant(entry) => {
				entry.insert(target);
				debug!(path = %normalized, "claimed route");
				Ok(normalized)
			}
		}
	}

	/// Move a target from one path to another. The new path is claimed
	/// before the old one is released, so a collision leaves the old
	/// route intact.
	pub fn reassign(&self, old: &str, new: &str, target: RouteTarget) -> EngineResult<String> {
		let normalized = self.claim(new, target)?;
		let old_normalized = Self::normalize(old);
		if old_normalized != normalized {
			self.release(&old_normalized);
		}
		Ok(normalized)
	}

	/// Release a path.
	pub fn release(&self, path: &str) {
		self.by_path.remove(&Self::normalize(path));
	}

	/// Resolve a public path to its target.
	pub async fn resolve(&self, path: &str) -> Option<RouteTarget> {
		self.by_path.get(&Self::normalize(path)).map(|r| *r)
	}
}
