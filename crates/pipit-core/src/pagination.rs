//! Pagination primitives
//!
//! Callers request a page and optionally a page size; each listing surface
//! carries its own [`PageLimits`] which supply the default size and a hard
//! ceiling the requested size is clamped to.

use serde::{Deserialize, Serialize};

/// Page size used when a surface defines no explicit default.
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Hard ceiling used when a surface defines no explicit maximum.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// A caller's page request. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
	/// 1-based page number; 0 is treated as 1
	pub page: u32,
	/// Requested page size, `None` for the surface default
	pub page_size: Option<u32>,
}

impl PageRequest {
	/// The first page at the surface's default size.
	pub fn first() -> Self {
		Self {
			page: 1,
			page_size: None,
		}
	}

	/// A specific page at a specific size.
	pub fn new(page: u32, page_size: u32) -> Self {
		Self {
			page,
			page_size: Some(page_size),
		}
	}
}

impl Default for PageRequest {
	fn default() -> Self {
		Self::first()
	}
}

/// Per-surface pagination limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLimits {
	/// Size used when the caller does not request one
	pub default_page_size: u32,
	/// Hard ceiling applied regardless of the caller's request
	pub max_page_size: u32,
}

impl Default for PageLimits {
	fn default() -> Self {
		Self {
			default_page_size: DEFAULT_PAGE_SIZE,
			max_page_size: MAX_PAGE_SIZE,
		}
	}
}

impl PageLimits {
	/// Resolve a caller-requested size against these limits.
	///
	/// # Examples
	///
	/// ```
	/// use pipit_core::pagination::PageLimits;
	///
	/// let limits = PageLimits { default_page_size: 25, max_page_size: 20 };
	/// assert_eq!(limits.resolve(None), 20);
	/// assert_eq!(limits.resolve(Some(100)), 20);
	/// assert_eq!(limits.resolve(Some(5)), 5);
	/// ```
	pub fn resolve(&self, requested: Option<u32>) -> u32 {
		requested
			.unwrap_or(self.default_page_size)
			.clamp(1, self.max_page_size.max(1))
	}
}

/// One page of results plus totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paged<T> {
	/// Items on this page
	pub items: Vec<T>,
	/// Total number of matching items across all pages
	pub total: usize,
	/// 1-based page number served
	pub page: u32,
	/// Page size actually applied after clamping
	pub page_size: u32,
}

impl<T> Paged<T> {
	/// Slice `all` down to the requested page.
	pub fn slice(all: Vec<T>, request: PageRequest, limits: &PageLimits) -> Self {
		let page_size = limits.resolve(request.page_size);
		let page = request.page.max(1);
		let total = all.len();
		let start = (page as usize - 1).saturating_mul(page_size as usize);
		let items = all
			.into_iter()
			.skip(start)
			.take(page_size as usize)
			.collect();
		Self {
			items,
			total,
			page,
			page_size,
		}
	}

	/// Total number of pages at the served page size.
	pub fn total_pages(&self) -> u32 {
		if self.total == 0 {
			return 0;
		}
		self.total.div_ceil(self.page_size as usize) as u32
	}
}
