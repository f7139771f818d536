//! Shared pagination model.
//!
//! Every list endpoint in the admin API uses the same numeric page/limit
//! scheme. Parameters are normalized here so repositories only ever see a
//! sane offset/limit pair, and `total_pages` is always computed server-side.

use serde::Deserialize;

/// Default page size for list endpoints.
pub const DEFAULT_LIMIT: u64 = 20;

/// Maximum page size accepted from clients.
pub const MAX_LIMIT: u64 = 100;

/// Requested page of a list resource.
///
/// Deserialized straight from query parameters. Out-of-range values are
/// clamped rather than rejected: a page past the end of the collection is a
/// valid (empty) page, never an error.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageRequest {
    /// 1-based page number.
    #[serde(default = "default_page")]
    pub page: u64,
    /// Page size.
    #[serde(default = "default_limit")]
    pub limit: u64,
}

const fn default_page() -> u64 {
    1
}

const fn default_limit() -> u64 {
    DEFAULT_LIMIT
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Create a page request, clamping into valid ranges.
    #[must_use]
    pub fn new(page: u64, limit: u64) -> Self {
        Self { page, limit }.normalized()
    }

    /// Clamp page to >= 1 and limit to 1..=`MAX_LIMIT`.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            page: self.page.max(1),
            limit: self.limit.clamp(1, MAX_LIMIT),
        }
    }

    /// Row offset for the normalized request.
    #[must_use]
    pub fn offset(&self) -> u64 {
        let norm = self.normalized();
        (norm.page - 1) * norm.limit
    }

    /// Row limit for the normalized request.
    #[must_use]
    pub fn limit(&self) -> u64 {
        self.normalized().limit
    }
}

/// One page of items plus the counts needed to render pagination controls.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Total number of matching items across all pages.
    pub total: u64,
    /// 1-based page number this page was fetched with.
    pub page: u64,
    /// Page size this page was fetched with.
    pub limit: u64,
}

impl<T> Page<T> {
    /// Build a page from repository results and the originating request.
    #[must_use]
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        let norm = request.normalized();
        Self {
            items,
            total,
            page: norm.page,
            limit: norm.limit,
        }
    }

    /// Total number of pages (0 when the collection is empty).
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(self.limit.max(1))
    }

    /// Map the items of this page, keeping counts intact.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let req = PageRequest::default();
        assert_eq!(req.page, 1);
        assert_eq!(req.limit, DEFAULT_LIMIT);
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn test_page_zero_clamped_to_one() {
        let req = PageRequest::new(0, 10);
        assert_eq!(req.page, 1);
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn test_limit_clamped_to_max() {
        let req = PageRequest::new(1, 10_000);
        assert_eq!(req.limit, MAX_LIMIT);
    }

    #[test]
    fn test_limit_zero_clamped_to_one() {
        let req = PageRequest::new(3, 0);
        assert_eq!(req.limit, 1);
        assert_eq!(req.offset(), 2);
    }

    #[test]
    fn test_offset_for_later_page() {
        let req = PageRequest::new(4, 25);
        assert_eq!(req.offset(), 75);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let page = Page::new(vec![1, 2, 3], 45, PageRequest::new(1, 20));
        assert_eq!(page.total_pages(), 3);
    }

    #[test]
    fn test_empty_collection_has_zero_pages() {
        let page: Page<i32> = Page::new(vec![], 0, PageRequest::new(1, 20));
        assert_eq!(page.total_pages(), 0);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_page_past_end_is_valid_and_empty() {
        // Repository returns no rows for an offset past the end; the page
        // shape stays well-formed.
        let page: Page<i32> = Page::new(vec![], 7, PageRequest::new(99, 10));
        assert_eq!(page.page, 99);
        assert_eq!(page.total_pages(), 1);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_map_preserves_counts() {
        let page = Page::new(vec![1, 2], 12, PageRequest::new(2, 2));
        let mapped = page.map(|n| n.to_string());
        assert_eq!(mapped.items, vec!["1".to_string(), "2".to_string()]);
        assert_eq!(mapped.total, 12);
        assert_eq!(mapped.page, 2);
    }
}
