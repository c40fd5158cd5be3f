//! Page-based pagination utilities.
//!
//! Listings are paginated server-side: the caller asks for a page number and
//! a page size, the store reports the filtered total, and [`PageMeta`] derives
//! everything else from those two numbers.

use serde::{Deserialize, Serialize};

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PER_PAGE: u32 = 15;

/// Upper bound on the page size a caller may request.
pub const MAX_PER_PAGE: u32 = 100;

/// A normalized page request. Always has `page >= 1` and `1 <= per_page`;
/// the only way to build one is through [`PageRequest::new`] or `default()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PageRequest {
    /// Builds a request from optional query values, clamping out-of-range input
    /// instead of rejecting it.
    pub fn new(page: Option<u32>, per_page: Option<u32>, default_per_page: u32, max_per_page: u32) -> Self {
        let max_per_page = max_per_page.max(1);
        let per_page = per_page
            .unwrap_or(default_per_page)
            .clamp(1, max_per_page);
        let page = page.unwrap_or(1).max(1);

        Self { page, per_page }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }

    /// Number of rows to fetch.
    pub fn limit(&self) -> u64 {
        u64::from(self.per_page)
    }
}

/// Pagination metadata returned alongside a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub current_page: u32,
    pub per_page: u32,
    pub total: u64,
    /// Never less than 1, even for an empty result set.
    pub last_page: u32,
    /// 1-based index of the first item on this page, absent when the page is empty.
    pub from: Option<u64>,
    pub to: Option<u64>,
}

impl PageMeta {
    pub fn new(request: PageRequest, total: u64, items_on_page: usize) -> Self {
        let per_page = u64::from(request.per_page());
        let last_page = total.div_ceil(per_page).max(1);
        let last_page = u32::try_from(last_page).unwrap_or(u32::MAX);

        let (from, to) = if items_on_page == 0 {
            (None, None)
        } else {
            let from = request.offset() + 1;
            (Some(from), Some(from + items_on_page as u64 - 1))
        };

        Self {
            current_page: request.page(),
            per_page: request.per_page(),
            total,
            last_page,
            from,
            to,
        }
    }
}

/// A page of results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        let meta = PageMeta::new(request, total, items.len());
        Self { items, meta }
    }

    /// Paginates an already filtered, fully materialized result set.
    pub fn from_vec(all: Vec<T>, request: PageRequest) -> Self {
        let total = all.len() as u64;
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let items: Vec<T> = all
            .into_iter()
            .skip(offset)
            .take(request.per_page() as usize)
            .collect();
        Self::new(items, request, total)
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

/// Navigation links for a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLinks {
    pub first: String,
    pub last: String,
    pub prev: Option<String>,
    pub next: Option<String>,
}

impl PageLinks {
    /// Builds links relative to `base_path` (e.g. `/api/v1/roles`).
    pub fn build(base_path: &str, meta: &PageMeta) -> Self {
        let link = |page: u32| format!("{}?page={}&per_page={}", base_path, page, meta.per_page);

        Self {
            first: link(1),
            last: link(meta.last_page),
            prev: (meta.current_page > 1).then(|| link(meta.current_page - 1)),
            next: (meta.current_page < meta.last_page).then(|| link(meta.current_page + 1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_defaults() {
        let request = PageRequest::new(None, None, DEFAULT_PER_PAGE, MAX_PER_PAGE);
        assert_eq!(request.page, 1);
        assert_eq!(request.per_page, DEFAULT_PER_PAGE);
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn test_page_request_clamps_input() {
        let request = PageRequest::new(Some(0), Some(0), 15, 100);
        assert_eq!(request.page, 1);
        assert_eq!(request.per_page, 1);

        let request = PageRequest::new(Some(3), Some(500), 15, 100);
        assert_eq!(request.per_page, 100);
        assert_eq!(request.offset(), 200);
    }

    #[test]
    fn test_page_request_zero_page_starts_at_first_row() {
        let request = PageRequest::new(Some(0), Some(0), 15, 100);
        assert_eq!(request.page(), 1);
        assert_eq!(request.per_page(), 1);
        assert_eq!(request.offset(), 0);

        let page = Page::from_vec(vec!["a", "b"], request);
        assert_eq!(page.items, vec!["a"]);
        assert_eq!(page.meta.last_page, 2);
    }

    #[test]
    fn test_page_meta_last_page() {
        let request = PageRequest { page: 2, per_page: 10 };
        let meta = PageMeta::new(request, 25, 10);
        assert_eq!(meta.last_page, 3);
        assert_eq!(meta.from, Some(11));
        assert_eq!(meta.to, Some(20));
    }

    #[test]
    fn test_page_meta_empty_result() {
        let meta = PageMeta::new(PageRequest::default(), 0, 0);
        assert_eq!(meta.last_page, 1);
        assert_eq!(meta.total, 0);
        assert!(meta.from.is_none());
        assert!(meta.to.is_none());
    }

    #[test]
    fn test_page_from_vec_slices_requested_page() {
        let all: Vec<u32> = (1..=7).collect();
        let page = Page::from_vec(all, PageRequest { page: 3, per_page: 3 });
        assert_eq!(page.items, vec![7]);
        assert_eq!(page.meta.total, 7);
        assert_eq!(page.meta.last_page, 3);
        assert_eq!(page.meta.from, Some(7));
    }

    #[test]
    fn test_page_from_vec_past_the_end() {
        let page = Page::from_vec(vec![1, 2], PageRequest { page: 5, per_page: 10 });
        assert!(page.items.is_empty());
        assert_eq!(page.meta.total, 2);
        assert_eq!(page.meta.current_page, 5);
    }

    #[test]
    fn test_page_links() {
        let meta = PageMeta::new(PageRequest { page: 2, per_page: 5 }, 12, 5);
        let links = PageLinks::build("/api/v1/roles", &meta);
        assert_eq!(links.first, "/api/v1/roles?page=1&per_page=5");
        assert_eq!(links.last, "/api/v1/roles?page=3&per_page=5");
        assert_eq!(links.prev.as_deref(), Some("/api/v1/roles?page=1&per_page=5"));
        assert_eq!(links.next.as_deref(), Some("/api/v1/roles?page=3&per_page=5"));
    }

    #[test]
    fn test_page_links_single_page() {
        let meta = PageMeta::new(PageRequest::default(), 3, 3);
        let links = PageLinks::build("/api/v1/countries", &meta);
        assert!(links.prev.is_none());
        assert!(links.next.is_none());
    }

    #[test]
    fn test_page_meta_serialization() {
        let meta = PageMeta::new(PageRequest::default(), 1, 1);
        let json = serde_json::to_string(&meta).unwrap();
        assert!(json.contains("\"current_page\":1"));
        assert!(json.contains("\"last_page\":1"));
    }
}
