//! Page arithmetic for list responses.
//!
//! A `PageRequest` is always valid (page and page size are at least 1), so
//! `offset()` and `Page::new` never have to guard against zero.

use serde::{Deserialize, Serialize};

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PER_PAGE: u64 = 12;

/// A 1-based page number plus page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page: u64,
    per_page: u64,
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
    /// Build a request, clamping out-of-range values.
    ///
    /// A page below 1 becomes 1; a page size below 1 becomes the default.
    pub fn new(page: i64, per_page: i64) -> Self {
        let page = u64::try_from(page).ok().filter(|p| *p >= 1).unwrap_or(1);
        let per_page = u64::try_from(per_page)
            .ok()
            .filter(|n| *n >= 1)
            .unwrap_or(DEFAULT_PER_PAGE);
        Self { page, per_page }
    }

    /// Build a request from raw query-string values.
    ///
    /// Absent or non-integer values fall back to the defaults.
    pub fn parse(page: Option<&str>, per_page: Option<&str>) -> Self {
        let page = page.and_then(|raw| raw.trim().parse::<i64>().ok()).unwrap_or(1);
        let per_page = per_page
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .unwrap_or(DEFAULT_PER_PAGE as i64);
        Self::new(page, per_page)
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    /// Number of records to skip before this page starts.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    /// Maximum number of records on this page.
    pub fn limit(&self) -> u64 {
        self.per_page
    }
}

/// One page of records plus the navigation metadata clients render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub current_page: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        let total_pages = total.div_ceil(request.per_page);
        Self {
            items,
            total,
            current_page: request.page,
            total_pages,
            has_next: request.page < total_pages,
            has_prev: request.page > 1,
        }
    }
}
