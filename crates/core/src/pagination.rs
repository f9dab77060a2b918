//! Offset-pagination helpers and the shared response envelope.

use serde::Serialize;

/// Default number of rows per page for list endpoints.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum rows per page for list endpoints.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Pagination envelope returned by every list endpoint.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl Pagination {
    /// Build an envelope; `total_pages = ceil(total / page_size)`, so zero
    /// matching rows yields zero pages.
    pub fn new(page: i64, page_size: i64, total: i64) -> Self {
        let total_pages = if page_size > 0 {
            (total + page_size - 1) / page_size
        } else {
            0
        };
        Self {
            page,
            page_size,
            total,
            total_pages,
        }
    }
}

/// Clamp a user-provided page number to 1-based.
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

/// Clamp a user-provided page size to valid bounds.
pub fn clamp_page_size(page_size: Option<i64>) -> i64 {
    page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1).min(MAX_PAGE_SIZE)
}

/// Row offset for a 1-based page.
pub fn offset(page: i64, page_size: i64) -> i64 {
    (page - 1) * page_size
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
