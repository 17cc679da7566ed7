//! Pagination state for one pagination scope.

use serde::{Deserialize, Serialize};

/// Pagination values for one pagination scope.
///
/// `id` names the scope so that several paginated views can coexist on one
/// page; `current_page` is 1-based. `max_size` bounds how many page links a
/// pager widget renders and takes no part in offset math.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationOptions {
    pub id: String,
    pub current_page: u32,
    pub page_size: u32,
    pub max_size: u32,
}

impl PaginationOptions {
    pub fn new(id: impl Into<String>, current_page: u32, page_size: u32) -> Self {
        PaginationOptions { id: id.into(), current_page, page_size, max_size: 0 }
    }

    /// The page number the search backend expects (0-based).
    pub fn zero_based_page(&self) -> u32 {
        self.current_page.saturating_sub(1)
    }

    /// Number of items before the current page.
    pub fn offset(&self) -> u64 {
        u64::from(self.zero_based_page()) * u64::from(self.page_size)
    }
}

impl Default for PaginationOptions {
    fn default() -> Self {
        PaginationOptions { id: String::new(), current_page: 1, page_size: 20, max_size: 0 }
    }
}
