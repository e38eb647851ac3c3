//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Pagination query parameters, reusable across all list endpoints.
///
/// Negative or non-numeric values fail deserialization with a 400; a zero
/// `page` clamps to the first page and `limit` is capped at [`MAX_PAGE_SIZE`].
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_page() -> u64 {
    DEFAULT_PAGE_NUMBER
}

fn default_limit() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl PageParams {
    /// Page number clamped to be 1-indexed
    pub fn page(&self) -> u64 {
        self.page.max(1)
    }

    /// Items per page, capped at the maximum and never zero
    pub fn limit(&self) -> u64 {
        self.limit.clamp(1, MAX_PAGE_SIZE)
    }

    /// Calculate offset for the windowed fetch
    pub fn offset(&self) -> u64 {
        (self.page() - 1) * self.limit()
    }
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE_NUMBER,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Paginated response wrapper, reusable for all list responses
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    /// Create new paginated response
    pub fn new(data: Vec<T>, page: u64, limit: u64, total: u64) -> Self {
        let total_pages = if limit > 0 {
            total.div_ceil(limit)
        } else {
            0
        };

        Self {
            data,
            pagination: PaginationMeta {
                page,
                limit,
                total,
                total_pages,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_zero_based_window_start() {
        let params = PageParams { page: 3, limit: 10 };
        assert_eq!(params.offset(), 20);
    }

    #[test]
    fn page_zero_clamps_to_first_page() {
        let params = PageParams { page: 0, limit: 10 };
        assert_eq!(params.page(), 1);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn limit_is_capped() {
        let params = PageParams {
            page: 1,
            limit: 9999,
        };
        assert_eq!(params.limit(), MAX_PAGE_SIZE);
    }

    #[test]
    fn negative_page_fails_deserialization() {
        let err = serde_json::from_str::<PageParams>(r#"{"page": -1, "limit": 10}"#);
        assert!(err.is_err());
    }

    #[test]
    fn missing_params_use_defaults() {
        let params: PageParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.page, DEFAULT_PAGE_NUMBER);
        assert_eq!(params.limit, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn total_pages_rounds_up() {
        let page = Paginated::new(vec![1, 2, 3], 1, 10, 23);
        assert_eq!(page.pagination.total_pages, 3);

        let empty: Paginated<i32> = Paginated::new(vec![], 1, 10, 0);
        assert_eq!(empty.pagination.total, 0);
        assert_eq!(empty.pagination.total_pages, 0);
        assert!(empty.data.is_empty());
    }
}
