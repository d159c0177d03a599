//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-indexed).
    #[serde(default = "default_page")]
    pub page: u32,
    /// Number of items per page.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl PageRequest {
    /// Calculates the offset for database queries.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from((self.page.saturating_sub(1)) * self.per_page)
    }

    /// Returns the limit for database queries.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.per_page)
    }
}

/// Response wrapper for paginated data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    /// The items in the current page.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub meta: PageMeta,
}

/// Pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Total number of items across all pages.
    pub total: u64,
    /// Total number of pages.
    pub total_pages: u32,
}

impl<T> PageResponse<T> {
    /// Creates a new paginated response.
    #[must_use]
    pub fn new(data: Vec<T>, page: u32, per_page: u32, total: u64) -> Self {
        let total_pages = if total == 0 {
            1
        } else {
            u32::try_from(total.div_ceil(u64::from(per_page.max(1)))).unwrap_or(u32::MAX)
        };

        Self {
            data,
            meta: PageMeta {
                page,
                per_page,
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
    fn test_page_request_default() {
        let request = PageRequest::default();
        assert_eq!(request.page, 1);
        assert_eq!(request.per_page, 20);
    }

    #[test]
    fn test_page_request_offset() {
        let request = PageRequest {
            page: 1,
            per_page: 20,
        };
        assert_eq!(request.offset(), 0);

        let request = PageRequest {
            page: 2,
            per_page: 20,
        };
        assert_eq!(request.offset(), 20);
    }

    #[test]
    fn test_page_request_limit() {
        let request = PageRequest {
            page: 1,
            per_page: 50,
        };
        assert_eq!(request.limit(), 50);
    }

    #[test]
    fn test_page_response_new() {
        let data = vec![1, 2, 3];
        let response = PageResponse::new(data.clone(), 1, 10, 3);

        assert_eq!(response.data, data);
        assert_eq!(response.meta.page, 1);
        assert_eq!(response.meta.per_page, 10);
        assert_eq!(response.meta.total, 3);
        assert_eq!(response.meta.total_pages, 1);
    }

    #[rstest::rstest]
    #[case(25, 10, 3)]
    #[case(30, 10, 3)]
    #[case(31, 10, 4)]
    #[case(1, 10, 1)]
    fn test_page_response_total_pages(
        #[case] total: u64,
        #[case] per_page: u32,
        #[case] expected: u32,
    ) {
        let response: PageResponse<i32> = PageResponse::new(vec![], 1, per_page, total);
        assert_eq!(response.meta.total_pages, expected);
    }

    #[test]
    fn test_page_response_empty() {
        let response: PageResponse<i32> = PageResponse::new(vec![], 1, 10, 0);
        assert_eq!(response.meta.total_pages, 1);
    }
}
