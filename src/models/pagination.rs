//! Pagination primitives shared across list endpoints.

use serde::{Deserialize, Serialize};

/// Pagination query parameters (`?page=&limit=`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pagination {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl Pagination {
    /// Maximum items per page.
    const MAX_LIMIT: i64 = 100;

    /// Default items per page.
    const DEFAULT_LIMIT: i64 = 10;

    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }

    /// Rows to skip. Saturates for absurd page numbers, which then read past the end.
    pub fn offset(&self) -> i64 {
        (self.current_page() - 1).saturating_mul(self.limit())
    }

    pub fn current_page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }
}

/// One page of a list plus the counts needed to render pagination controls.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub total_pages: i64,
}

impl<T> PagedResult<T> {
    pub fn new(items: Vec<T>, total: i64, pagination: &Pagination) -> Self {
        let limit = pagination.limit();
        let total_pages = (total + limit - 1) / limit;
        Self {
            items,
            total,
            page: pagination.current_page(),
            total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedResult<U> {
        PagedResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults() {
        let p = Pagination::default();
        assert_eq!(p.limit(), 10);
        assert_eq!(p.offset(), 0);
        assert_eq!(p.current_page(), 1);
    }

    #[test]
    fn pagination_clamps_limit() {
        let p = Pagination {
            page: Some(1),
            limit: Some(500),
        };
        assert_eq!(p.limit(), 100);

        let p = Pagination {
            page: Some(1),
            limit: Some(0),
        };
        assert_eq!(p.limit(), 1);
    }

    #[test]
    fn pagination_offset_calculation() {
        let p = Pagination {
            page: Some(3),
            limit: Some(10),
        };
        assert_eq!(p.offset(), 20);
    }

    #[test]
    fn non_positive_page_is_first_page() {
        let p = Pagination {
            page: Some(-4),
            limit: Some(10),
        };
        assert_eq!(p.current_page(), 1);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn huge_page_saturates_offset() {
        let p = Pagination {
            page: Some(i64::MAX / 10),
            limit: Some(100),
        };
        assert_eq!(p.offset(), i64::MAX);

        let result = PagedResult::<u8>::new(Vec::new(), 15, &p);
        assert!(result.items.is_empty());
        assert_eq!(result.total_pages, 2);
    }

    #[test]
    fn second_page_of_fifteen() {
        let p = Pagination {
            page: Some(2),
            limit: Some(10),
        };
        assert_eq!(p.offset(), 10);
        let result = PagedResult::new(vec![0u8; 5], 15, &p);
        assert_eq!(result.items.len(), 5);
        assert_eq!(result.total_pages, 2);
        assert_eq!(result.page, 2);
    }

    #[test]
    fn empty_result_has_zero_pages() {
        let result = PagedResult::<u8>::new(Vec::new(), 0, &Pagination::default());
        assert_eq!(result.total_pages, 0);
    }

    #[test]
    fn paged_result_serializes_camel_case() {
        let result = PagedResult::new(vec![1], 1, &Pagination::default());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["totalPages"], 1);
    }
}
