use serde::{Deserialize, Serialize};

use crate::{AppError, AppResult};

/// Default page size for paginated listings.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Upper bound on the page size a caller may request.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Validated 1-indexed pagination request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Creates a pagination request from raw query values.
    pub fn new(page: Option<u32>, limit: Option<u32>) -> AppResult<Self> {
        let page = page.unwrap_or(1);
        let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT);

        if page == 0 {
            return Err(AppError::Validation("page must be at least 1".to_owned()));
        }

        if limit == 0 || limit > MAX_PAGE_LIMIT {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {MAX_PAGE_LIMIT}"
            )));
        }

        Ok(Self { page, limit })
    }

    /// Returns the 1-indexed page number.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Returns the page size.
    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Returns the row offset for this page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

/// Pagination metadata returned alongside a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// The 1-indexed page that was returned.
    pub page: u32,
    /// The page size that was applied.
    pub limit: u32,
    /// Total matching rows across all pages.
    pub total: u64,
    /// Total page count, `ceil(total / limit)`.
    pub total_pages: u64,
}

impl PageInfo {
    /// Builds pagination metadata for a request and total row count.
    #[must_use]
    pub fn new(request: PageRequest, total: u64) -> Self {
        Self {
            page: request.page,
            limit: request.limit,
            total,
            total_pages: total.div_ceil(u64::from(request.limit)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{PageInfo, PageRequest};

    #[test]
    fn defaults_apply_when_values_missing() {
        let request = PageRequest::new(None, None);
        assert!(request.is_ok());
        let request = request.unwrap_or_default();
        assert_eq!(request.page(), 1);
        assert_eq!(request.limit(), 10);
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn zero_page_is_rejected() {
        assert!(PageRequest::new(Some(0), Some(10)).is_err());
    }

    #[test]
    fn oversized_limit_is_rejected() {
        assert!(PageRequest::new(Some(1), Some(500)).is_err());
    }

    #[test]
    fn offset_skips_previous_pages() {
        let request = PageRequest::new(Some(3), Some(25)).unwrap_or_default();
        assert_eq!(request.offset(), 50);
    }

    #[test]
    fn total_pages_rounds_up() {
        let request = PageRequest::new(Some(1), Some(10)).unwrap_or_default();
        assert_eq!(PageInfo::new(request, 0).total_pages, 0);
        assert_eq!(PageInfo::new(request, 10).total_pages, 1);
        assert_eq!(PageInfo::new(request, 11).total_pages, 2);
    }
}
