// ABOUTME: Pagination parameters for list endpoints
// ABOUTME: Out-of-range values are rejected, not clamped, so client expectations stay exact

use serde::Deserialize;
use thiserror::Error;

/// Default page size for paginated queries
pub const DEFAULT_PER_PAGE: i64 = 20;

/// Maximum page size to prevent performance issues
pub const MAX_PER_PAGE: i64 = 100;

/// Minimum page number (1-indexed)
pub const MIN_PAGE: i64 = 1;

/// Errors produced when pagination parameters are out of bounds
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    #[error("page must be >= {MIN_PAGE}, got {0}")]
    PageOutOfRange(i64),
    #[error("per_page must be between 1 and {MAX_PER_PAGE}, got {0}")]
    PerPageOutOfRange(i64),
}

/// Query parameters for pagination
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationParams {
    /// Page number (1-indexed, defaults to 1)
    #[serde(default = "default_page")]
    pub page: i64,

    /// Number of items per page (defaults to DEFAULT_PER_PAGE, max MAX_PER_PAGE)
    #[serde(default = "default_per_page")]
    pub per_page: i64,
}

fn default_page() -> i64 {
    MIN_PAGE
}

fn default_per_page() -> i64 {
    DEFAULT_PER_PAGE
}

/// A validated LIMIT/OFFSET window derived from pagination parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub limit: i64,
    pub offset: i64,
}

impl PaginationParams {
    /// Create pagination params with custom values
    pub fn new(page: i64, per_page: i64) -> Self {
        Self { page, per_page }
    }

    /// Validate the parameters and compute the SQL window.
    ///
    /// Values outside the documented bounds are rejected rather than
    /// silently truncated.
    pub fn window(&self) -> Result<PageWindow, PaginationError> {
        if self.page < MIN_PAGE {
            return Err(PaginationError::PageOutOfRange(self.page));
        }
        if self.per_page < 1 || self.per_page > MAX_PER_PAGE {
            return Err(PaginationError::PerPageOutOfRange(self.per_page));
        }

        Ok(PageWindow {
            limit: self.per_page,
            offset: (self.page - 1) * self.per_page,
        })
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: MIN_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pagination_params() {
        let params = PaginationParams::default();
        let window = params.window().unwrap();
        assert_eq!(params.page, 1);
        assert_eq!(window.limit, DEFAULT_PER_PAGE);
        assert_eq!(window.offset, 0);
    }

    #[test]
    fn test_offset_calculation() {
        let window = PaginationParams::new(1, 20).window().unwrap();
        assert_eq!(window.offset, 0);

        let window = PaginationParams::new(2, 20).window().unwrap();
        assert_eq!(window.offset, 20);

        let window = PaginationParams::new(3, 10).window().unwrap();
        assert_eq!(window.offset, 20);
    }

    #[test]
    fn test_out_of_range_page_is_rejected() {
        assert_eq!(
            PaginationParams::new(0, 20).window(),
            Err(PaginationError::PageOutOfRange(0))
        );
        assert_eq!(
            PaginationParams::new(-5, 20).window(),
            Err(PaginationError::PageOutOfRange(-5))
        );
    }

    #[test]
    fn test_out_of_range_per_page_is_rejected() {
        assert_eq!(
            PaginationParams::new(1, 0).window(),
            Err(PaginationError::PerPageOutOfRange(0))
        );
        assert_eq!(
            PaginationParams::new(1, 101).window(),
            Err(PaginationError::PerPageOutOfRange(101))
        );
    }

    #[test]
    fn test_max_per_page_is_allowed() {
        let window = PaginationParams::new(1, MAX_PER_PAGE).window().unwrap();
        assert_eq!(window.limit, MAX_PER_PAGE);
    }
}
