//! Shared Types
//!
//! Common types used across the application

use serde::{Deserialize, Serialize};

/// Pagination query parameters
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: u32,

    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    20
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl PaginationParams {
    /// Calculate offset for queries (page 从 1 开始)
    pub fn offset(&self) -> u32 {
        self.page.saturating_sub(1) * self.limit()
    }

    /// Get limit for queries (capped at 100)
    pub fn limit(&self) -> u32 {
        self.page_size.clamp(1, 100)
    }
}

/// Paginated response wrapper
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let p = PaginationParams::default();
        assert_eq!(p.page, 1);
        assert_eq!(p.limit(), 20);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_pagination_caps() {
        let p = PaginationParams {
            page: 3,
            page_size: 1000,
        };
        assert_eq!(p.limit(), 100);
        assert_eq!(p.offset(), 200);
    }
}
