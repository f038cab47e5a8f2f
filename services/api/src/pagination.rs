//! Page/limit pagination shared by list endpoints

use serde::Serialize;

use crate::config::ApiConfig;

/// Resolved page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub limit: u32,
}

impl Page {
    /// Clamp the requested page (1-based) and limit to the configured bounds
    pub fn new(page: Option<u32>, limit: Option<u32>, config: &ApiConfig) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit
                .unwrap_or(config.default_page_size)
                .clamp(1, config.max_page_size),
        }
    }

    pub fn limit(&self) -> i64 {
        self.limit as i64
    }

    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.limit as i64
    }
}

#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub count: i64,
    pub page: u32,
    pub limit: u32,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn new(results: Vec<T>, count: i64, page: Page) -> Self {
        Self {
            count,
            page: page.page,
            limit: page.limit,
            results,
        }
    }
}
