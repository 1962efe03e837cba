// ABOUTME: Offset pagination parameters shared by every list endpoint
// ABOUTME: Normalizes page/page_size query values and carries page metadata in responses
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fluent Life

use serde::{Deserialize, Serialize};

/// Page number used when the client sends none or an invalid one
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when the client sends none or one outside `1..=MAX_PAGE_SIZE`
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page size a client may request
pub const MAX_PAGE_SIZE: u32 = 100;

/// Raw `page` / `page_size` query parameters
///
/// Values are signed so that `page=-1` deserializes and is then normalized
/// instead of failing the whole request.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    /// Requested 1-based page
    pub page: Option<i64>,
    /// Requested number of rows per page
    pub page_size: Option<i64>,
}

/// Normalized page parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageParams {
    /// 1-based page number
    pub page: u32,
    /// Rows per page, always within `1..=MAX_PAGE_SIZE`
    pub page_size: u32,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl From<PageQuery> for PageParams {
    fn from(query: PageQuery) -> Self {
        let page = match query.page {
            Some(p) if p >= 1 => u32::try_from(p).unwrap_or(u32::MAX),
            _ => DEFAULT_PAGE,
        };
        let page_size = match query.page_size {
            Some(s) if (1..=i64::from(MAX_PAGE_SIZE)).contains(&s) => s as u32,
            _ => DEFAULT_PAGE_SIZE,
        };
        Self { page, page_size }
    }
}

impl PageParams {
    /// SQL `LIMIT`
    #[must_use]
    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    /// SQL `OFFSET`
    #[must_use]
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.page_size)
    }
}

/// One page of results plus the total row count
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    /// Rows on this page
    pub items: Vec<T>,
    /// Total rows matching the filter, across all pages
    pub total: i64,
    /// Page parameters that produced this page
    #[serde(flatten)]
    pub params: PageParams,
}

impl<T> Page<T> {
    /// Build a page from rows and a total count
    #[must_use]
    pub const fn new(items: Vec<T>, total: i64, params: PageParams) -> Self {
        Self {
            items,
            total,
            params,
        }
    }
}
