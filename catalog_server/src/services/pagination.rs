//! Page-number pagination for list endpoints.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PER_PAGE: usize = 10;
pub const MAX_PER_PAGE: usize = 100;

#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl PageRequest {
    /// 1-based page number, at least 1.
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }

    /// Page size clamped to `1..=MAX_PER_PAGE`.
    pub fn per_page(&self) -> usize {
        self.per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE)
    }
}

/// One page of results plus the totals a client needs to render pagers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
}

/// Cut the requested page out of an already filtered, ordered list.
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let page = request.page();
    let per_page = request.per_page();
    let total = items.len();
    let data = items
        .into_iter()
        .skip((page - 1).saturating_mul(per_page))
        .take(per_page)
        .collect();

    Page {
        data,
        total,
        page,
        per_page,
        total_pages: total.div_ceil(per_page),
    }
}
