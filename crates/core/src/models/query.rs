use serde::{Deserialize, Serialize};

use super::loan::LoanStatus;

/// Sort direction sent to list endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Paging, search and sort parameters for server-side listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub search_key: String,
    pub page_no: u32,
    pub page_count: u32,
    pub sort_by_field: String,
    pub sort_by_order: SortOrder,
    /// Only loans in this state; `None` lists every status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<LoanStatus>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search_key: String::new(),
            page_no: 1,
            page_count: 10,
            sort_by_field: "createdAt".to_string(),
            sort_by_order: SortOrder::Desc,
            status: None,
        }
    }
}

impl ListQuery {
    /// Sort by `field`: flips an ascending sort on the same field to
    /// descending, anything else becomes ascending. Returns to page one.
    pub fn toggle_sort(&mut self, field: &str) {
        self.sort_by_order = if self.sort_by_field == field && self.sort_by_order == SortOrder::Asc {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        };
        self.sort_by_field = field.to_string();
        self.page_no = 1;
    }

    pub fn with_search(mut self, key: impl Into<String>) -> Self {
        self.search_key = key.into();
        self.page_no = 1;
        self
    }

    /// Filter by loan status (`None` for all). Returns to page one.
    pub fn with_status(mut self, status: Option<LoanStatus>) -> Self {
        self.status = status;
        self.page_no = 1;
        self
    }

    pub fn with_page(mut self, page_no: u32, page_count: u32) -> Self {
        self.page_no = page_no;
        self.page_count = page_count;
        self
    }

    /// Window of `total` records this query's page covers.
    pub fn window(&self, total: u64) -> PageWindow {
        PageWindow::new(self.page_no, self.page_count, total)
    }
}

/// Bare paging body used by the finance list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub page_no: u32,
    pub page_count: u32,
}

impl PageRequest {
    /// The finance page pulls everything in one large first page.
    pub const FINANCE_BULK: PageRequest = PageRequest {
        page_no: 1,
        page_count: 500,
    };
}

/// One page of a server-side listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

/// Indices for the "showing X to Y of Z" footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Zero-based index of the first record on the page, clamped to the total
    pub start_index: u64,
    /// Exclusive end index, clamped to the total
    pub end_index: u64,
    pub total_pages: u64,
}

impl PageWindow {
    pub fn new(page_no: u32, page_count: u32, total: u64) -> Self {
        let per_page = u64::from(page_count.max(1));
        let start_index = (u64::from(page_no.max(1) - 1) * per_page).min(total);
        Self {
            start_index,
            end_index: (start_index + per_page).min(total),
            total_pages: total.div_ceil(per_page),
        }
    }

    /// True when the page holds no records (empty listing or past the last page).
    pub fn is_empty(&self) -> bool {
        self.start_index >= self.end_index
    }

    pub fn has_next(&self, page_no: u32) -> bool {
        u64::from(page_no) < self.total_pages
    }
}
