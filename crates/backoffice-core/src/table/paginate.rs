//! Pagination state shared by client- and server-paginated screens.
//!
//! Some endpoints return the whole collection and the screen slices it
//! locally; others accept `page`/`limit` query parameters and return one
//! slice plus a page count. Both variants drive identical Prev/Next/page
//! controls, so the state type is the same and only the owner of
//! `total_pages` differs.

use serde::{Deserialize, Serialize};

/// Which side owns slicing and the page count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaginationMode {
    /// All rows fetched once; slices computed locally.
    Client,
    /// The backend returns one page and the total page count.
    Server,
}

/// Current page, page size, and page count. Invariants: `page >= 1`,
/// `limit >= 1`, `total_pages >= 1`, `page <= total_pages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    pub page: usize,
    pub limit: usize,
    pub total_pages: usize,
}

impl PageState {
    pub fn new(limit: usize) -> Self {
        Self {
            page: 1,
            limit: limit.max(1),
            total_pages: 1,
        }
    }

    /// Recompute `total_pages` from a client-side row count and clamp the
    /// current page back into range (e.g. after a filter shrinks the set).
    pub fn recalc(&mut self, total_rows: usize) {
        self.total_pages = total_rows.div_ceil(self.limit).max(1);
        self.page = self.page.min(self.total_pages);
    }

    /// Adopt a server-reported page count.
    pub fn set_total_pages(&mut self, total_pages: usize) {
        self.total_pages = total_pages.max(1);
        self.page = self.page.min(self.total_pages);
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.total_pages);
    }

    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit.max(1);
        self.page = 1;
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// The client-mode slice for the current page.
    pub fn page_slice<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        let start = (self.page - 1).saturating_mul(self.limit).min(rows.len());
        let end = start.saturating_add(self.limit).min(rows.len());
        &rows[start..end]
    }
}
