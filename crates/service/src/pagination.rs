//! Pagination utilities for service layer
//!
//! `Pagination` describes the requested slice, `PaginatedList` carries one
//! page of results together with the total match count.

use serde::Serialize;

use crate::errors::ServiceError;

/// Wire-level page size meaning "return every row".
pub const UNBOUNDED_PER_PAGE: i64 = -1;

/// Page size: a row limit, or every matching row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PerPage {
    Limit(u64),
    Unbounded,
}

/// Largest offset or limit the SQL drivers bind (`BIGINT`).
const MAX_SQL_ROWS: u64 = i64::MAX as u64;

/// Rows a [`Pagination`] selects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageWindow {
    /// Every matching row.
    All,
    Slice { offset: u64, limit: u64 },
    /// Starts past the last row any database can hold.
    Beyond,
}

/// Pagination parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    /// 0-based page index
    pub page: u64,
    /// items per page
    pub per_page: PerPage,
}

impl Pagination {
    pub fn new(page: u64, per_page: u64) -> Self {
        Self { page, per_page: PerPage::Limit(per_page) }
    }

    /// Every matching row as a single page.
    pub fn unbounded() -> Self {
        Self { page: 0, per_page: PerPage::Unbounded }
    }

    /// Build from raw query values where `per_page == -1` means unbounded.
    pub fn from_raw(page: i64, per_page: i64) -> Result<Self, ServiceError> {
        let page = u64::try_from(page)
            .map_err(|_| ServiceError::Validation(format!("page must be >= 0, got {page}")))?;
        let per_page = match per_page {
            UNBOUNDED_PER_PAGE => PerPage::Unbounded,
            n => PerPage::Limit(u64::try_from(n).map_err(|_| {
                ServiceError::Validation(format!(
                    "per_page must be >= 0 or {UNBOUNDED_PER_PAGE}, got {n}"
                ))
            })?),
        };
        Ok(Self { page, per_page })
    }

    /// Offset and limit of the page. Limits above `i64::MAX` are clamped,
    /// offsets above it yield [`PageWindow::Beyond`].
    pub fn window(&self) -> PageWindow {
        match self.per_page {
            PerPage::Unbounded => PageWindow::All,
            PerPage::Limit(n) => match self.page.checked_mul(n) {
                Some(offset) if offset <= MAX_SQL_ROWS => {
                    PageWindow::Slice { offset, limit: n.min(MAX_SQL_ROWS) }
                }
                _ => PageWindow::Beyond,
            },
        }
    }
}

impl Default for Pagination {
    fn default() -> Self { Self::new(0, 20) }
}

/// One page of results.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PaginatedList<T> {
    pub total_count: u64,
    pub results: Vec<T>,
    pub page: u64,
    /// Requested page size; equals `total_count` for unbounded requests.
    pub per_page: u64,
}

impl<T> PaginatedList<T> {
    pub fn total_pages(&self) -> u64 {
        if self.per_page == 0 {
            0
        } else {
            self.total_count.div_ceil(self.per_page)
        }
    }

    pub fn has_next(&self) -> bool {
        self.page.saturating_add(1) < self.total_pages()
    }
}
