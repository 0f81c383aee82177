//! Page slicing and range labels.

use crate::models::AnalysisRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;

/// Requested page. Both fields are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageState {
    current_page: usize,
    items_per_page: usize,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            current_page: 1,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
        }
    }
}

impl PageState {
    /// Zero values are raised to 1.
    pub fn new(current_page: usize, items_per_page: usize) -> Self {
        Self {
            current_page: current_page.max(1),
            items_per_page: items_per_page.max(1),
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    pub fn with_page(self, page: usize) -> Self {
        Self::new(page, self.items_per_page)
    }

    /// Number of pages needed for `total` items, never less than 1.
    pub fn total_pages(&self, total: usize) -> usize {
        total.div_ceil(self.items_per_page).max(1)
    }

    /// This state with `current_page` pulled into `[1, total_pages]`.
    pub fn clamped(self, total_pages: usize) -> Self {
        Self::new(self.current_page.min(total_pages.max(1)), self.items_per_page)
    }
}

/// "Showing `first` to `last` of `total` results".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeLabel {
    pub first: usize,
    pub last: usize,
    pub total: usize,
}

impl fmt::Display for RangeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total == 0 {
            write!(f, "No results")
        } else {
            write!(
                f,
                "Showing {} to {} of {} results",
                self.first, self.last, self.total
            )
        }
    }
}

/// One page of records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<'a> {
    pub items: Vec<&'a AnalysisRecord>,
    pub total_pages: usize,
    pub range_label: RangeLabel,
}

/// Slice out the requested page.
///
/// The page is not clamped here: asking past the end yields an empty
/// `items`. Callers clamp with [`PageState::clamped`] first.
pub fn paginate<'a>(records: &[&'a AnalysisRecord], state: &PageState) -> Page<'a> {
    let total = records.len();
    let per_page = state.items_per_page();
    let start = (state.current_page() - 1).saturating_mul(per_page);
    let end = state.current_page().saturating_mul(per_page);

    let items = if start < total {
        records[start..end.min(total)].to_vec()
    } else {
        Vec::new()
    };

    Page {
        items,
        total_pages: state.total_pages(total),
        range_label: RangeLabel {
            first: start.saturating_add(1),
            last: end.min(total),
            total,
        },
    }
}
