//! The record review pipeline.
//!
//! Filtering, sorting and pagination are pure functions over a borrowed
//! record slice. [`apply_all`] composes them in a fixed order and
//! [`ReviewSession`] owns the state a table view mutates between calls.

pub mod clock;
pub mod criteria;
pub mod filter;
pub mod paginate;
pub mod selection;
pub mod session;
pub mod sort;

pub use clock::{Clock, FixedClock, SystemClock};
pub use criteria::{
    parse_date, ConfidenceLevel, CustomRange, DateRange, FilterCriteria, StatusFilter,
    TumorTypeFilter,
};
pub use filter::filter;
pub use paginate::{paginate, PageState, RangeLabel, DEFAULT_ITEMS_PER_PAGE};
pub use session::ReviewSession;
pub use sort::{sort, SortDirection, SortKey, SortState};

use crate::models::AnalysisRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Everything a table needs to render one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel<'a> {
    /// Records on the current page, in display order.
    pub items: Vec<&'a AnalysisRecord>,
    /// The page actually shown, after clamping.
    pub current_page: usize,
    pub total_pages: usize,
    pub range_label: RangeLabel,
    /// Ids of every record that survived filtering, in sorted order.
    pub filtered_ids: Vec<u64>,
}

impl ViewModel<'_> {
    pub fn filtered_count(&self) -> usize {
        self.filtered_ids.len()
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

/// Filter, sort, clamp the page, then paginate.
///
/// Page boundaries are computed over the filtered set. The page in
/// `page_state` is clamped to the available pages before slicing, so a
/// narrowed result set never renders an empty page.
pub fn apply_all<'a>(
    records: &'a [AnalysisRecord],
    criteria: &FilterCriteria,
    sort_state: &SortState,
    page_state: &PageState,
    now: DateTime<Utc>,
) -> ViewModel<'a> {
    let filtered = filter(records, criteria, now);
    let sorted = sort(&filtered, sort_state);

    let effective = page_state.clamped(page_state.total_pages(sorted.len()));
    let page = paginate(&sorted, &effective);

    ViewModel {
        items: page.items,
        current_page: effective.current_page(),
        total_pages: page.total_pages,
        range_label: page.range_label,
        filtered_ids: sorted.iter().map(|r| r.id).collect(),
    }
}
