//! Review session controller.
//!
//! A session owns the immutable record set plus the filter, sort, page and
//! selection state for one table view. Every mutation recomputes the
//! filtered set, re-clamps the page and drops selected ids that are no
//! longer visible before returning.

use super::clock::Clock;
use super::criteria::FilterCriteria;
use super::paginate::PageState;
use super::selection::Selection;
use super::sort::{SortKey, SortState};
use super::{apply_all, filter, sort, ViewModel};
use crate::models::{AnalysisRecord, RecordSummary};
use chrono::{DateTime, Utc};
use tracing::debug;

pub struct ReviewSession<C: Clock> {
    records: Vec<AnalysisRecord>,
    criteria: FilterCriteria,
    sort_state: SortState,
    page_state: PageState,
    selection: Selection,
    clock: C,
}

impl<C: Clock> ReviewSession<C> {
    /// Seed a session with its records. Filters start cleared, sorted
    /// newest first, on page 1.
    pub fn new(records: Vec<AnalysisRecord>, items_per_page: usize, clock: C) -> Self {
        Self {
            records,
            criteria: FilterCriteria::default(),
            sort_state: SortState::default(),
            page_state: PageState::new(1, items_per_page),
            selection: Selection::new(),
            clock,
        }
    }

    pub fn records(&self) -> &[AnalysisRecord] {
        &self.records
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn sort_state(&self) -> SortState {
        self.sort_state
    }

    pub fn page_state(&self) -> PageState {
        self.page_state
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Compute the current page.
    pub fn view(&self) -> ViewModel<'_> {
        apply_all(
            &self.records,
            &self.criteria,
            &self.sort_state,
            &self.page_state,
            self.clock.now(),
        )
    }

    /// The session clock's current instant.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Every record passing the current filters, in display order.
    pub fn filtered_records(&self) -> Vec<&AnalysisRecord> {
        let filtered = filter(&self.records, &self.criteria, self.clock.now());
        sort(&filtered, &self.sort_state)
    }

    pub fn visible_ids(&self) -> Vec<u64> {
        self.filtered_records().iter().map(|r| r.id).collect()
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.refresh();
    }

    /// Change one or more filter fields in place.
    #[allow(dead_code)] // Table control; the CLI renders one view per run
    pub fn update_criteria<F>(&mut self, update: F)
    where
        F: FnOnce(&mut FilterCriteria),
    {
        update(&mut self.criteria);
        self.refresh();
    }

    #[allow(dead_code)] // Table control; the CLI renders one view per run
    pub fn clear_filters(&mut self) {
        self.set_criteria(FilterCriteria::default());
    }

    pub fn sort_by(&mut self, sort_state: SortState) {
        self.sort_state = sort_state;
        self.refresh();
    }

    /// Header click on `key`.
    #[allow(dead_code)] // Table control; the CLI renders one view per run
    pub fn toggle_sort(&mut self, key: SortKey) {
        self.sort_by(self.sort_state.toggle(key));
    }

    /// Jump to `page`, clamped to the available pages. Returns the page shown.
    pub fn go_to_page(&mut self, page: usize) -> usize {
        self.page_state = self.page_state.with_page(page);
        self.refresh();
        self.page_state.current_page()
    }

    #[allow(dead_code)] // Table control; the CLI renders one view per run
    pub fn next_page(&mut self) -> usize {
        self.go_to_page(self.page_state.current_page().saturating_add(1))
    }

    #[allow(dead_code)] // Table control; the CLI renders one view per run
    pub fn previous_page(&mut self) -> usize {
        self.go_to_page(self.page_state.current_page().saturating_sub(1))
    }

    /// Select a visible record. Ids outside the filtered set are ignored.
    pub fn select(&mut self, id: u64) -> bool {
        if self.visible_ids().contains(&id) {
            self.selection.select(id);
            true
        } else {
            debug!("Ignoring selection of non-visible record {}", id);
            false
        }
    }

    #[allow(dead_code)] // Table control; the CLI renders one view per run
    pub fn deselect(&mut self, id: u64) {
        self.selection.deselect(id);
    }

    /// Flip a visible record's checkbox. Returns whether it is now selected.
    #[allow(dead_code)] // Table control; the CLI renders one view per run
    pub fn toggle_select(&mut self, id: u64) -> bool {
        if self.selection.contains(id) || self.visible_ids().contains(&id) {
            self.selection.toggle(id)
        } else {
            debug!("Ignoring selection of non-visible record {}", id);
            false
        }
    }

    /// Header checkbox, scoped to the filtered (unpaginated) set.
    pub fn select_all(&mut self, checked: bool) {
        let visible = self.visible_ids();
        self.selection.set_all(visible, checked);
    }

    pub fn is_all_selected(&self) -> bool {
        self.selection.is_all_selected(&self.visible_ids())
    }

    /// Selected records in display order.
    pub fn selected_records(&self) -> Vec<&AnalysisRecord> {
        self.filtered_records()
            .into_iter()
            .filter(|r| self.selection.contains(r.id))
            .collect()
    }

    /// Records an export covers: the selection when there is one,
    /// otherwise everything passing the filters.
    pub fn export_scope(&self) -> Vec<&AnalysisRecord> {
        if self.selection.is_empty() {
            self.filtered_records()
        } else {
            self.selected_records()
        }
    }

    /// Metrics over the filtered set.
    pub fn summary(&self) -> RecordSummary {
        RecordSummary::from_records(filter(&self.records, &self.criteria, self.clock.now()))
    }

    fn refresh(&mut self) {
        let visible = self.visible_ids();
        let total_pages = self.page_state.total_pages(visible.len());
        let clamped = self.page_state.clamped(total_pages);

        if clamped != self.page_state {
            debug!(
                "Clamping page {} to {} of {}",
                self.page_state.current_page(),
                clamped.current_page(),
                total_pages
            );
            self.page_state = clamped;
        }

        let dropped = self.selection.retain(&visible);
        if dropped > 0 {
            debug!("Dropped {} selected records hidden by filters", dropped);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnalysisStatus, TumorType};
    use crate::review::clock::FixedClock;
    use crate::review::criteria::{ConfidenceLevel, StatusFilter, TumorTypeFilter};
    use crate::review::sort::SortDirection;
    use crate::seed::history_records;
    use chrono::{Duration, TimeZone, Utc};

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2024, 1, 16, 0, 0, 0).unwrap())
    }

    fn session(per_page: usize) -> ReviewSession<FixedClock> {
        ReviewSession::new(history_records(), per_page, clock())
    }

    fn page_ids(session: &ReviewSession<FixedClock>) -> Vec<u64> {
        session.view().items.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_initial_view_is_newest_first() {
        let session = session(10);
        assert_eq!(page_ids(&session), (1..=10).collect::<Vec<_>>());
        assert_eq!(session.page_state().current_page(), 1);
    }

    #[test]
    fn test_navigation_clamps() {
        let mut session = session(3);
        assert_eq!(session.view().total_pages, 4);

        assert_eq!(session.next_page(), 2);
        assert_eq!(page_ids(&session), vec![4, 5, 6]);

        assert_eq!(session.go_to_page(99), 4);
        assert_eq!(page_ids(&session), vec![10]);
        assert_eq!(session.next_page(), 4);

        assert_eq!(session.go_to_page(1), 1);
        assert_eq!(session.previous_page(), 1);
    }

    #[test]
    fn test_narrowing_filter_reclamps_page() {
        let mut session = session(3);
        session.go_to_page(4);

        session.update_criteria(|c| c.confidence_level = ConfidenceLevel::High);
        // five high-confidence records fit on two pages
        assert_eq!(session.page_state().current_page(), 2);
        assert_eq!(page_ids(&session), vec![7, 10]);
    }

    #[test]
    fn test_toggle_sort() {
        let mut session = session(10);
        session.toggle_sort(SortKey::Confidence);
        assert_eq!(
            session.sort_state(),
            SortState::new(SortKey::Confidence, SortDirection::Asc)
        );
        assert_eq!(page_ids(&session)[0], 8);

        session.toggle_sort(SortKey::Confidence);
        assert_eq!(page_ids(&session)[0], 4);
    }

    #[test]
    fn test_select_all_scopes_to_filtered_set() {
        let mut session = session(2);
        session.update_criteria(|c| c.tumor_type = TumorTypeFilter::Only(TumorType::NoTumor));
        session.select_all(true);

        assert_eq!(session.selection().ids().collect::<Vec<_>>(), vec![4, 7, 10]);
        assert!(session.is_all_selected());

        session.select_all(false);
        assert!(session.selection().is_empty());
    }

    #[test]
    fn test_filter_change_drops_stale_selection() {
        let mut session = session(10);
        session.select(1);
        session.select(8);
        session.select(10);

        session.update_criteria(|c| c.status = StatusFilter::Only(AnalysisStatus::Completed));
        assert_eq!(session.selection().ids().collect::<Vec<_>>(), vec![1, 10]);

        session.clear_filters();
        assert_eq!(session.selection().len(), 2);
    }

    #[test]
    fn test_select_ignores_hidden_records() {
        let mut session = session(10);
        session.update_criteria(|c| c.search_query = "PT-2024-008".to_string());

        assert!(!session.select(1));
        assert!(session.select(8));
        assert!(!session.toggle_select(8));
        assert!(session.selection().is_empty());
    }

    #[test]
    fn test_export_scope() {
        let mut session = session(10);
        session.update_criteria(|c| c.tumor_type = TumorTypeFilter::Only(TumorType::Glioma));
        let scope: Vec<u64> = session.export_scope().iter().map(|r| r.id).collect();
        assert_eq!(scope, vec![1, 5, 8]);

        session.select(5);
        let scope: Vec<u64> = session.export_scope().iter().map(|r| r.id).collect();
        assert_eq!(scope, vec![5]);
    }

    #[test]
    fn test_summary_follows_filters() {
        let mut session = session(10);
        assert_eq!(session.summary().total, 10);

        session.update_criteria(|c| c.status = StatusFilter::Only(AnalysisStatus::Failed));
        let summary = session.summary();
        assert_eq!(summary.total, 1);
        assert_eq!(summary.failed, 1);
    }

    #[test]
    fn test_date_range_uses_injected_clock() {
        let later = FixedClock(clock().0 + Duration::days(3));
        let mut session = ReviewSession::new(history_records(), 10, later);
        session.update_criteria(|c| c.date_range = crate::review::DateRange::Week);

        // window starts 2024-01-12 00:00
        assert_eq!(session.visible_ids(), vec![1, 2, 3, 4, 5, 6, 7]);
    }
}
