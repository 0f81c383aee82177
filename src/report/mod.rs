//! Report rendering and record export.

pub mod export;
pub mod generator;

pub use export::{write_export, ExportFormat, ExportOptions};
pub use generator::{generate_json_report, generate_markdown_report};

use crate::analysis::{
    confidence_distribution, low_confidence_records, monthly_volume, tumor_type_distribution,
};
use crate::analysis::{ConfidenceBucket, MonthlyVolume};
use crate::models::{AnalysisRecord, RecordSummary, TumorType};
use crate::review::{Clock, FilterCriteria, RangeLabel, ReviewSession, SortState};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Where the records came from and when the report was built.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    /// Archive path, or "built-in history".
    pub source: String,
    pub total_records: usize,
}

/// One rendered page of the history table plus its surrounding metrics.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewReport {
    pub metadata: ReportMetadata,
    pub criteria: FilterCriteria,
    pub sort: SortState,
    pub current_page: usize,
    pub total_pages: usize,
    pub items_per_page: usize,
    pub has_previous: bool,
    pub has_next: bool,
    /// Records passing the filters, across all pages.
    pub filtered_count: usize,
    pub range_label: RangeLabel,
    pub items: Vec<AnalysisRecord>,
    /// Metrics over the filtered set.
    pub summary: RecordSummary,
    pub tumor_distribution: Vec<(TumorType, usize)>,
    pub confidence_distribution: Vec<ConfidenceBucket>,
    pub monthly_volume: Vec<MonthlyVolume>,
    /// Filtered records below the high-confidence band, lowest first.
    pub flagged: Vec<AnalysisRecord>,
    pub selected_ids: Vec<u64>,
    /// Every filtered record is selected.
    pub all_selected: bool,
}

impl ReviewReport {
    /// Snapshot the session's current view.
    pub fn from_session<C: Clock>(session: &ReviewSession<C>, source: &str, now: DateTime<Utc>) -> Self {
        let view = session.view();
        let scope = session.filtered_records();

        Self {
            metadata: ReportMetadata {
                generated_at: now,
                source: source.to_string(),
                total_records: session.records().len(),
            },
            criteria: session.criteria().clone(),
            sort: session.sort_state(),
            current_page: view.current_page,
            total_pages: view.total_pages,
            items_per_page: session.page_state().items_per_page(),
            has_previous: view.has_previous(),
            has_next: view.has_next(),
            filtered_count: view.filtered_count(),
            range_label: view.range_label,
            items: view.items.into_iter().cloned().collect(),
            summary: session.summary(),
            tumor_distribution: tumor_type_distribution(&scope),
            confidence_distribution: confidence_distribution(&scope),
            monthly_volume: monthly_volume(&scope),
            flagged: low_confidence_records(&scope).into_iter().cloned().collect(),
            selected_ids: session.selection().ids().collect(),
            all_selected: session.is_all_selected(),
        }
    }
}
