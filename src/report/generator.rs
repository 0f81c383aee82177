//! Markdown report generation.
//!
//! This module renders one page of the review table, with the active
//! filters and history metrics around it, as Markdown or JSON.

use super::{ReportMetadata, ReviewReport};
use crate::analysis::{generate_summary_text, ConfidenceBucket, MonthlyVolume};
use crate::models::{AnalysisRecord, RecordSummary, TumorType};
use crate::review::{SortKey, SortState};
use anyhow::Result;
use std::collections::BTreeSet;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &ReviewReport) -> String {
    let mut output = String::new();

    // Title
    output.push_str("# NeuroScan Analysis History\n\n");

    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_filters_section(report));
    output.push_str(&generate_summary_section(
        &report.summary,
        &report.tumor_distribution,
        &report.confidence_distribution,
        &report.monthly_volume,
    ));
    output.push_str(&generate_flagged_section(&report.flagged));
    output.push_str(&generate_table_section(report));
    output.push_str(&generate_footer());

    output
}

fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** {}\n", metadata.source));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Records:** {}\n", metadata.total_records));
    section.push('\n');

    section
}

fn generate_filters_section(report: &ReviewReport) -> String {
    let mut section = String::new();

    section.push_str("## Active Filters\n\n");

    if !report.criteria.has_active_filters() {
        section.push_str("None. Showing all records.\n\n");
    } else {
        for filter in report.criteria.describe() {
            section.push_str(&format!("- {}\n", filter));
        }
        section.push('\n');
    }

    section.push_str(&format!(
        "*Sorted by {} {}*\n\n",
        report.sort.key.label(),
        report.sort.direction.arrow()
    ));

    section
}

fn generate_summary_section(
    summary: &RecordSummary,
    tumors: &[(TumorType, usize)],
    buckets: &[ConfidenceBucket],
    months: &[MonthlyVolume],
) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n\n");
    section.push_str("```\n");
    section.push_str(&generate_summary_text(summary));
    section.push_str("\n```\n\n");

    if summary.total == 0 {
        return section;
    }

    section.push_str("### Tumor Type Distribution\n\n");
    section.push_str("| Classification | Count |\n");
    section.push_str("|:---|:---:|\n");
    for (tumor_type, count) in tumors {
        section.push_str(&format!("| {} | {} |\n", tumor_type.label(), count));
    }
    section.push('\n');

    section.push_str("### Confidence Distribution\n\n");
    section.push_str("| Range | Count | Share |\n");
    section.push_str("|:---|:---:|:---:|\n");
    for bucket in buckets {
        section.push_str(&format!(
            "| {} | {} | {:.0}% |\n",
            bucket.label, bucket.count, bucket.percentage
        ));
    }
    section.push('\n');

    if months.len() > 1 {
        section.push_str("### Monthly Volume\n\n");
        section.push_str("| Month | Analyses | Avg Confidence |\n");
        section.push_str("|:---|:---:|:---:|\n");
        for month in months {
            let avg = month
                .average_confidence
                .map_or_else(|| "-".to_string(), |c| format!("{:.1}%", c));
            section.push_str(&format!("| {} | {} | {} |\n", month.month, month.analyses, avg));
        }
        section.push('\n');
    }

    section
}

fn generate_flagged_section(flagged: &[AnalysisRecord]) -> String {
    if flagged.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Flagged for Review\n\n");
    section.push_str("Analyses below the high-confidence band:\n\n");
    for record in flagged {
        section.push_str(&format!(
            "- #{} `{}`: {} at {}\n",
            record.id,
            record.filename,
            record.tumor_type.label(),
            record.confidence_display()
        ));
    }
    section.push('\n');

    section
}

fn column_header(sort: &SortState, key: SortKey) -> String {
    if sort.key == key {
        format!("{} {}", key.label(), sort.direction.arrow())
    } else {
        key.label().to_string()
    }
}

fn generate_table_section(report: &ReviewReport) -> String {
    let mut section = String::new();

    section.push_str("## Analyses\n\n");

    if report.items.is_empty() {
        section.push_str("No analyses found. Try adjusting your filters.\n\n");
        section.push_str(&format!("*{}*\n\n", report.range_label));
        return section;
    }

    let selected: BTreeSet<u64> = report.selected_ids.iter().copied().collect();

    section.push_str(&format!(
        "| | {} | Patient / File | {} | {} | {} |\n",
        column_header(&report.sort, SortKey::Date),
        column_header(&report.sort, SortKey::TumorType),
        column_header(&report.sort, SortKey::Confidence),
        column_header(&report.sort, SortKey::Status),
    ));
    section.push_str("|:---:|:---|:---|:---|:---:|:---|\n");

    for record in &report.items {
        section.push_str(&generate_row(record, selected.contains(&record.id)));
    }
    section.push('\n');

    section.push_str(&format!(
        "*{} · Page {} of {}*\n\n",
        report.range_label, report.current_page, report.total_pages
    ));
    section.push_str(&generate_navigation(report));

    if report.all_selected {
        section.push_str(&format!(
            "**All {} item(s) selected**\n\n",
            report.filtered_count
        ));
    } else if !selected.is_empty() {
        section.push_str(&format!("**{} item(s) selected**\n\n", selected.len()));
    }

    section
}

/// `--page` hints for the neighbouring pages, empty on a single page.
fn generate_navigation(report: &ReviewReport) -> String {
    let mut links = Vec::new();

    if report.has_previous {
        links.push(format!("← Previous: `--page {}`", report.current_page - 1));
    }
    if report.has_next {
        links.push(format!("Next: `--page {}` →", report.current_page + 1));
    }

    if links.is_empty() {
        String::new()
    } else {
        format!("{}\n\n", links.join(" | "))
    }
}

/// Escape text for a Markdown table cell.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

fn generate_row(record: &AnalysisRecord, selected: bool) -> String {
    let check = if selected { "☑" } else { "☐" };
    let patient = record.patient_id.as_deref().unwrap_or("Unknown Patient");

    format!(
        "| {} | {} | {}<br>`{}` | {} | {} | {} {} |\n",
        check,
        record.date.format("%b %-d, %Y %H:%M"),
        escape_cell(patient),
        escape_cell(&record.filename),
        record.tumor_type.label(),
        record.confidence_display(),
        record.status.emoji(),
        record.status,
    )
}

fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str("*Report generated by neuroscan-review*\n");

    footer
}

/// Generate a JSON report.
pub fn generate_json_report(report: &ReviewReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::{FixedClock, ReviewSession, StatusFilter};
    use crate::seed::history_records;
    use chrono::{TimeZone, Utc};

    fn session(per_page: usize) -> ReviewSession<FixedClock> {
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 1, 16, 0, 0, 0).unwrap());
        ReviewSession::new(history_records(), per_page, clock)
    }

    fn create_test_report(session: &ReviewSession<FixedClock>) -> ReviewReport {
        ReviewReport::from_session(session, "built-in history", session.now())
    }

    #[test]
    fn test_generate_markdown_report() {
        let mut session = session(3);
        session.go_to_page(2);
        let markdown = generate_markdown_report(&create_test_report(&session));

        assert!(markdown.contains("# NeuroScan Analysis History"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("## Summary"));
        assert!(markdown.contains("None. Showing all records."));
        assert!(markdown.contains("Showing 4 to 6 of 10 results · Page 2 of 4"));
        assert!(markdown.contains("PT-2024-004"));
        assert!(!markdown.contains("PT-2024-001"));
        assert!(markdown.contains("Date ↓"));
        assert!(markdown.contains("## Flagged for Review"));
        assert!(markdown.contains("- #8 `follow_up_post_surgery.png`: Glioma at 76.3%"));
        assert!(markdown.contains("← Previous: `--page 1` | Next: `--page 3` →"));
    }

    #[test]
    fn test_navigation_on_edge_pages() {
        let mut session = session(3);
        let first = generate_markdown_report(&create_test_report(&session));
        assert!(first.contains("Next: `--page 2` →"));
        assert!(!first.contains("← Previous"));

        session.go_to_page(4);
        let last = generate_markdown_report(&create_test_report(&session));
        assert!(last.contains("← Previous: `--page 3`"));
        assert!(!last.contains("Next:"));

        let single = generate_markdown_report(&create_test_report(&self::session(10)));
        assert!(!single.contains("--page"));
    }

    #[test]
    fn test_select_all_is_reported() {
        let mut session = session(2);
        session.update_criteria(|c| c.status = "completed".parse::<StatusFilter>().unwrap());
        session.select_all(true);

        let report = create_test_report(&session);
        assert!(report.all_selected);
        assert_eq!(report.filtered_count, 8);
        assert!(generate_markdown_report(&report).contains("**All 8 item(s) selected**"));
    }

    #[test]
    fn test_row_escapes_pipes() {
        let mut record = history_records().remove(0);
        record.patient_id = Some("PT|01".to_string());
        record.filename = "a|b.png".to_string();

        let row = generate_row(&record, false);
        assert!(row.contains("PT\\|01"));
        assert!(row.contains("`a\\|b.png`"));
        // six columns, seven borders
        assert_eq!(row.replace("\\|", "").matches('|').count(), 7);
    }

    #[test]
    fn test_filters_and_selection_are_listed() {
        let mut session = session(10);
        session.update_criteria(|c| c.status = "completed".parse::<StatusFilter>().unwrap());
        session.select(3);
        session.select(4);

        let markdown = generate_markdown_report(&create_test_report(&session));
        assert!(markdown.contains("- Status: completed"));
        assert!(markdown.contains("**2 item(s) selected**"));
        assert!(markdown.contains("| ☑ |"));
    }

    #[test]
    fn test_empty_result_message() {
        let mut session = session(10);
        session.update_criteria(|c| c.search_query = "no such patient".to_string());

        let markdown = generate_markdown_report(&create_test_report(&session));
        assert!(markdown.contains("No analyses found"));
        assert!(markdown.contains("No results"));
        assert!(!markdown.contains("### Tumor Type Distribution"));
    }

    #[test]
    fn test_generate_row() {
        let mut record = history_records().remove(0);
        record.patient_id = None;

        let row = generate_row(&record, false);
        assert!(row.starts_with("| ☐ | Jan 15, 2024 10:30 |"));
        assert!(row.contains("Unknown Patient"));
        assert!(row.contains("94.2%"));
        assert!(row.contains("Glioma"));
    }

    #[test]
    fn test_generate_json_report() {
        let session = session(5);
        let json = generate_json_report(&create_test_report(&session)).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["currentPage"], 1);
        assert_eq!(value["totalPages"], 2);
        assert_eq!(value["hasNext"], true);
        assert_eq!(value["metadata"]["totalRecords"], 10);
        assert!(value["summary"]["averageConfidence"].is_number());
        assert!(value.get("current_page").is_none());
        assert_eq!(value["items"].as_array().map(|a| a.len()), Some(5));
        assert_eq!(value["items"][0]["patientId"], "PT-2024-001");
    }
}
