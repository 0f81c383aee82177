//! History metrics and analytics distributions.
//!
//! This module provides utilities for aggregating analysis records into
//! the counts shown alongside the history table.

use crate::models::{AnalysisRecord, ConfidenceBand, RecordSummary, TumorType};
use serde::Serialize;
use std::collections::BTreeMap;

/// Count records per tumor type, in `TumorType::ALL` order.
pub fn tumor_type_distribution(records: &[&AnalysisRecord]) -> Vec<(TumorType, usize)> {
    TumorType::ALL
        .iter()
        .map(|t| (*t, records.iter().filter(|r| r.tumor_type == *t).count()))
        .collect()
}

/// One bar of the confidence histogram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfidenceBucket {
    pub label: &'static str,
    pub count: usize,
    /// Share of all records with a finite confidence, 0-100.
    pub percentage: f64,
}

const BUCKETS: [(&str, f64, f64); 5] = [
    ("90-100%", 90.0, f64::INFINITY),
    ("80-89%", 80.0, 90.0),
    ("70-79%", 70.0, 80.0),
    ("60-69%", 60.0, 70.0),
    ("<60%", f64::NEG_INFINITY, 60.0),
];

/// Histogram of confidences in ten-point buckets, highest first.
pub fn confidence_distribution(records: &[&AnalysisRecord]) -> Vec<ConfidenceBucket> {
    let finite: Vec<f64> = records
        .iter()
        .map(|r| r.confidence)
        .filter(|c| c.is_finite())
        .collect();

    BUCKETS
        .iter()
        .map(|(label, low, high)| {
            let count = finite.iter().filter(|c| **c >= *low && **c < *high).count();
            let percentage = if finite.is_empty() {
                0.0
            } else {
                count as f64 / finite.len() as f64 * 100.0
            };
            ConfidenceBucket {
                label: *label,
                count,
                percentage,
            }
        })
        .collect()
}

/// Analysis volume for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyVolume {
    /// `YYYY-MM`
    pub month: String,
    pub analyses: usize,
    pub average_confidence: Option<f64>,
}

/// Per-month volume and mean confidence, oldest month first.
pub fn monthly_volume(records: &[&AnalysisRecord]) -> Vec<MonthlyVolume> {
    let mut months: BTreeMap<String, Vec<&AnalysisRecord>> = BTreeMap::new();

    for record in records.iter().copied() {
        months
            .entry(record.date.format("%Y-%m").to_string())
            .or_default()
            .push(record);
    }

    months
        .into_iter()
        .map(|(month, entries)| {
            let summary = RecordSummary::from_records(entries.iter().copied());
            MonthlyVolume {
                month,
                analyses: entries.len(),
                average_confidence: summary.average_confidence,
            }
        })
        .collect()
}

/// Records below the high-confidence band, lowest confidence first.
///
/// These are the cases the archive flags for radiologist review.
pub fn low_confidence_records<'a>(records: &[&'a AnalysisRecord]) -> Vec<&'a AnalysisRecord> {
    let mut flagged: Vec<&AnalysisRecord> = records
        .iter()
        .copied()
        .filter(|r| r.confidence_band() != Some(ConfidenceBand::High))
        .collect();

    flagged.sort_by(|a, b| a.confidence.total_cmp(&b.confidence).then(a.id.cmp(&b.id)));
    flagged
}

/// Generate a text summary of history metrics.
pub fn generate_summary_text(summary: &RecordSummary) -> String {
    let mut lines = Vec::new();

    lines.push(format!("Total Analyses: {}", summary.total));
    lines.push(format!("- Completed: {}", summary.completed));
    lines.push(format!("- Processing: {}", summary.processing));
    lines.push(format!("- Pending Review: {}", summary.pending));
    lines.push(format!("- Failed: {}", summary.failed));

    if let Some(avg) = summary.average_confidence {
        lines.push(format!("Avg Confidence: {:.1}%", avg));
    }
    if let Some(avg) = summary.average_processing_time {
        lines.push(format!("Avg Processing Time: {:.1}s", avg));
    }

    lines.join("\n")
}
