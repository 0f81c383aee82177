//! Typed errors raised at the edges of the review pipeline.
//!
//! The pipeline itself never fails; these cover parsing user input,
//! loading record archives and writing exports.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("unknown tumor type: {0} (expected all, glioma, meningioma, pituitary, no_tumor)")]
    UnknownTumorType(String),

    #[error("unknown analysis status: {0} (expected all, completed, processing, failed, pending)")]
    UnknownStatus(String),

    #[error("unknown confidence level: {0} (expected all, high, medium, low)")]
    UnknownConfidenceLevel(String),

    #[error("unknown date range: {0} (expected all, today, week, month, quarter, year, custom)")]
    UnknownDateRange(String),

    #[error("unknown sort key: {0} (expected date, tumor_type, confidence, status)")]
    UnknownSortKey(String),

    #[error("unknown sort direction: {0} (expected asc, desc)")]
    UnknownSortDirection(String),

    #[error("invalid date: {0} (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("custom range start {start} is after end {end}")]
    InvertedRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    #[error("duplicate record id {id} in {}", path.display())]
    DuplicateRecordId { id: u64, path: PathBuf },

    #[error("failed to parse records in {}: {source}", path.display())]
    RecordParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("records path does not exist: {}", .0.display())]
    RecordsNotFound(PathBuf),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ReviewError>;
