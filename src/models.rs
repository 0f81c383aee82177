//! Data models for the review pipeline.
//!
//! This module contains the core data structures used throughout
//! the application for representing analysis records and their summaries.

use crate::error::ReviewError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Classification produced by an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TumorType {
    Glioma,
    Meningioma,
    Pituitary,
    NoTumor,
}

impl TumorType {
    pub const ALL: [TumorType; 4] = [
        TumorType::Glioma,
        TumorType::Meningioma,
        TumorType::Pituitary,
        TumorType::NoTumor,
    ];

    /// Wire name, also used as the lexicographic sort key.
    pub fn as_str(&self) -> &'static str {
        match self {
            TumorType::Glioma => "glioma",
            TumorType::Meningioma => "meningioma",
            TumorType::Pituitary => "pituitary",
            TumorType::NoTumor => "no_tumor",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            TumorType::Glioma => "Glioma",
            TumorType::Meningioma => "Meningioma",
            TumorType::Pituitary => "Pituitary Tumor",
            TumorType::NoTumor => "No Tumor",
        }
    }
}

impl fmt::Display for TumorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TumorType {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "glioma" => Ok(TumorType::Glioma),
            "meningioma" => Ok(TumorType::Meningioma),
            "pituitary" => Ok(TumorType::Pituitary),
            "no_tumor" | "notumor" | "no-tumor" => Ok(TumorType::NoTumor),
            _ => Err(ReviewError::UnknownTumorType(s.to_string())),
        }
    }
}

/// Processing state of an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    Completed,
    Processing,
    Failed,
    Pending,
}

impl AnalysisStatus {
    pub const ALL: [AnalysisStatus; 4] = [
        AnalysisStatus::Completed,
        AnalysisStatus::Processing,
        AnalysisStatus::Failed,
        AnalysisStatus::Pending,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisStatus::Completed => "completed",
            AnalysisStatus::Processing => "processing",
            AnalysisStatus::Failed => "failed",
            AnalysisStatus::Pending => "pending",
        }
    }

    /// Returns an emoji representation of the status.
    pub fn emoji(&self) -> &'static str {
        match self {
            AnalysisStatus::Completed => "✅",
            AnalysisStatus::Processing => "⏳",
            AnalysisStatus::Failed => "❌",
            AnalysisStatus::Pending => "🔎",
        }
    }
}

impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AnalysisStatus {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "completed" => Ok(AnalysisStatus::Completed),
            "processing" => Ok(AnalysisStatus::Processing),
            "failed" => Ok(AnalysisStatus::Failed),
            "pending" => Ok(AnalysisStatus::Pending),
            _ => Err(ReviewError::UnknownStatus(s.to_string())),
        }
    }
}

/// Named confidence interval.
///
/// Bands are half-open: `High` is `>= 90`, `Medium` is `[70, 90)` and
/// `Low` is `< 70`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

impl ConfidenceBand {
    pub const HIGH_THRESHOLD: f64 = 90.0;
    pub const MEDIUM_THRESHOLD: f64 = 70.0;

    /// Classify a confidence percentage. Non-finite values belong to no band.
    pub fn of(confidence: f64) -> Option<Self> {
        if !confidence.is_finite() {
            None
        } else if confidence >= Self::HIGH_THRESHOLD {
            Some(ConfidenceBand::High)
        } else if confidence >= Self::MEDIUM_THRESHOLD {
            Some(ConfidenceBand::Medium)
        } else {
            Some(ConfidenceBand::Low)
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConfidenceBand::High => "High (≥90%)",
            ConfidenceBand::Medium => "Medium (70-89%)",
            ConfidenceBand::Low => "Low (<70%)",
        }
    }
}

/// One entry in the analysis history archive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    /// Unique identifier, also the sort tie-break key.
    pub id: u64,
    /// When the analysis ran.
    pub date: DateTime<Utc>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub patient_id: Option<String>,
    /// Name of the uploaded scan.
    pub filename: String,
    pub tumor_type: TumorType,
    /// Model confidence as a percentage in [0, 100].
    pub confidence: f64,
    pub status: AnalysisStatus,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<String>,
    /// Seconds spent in inference; zero when the analysis failed.
    #[serde(default)]
    pub processing_time: f64,
}

/// Optional archive text. Anything but a string reads as absent.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(text) => Some(text),
        _ => None,
    })
}

impl AnalysisRecord {
    pub fn confidence_band(&self) -> Option<ConfidenceBand> {
        ConfidenceBand::of(self.confidence)
    }

    /// Confidence formatted the way the history table shows it.
    pub fn confidence_display(&self) -> String {
        format!("{:.1}%", self.confidence)
    }
}

/// Summary statistics over a set of records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSummary {
    /// Total number of records.
    pub total: usize,
    pub completed: usize,
    pub processing: usize,
    pub failed: usize,
    pub pending: usize,
    /// Records grouped by tumor type wire name.
    pub by_tumor_type: BTreeMap<String, usize>,
    /// Mean confidence across all records with a finite confidence.
    pub average_confidence: Option<f64>,
    /// Mean processing time across completed analyses.
    pub average_processing_time: Option<f64>,
}

impl RecordSummary {
    /// Creates a summary from a list of records.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a AnalysisRecord>,
    {
        let mut summary = Self::default();
        let mut confidence_sum = 0.0;
        let mut confidence_count = 0usize;
        let mut time_sum = 0.0;
        let mut time_count = 0usize;

        for record in records {
            summary.total += 1;

            match record.status {
                AnalysisStatus::Completed => {
                    summary.completed += 1;
                    time_sum += record.processing_time;
                    time_count += 1;
                }
                AnalysisStatus::Processing => summary.processing += 1,
                AnalysisStatus::Failed => summary.failed += 1,
                AnalysisStatus::Pending => summary.pending += 1,
            }

            *summary
                .by_tumor_type
                .entry(record.tumor_type.as_str().to_string())
                .or_insert(0) += 1;

            if record.confidence.is_finite() {
                confidence_sum += record.confidence;
                confidence_count += 1;
            }
        }

        if confidence_count > 0 {
            summary.average_confidence = Some(confidence_sum / confidence_count as f64);
        }
        if time_count > 0 {
            summary.average_processing_time = Some(time_sum / time_count as f64);
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(
        id: u64,
        tumor_type: TumorType,
        confidence: f64,
        status: AnalysisStatus,
    ) -> AnalysisRecord {
        AnalysisRecord {
            id,
            date: Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
            patient_id: Some(format!("PT-2024-{:03}", id)),
            filename: format!("scan_{}.png", id),
            tumor_type,
            confidence,
            status,
            notes: None,
            processing_time: 2.0,
        }
    }

    #[test]
    fn test_confidence_band_boundaries() {
        assert_eq!(ConfidenceBand::of(90.0), Some(ConfidenceBand::High));
        assert_eq!(ConfidenceBand::of(89.99), Some(ConfidenceBand::Medium));
        assert_eq!(ConfidenceBand::of(70.0), Some(ConfidenceBand::Medium));
        assert_eq!(ConfidenceBand::of(69.99), Some(ConfidenceBand::Low));
        assert_eq!(ConfidenceBand::of(f64::NAN), None);
    }

    #[test]
    fn test_tumor_type_from_str() {
        assert_eq!("glioma".parse::<TumorType>().unwrap(), TumorType::Glioma);
        assert_eq!("NoTumor".parse::<TumorType>().unwrap(), TumorType::NoTumor);
        assert_eq!("no_tumor".parse::<TumorType>().unwrap(), TumorType::NoTumor);
        assert!("astrocytoma".parse::<TumorType>().is_err());
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!(
            "Pending".parse::<AnalysisStatus>().unwrap(),
            AnalysisStatus::Pending
        );
        assert!("queued".parse::<AnalysisStatus>().is_err());
    }

    #[test]
    fn test_record_json_shape() {
        let json = r#"{
            "id": 8,
            "date": "2024-01-11T15:30:00Z",
            "patientId": "PT-2024-008",
            "filename": "follow_up_post_surgery.png",
            "tumorType": "glioma",
            "confidence": 76.3,
            "status": "failed",
            "notes": "Analysis failed - image quality issues"
        }"#;

        let record: AnalysisRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, 8);
        assert_eq!(record.tumor_type, TumorType::Glioma);
        assert_eq!(record.status, AnalysisStatus::Failed);
        assert_eq!(record.processing_time, 0.0);
        assert_eq!(record.confidence_band(), Some(ConfidenceBand::Medium));
    }

    #[test]
    fn test_record_without_optional_fields() {
        let json = r#"{
            "id": 1,
            "date": "2024-01-15T10:30:00Z",
            "filename": "anon.png",
            "tumorType": "no_tumor",
            "confidence": 50,
            "status": "pending"
        }"#;

        let record: AnalysisRecord = serde_json::from_str(json).unwrap();
        assert!(record.patient_id.is_none());
        assert!(record.notes.is_none());

        let out = serde_json::to_string(&record).unwrap();
        assert!(!out.contains("patientId"));
        assert!(out.contains("\"tumorType\":\"no_tumor\""));
    }

    #[test]
    fn test_non_string_optional_fields_read_as_absent() {
        let json = r#"{
            "id": 2,
            "date": "2024-01-15T10:30:00Z",
            "patientId": 42,
            "filename": "scan.png",
            "tumorType": "glioma",
            "confidence": 91.0,
            "status": "completed",
            "notes": null
        }"#;

        let record: AnalysisRecord = serde_json::from_str(json).unwrap();
        assert!(record.patient_id.is_none());
        assert!(record.notes.is_none());
        assert_eq!(record.id, 2);
    }

    #[test]
    fn test_record_summary() {
        let mut failed = record(3, TumorType::Glioma, 76.3, AnalysisStatus::Failed);
        failed.processing_time = 0.0;
        let records = vec![
            record(1, TumorType::Glioma, 94.0, AnalysisStatus::Completed),
            record(2, TumorType::NoTumor, 96.0, AnalysisStatus::Completed),
            failed,
            record(4, TumorType::Pituitary, f64::NAN, AnalysisStatus::Pending),
        ];

        let summary = RecordSummary::from_records(&records);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.completed, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.pending, 1);
        assert_eq!(summary.by_tumor_type.get("glioma"), Some(&2));
        assert_eq!(summary.by_tumor_type.get("no_tumor"), Some(&1));

        let avg = summary.average_confidence.unwrap();
        assert!((avg - (94.0 + 96.0 + 76.3) / 3.0).abs() < 1e-9);
        assert_eq!(summary.average_processing_time, Some(2.0));
    }

    #[test]
    fn test_empty_summary() {
        let records: Vec<AnalysisRecord> = Vec::new();
        let summary = RecordSummary::from_records(&records);
        assert_eq!(summary.total, 0);
        assert!(summary.average_confidence.is_none());
        assert!(summary.average_processing_time.is_none());
    }
}
