//! Export of selected or filtered records.
//!
//! Produces CSV for spreadsheet applications or JSON for API integration.

use crate::error::Result;
use crate::models::AnalysisRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::info;

/// Export file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Comma-separated values (default)
    #[default]
    Csv,
    /// JSON array of objects
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// Which columns an export carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    pub format: ExportFormat,
    /// Filename, notes and processing time.
    pub include_metadata: bool,
    pub include_confidence_scores: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Csv,
            include_metadata: true,
            include_confidence_scores: true,
        }
    }
}

impl From<&crate::config::ExportConfig> for ExportOptions {
    fn from(config: &crate::config::ExportConfig) -> Self {
        Self {
            format: config.format,
            include_metadata: config.include_metadata,
            include_confidence_scores: config.include_confidence_scores,
        }
    }
}

/// `neuroscan_export_<date>.<ext>`
pub fn default_export_filename(format: ExportFormat, date: NaiveDate) -> String {
    format!(
        "neuroscan_export_{}.{}",
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

fn columns(options: &ExportOptions) -> Vec<&'static str> {
    let mut columns = vec!["id", "date", "patientId", "tumorType"];
    if options.include_confidence_scores {
        columns.push("confidence");
    }
    columns.push("status");
    if options.include_metadata {
        columns.extend(["filename", "notes", "processingTime"]);
    }
    columns
}

fn cell(record: &AnalysisRecord, column: &str) -> Value {
    match column {
        "id" => Value::from(record.id),
        "date" => Value::from(record.date.to_rfc3339()),
        "patientId" => record
            .patient_id
            .as_ref()
            .map_or(Value::Null, |p| Value::from(p.as_str())),
        "tumorType" => Value::from(record.tumor_type.as_str()),
        "confidence" => Value::from(record.confidence),
        "status" => Value::from(record.status.as_str()),
        "filename" => Value::from(record.filename.as_str()),
        "notes" => record
            .notes
            .as_ref()
            .map_or(Value::Null, |n| Value::from(n.as_str())),
        "processingTime" => Value::from(record.processing_time),
        _ => Value::Null,
    }
}

fn csv_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Render `records` in the requested format.
pub fn export_records(records: &[&AnalysisRecord], options: &ExportOptions) -> Result<String> {
    let columns = columns(options);

    match options.format {
        ExportFormat::Csv => {
            let mut writer = csv::Writer::from_writer(Vec::new());
            writer.write_record(&columns)?;
            for record in records {
                writer.write_record(columns.iter().map(|c| csv_text(&cell(record, c))))?;
            }
            let bytes = writer.into_inner().map_err(|e| e.into_error())?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
        ExportFormat::Json => {
            let rows: Vec<Value> = records
                .iter()
                .map(|record| {
                    let row: Map<String, Value> = columns
                        .iter()
                        .map(|c| (c.to_string(), cell(record, c)))
                        .collect();
                    Value::Object(row)
                })
                .collect();
            Ok(serde_json::to_string_pretty(&rows)?)
        }
    }
}

/// Write an export into `dir` under the default filename for `date`.
pub fn write_export(
    records: &[&AnalysisRecord],
    options: &ExportOptions,
    dir: &Path,
    date: NaiveDate,
) -> Result<PathBuf> {
    let content = export_records(records, options)?;
    let path = dir.join(default_export_filename(options.format, date));
    std::fs::write(&path, content)?;

    info!("Exported {} records to {}", records.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::history_records;
    use tempfile::tempdir;

    #[test]
    fn test_default_export_filename() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(
            default_export_filename(ExportFormat::Csv, date),
            "neuroscan_export_2024-01-15.csv"
        );
        assert_eq!(
            default_export_filename(ExportFormat::Json, date),
            "neuroscan_export_2024-01-15.json"
        );
    }

    #[test]
    fn test_csv_export_quotes_commas() {
        let records = history_records();
        let refs: Vec<&AnalysisRecord> = vec![&records[6]];

        let csv = export_records(&refs, &ExportOptions::default()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("id,date,patientId,tumorType,confidence,status,filename,notes,processingTime")
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with("7,2024-01-12T08:15:00+00:00,PT-2024-007,no_tumor,93.7,completed"));
        assert!(row.contains("\"Emergency scan - no tumor, trauma-related changes\""));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_csv_export_without_optional_columns() {
        let records = history_records();
        let refs: Vec<&AnalysisRecord> = records.iter().collect();
        let options = ExportOptions {
            format: ExportFormat::Csv,
            include_metadata: false,
            include_confidence_scores: false,
        };

        let csv = export_records(&refs, &options).unwrap();
        assert!(csv.starts_with("id,date,patientId,tumorType,status\n"));
        assert_eq!(csv.lines().count(), 11);
        assert!(!csv.contains("94.2"));
    }

    #[test]
    fn test_json_export() {
        let mut records = history_records();
        records[0].patient_id = None;
        let refs: Vec<&AnalysisRecord> = records.iter().take(2).collect();
        let options = ExportOptions {
            format: ExportFormat::Json,
            ..Default::default()
        };

        let json = export_records(&refs, &options).unwrap();
        let parsed: Vec<Map<String, Value>> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0]["id"], Value::from(1));
        assert_eq!(parsed[0]["patientId"], Value::Null);
        assert_eq!(parsed[1]["tumorType"], Value::from("meningioma"));
        assert!(parsed[1].contains_key("notes"));
    }

    #[test]
    fn test_empty_export_has_header_only() {
        let csv = export_records(&[], &ExportOptions::default()).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn test_write_export() {
        let dir = tempdir().unwrap();
        let records = history_records();
        let refs: Vec<&AnalysisRecord> = records.iter().collect();
        let date = NaiveDate::from_ymd_opt(2024, 1, 16).unwrap();

        let path = write_export(&refs, &ExportOptions::default(), dir.path(), date).unwrap();
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("neuroscan_export_2024-01-16.csv")
        );
        let content = std::fs::read_to_string(path).unwrap();
        assert_eq!(content.lines().count(), 11);
    }
}
