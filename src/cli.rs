//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::error::ReviewError;
use crate::report::ExportFormat;
use crate::review::{
    parse_date, ConfidenceLevel, CustomRange, DateRange, FilterCriteria, SortDirection, SortKey,
    StatusFilter, TumorTypeFilter,
};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// NeuroScan Review - filter, sort and page brain-MRI analysis history
///
/// Loads analysis records from a JSON archive (or the built-in history),
/// applies the review filters and renders one page of the history table.
///
/// Examples:
///   neuroscan-review --status completed --confidence high
///   neuroscan-review --records ./archive --sort confidence --direction asc
///   neuroscan-review --date-range custom --from 2024-01-11 --to 2024-01-13
///   neuroscan-review --tumor-type glioma --select-all --export csv
///   neuroscan-review --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Record archive: a JSON file or a directory of JSON files
    ///
    /// When absent, the built-in analysis history is reviewed.
    #[arg(long, value_name = "PATH", env = "NEUROSCAN_RECORDS")]
    pub records: Option<PathBuf>,

    /// Case-insensitive search over patient id, filename and notes
    #[arg(short, long, value_name = "TEXT")]
    pub search: Option<String>,

    /// Tumor type filter (all, glioma, meningioma, pituitary, no_tumor)
    #[arg(long, default_value = "all", value_name = "TYPE")]
    pub tumor_type: TumorTypeFilter,

    /// Confidence band filter (all, high, medium, low)
    #[arg(long, default_value = "all", value_name = "LEVEL")]
    pub confidence: ConfidenceLevel,

    /// Status filter (all, completed, processing, failed, pending)
    #[arg(long, default_value = "all", value_name = "STATUS")]
    pub status: StatusFilter,

    /// Date range filter (all, today, week, month, quarter, year, custom)
    ///
    /// Giving --from or --to implies custom.
    #[arg(long, default_value = "all", value_name = "RANGE")]
    pub date_range: DateRange,

    /// First day of a custom range, inclusive (YYYY-MM-DD)
    #[arg(long, value_name = "DATE", value_parser = parse_date)]
    pub from: Option<NaiveDate>,

    /// Last day of a custom range, inclusive (YYYY-MM-DD)
    #[arg(long, value_name = "DATE", value_parser = parse_date)]
    pub to: Option<NaiveDate>,

    /// Sort column (date, tumor_type, confidence, status)
    #[arg(long, value_name = "KEY")]
    pub sort: Option<SortKey>,

    /// Sort direction (asc, desc)
    #[arg(long, value_name = "DIR")]
    pub direction: Option<SortDirection>,

    /// Page to show, 1-based. Clamped to the available pages.
    #[arg(long, default_value = "1", value_name = "N")]
    pub page: usize,

    /// Rows per page
    #[arg(long, value_name = "N")]
    pub per_page: Option<usize>,

    /// Record ids to select (comma-separated)
    ///
    /// Ids hidden by the active filters are ignored.
    #[arg(long, value_name = "IDS", value_delimiter = ',', conflicts_with = "select_all")]
    pub select: Vec<u64>,

    /// Select every record passing the filters
    #[arg(long)]
    pub select_all: bool,

    /// Output format (markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Output file path for the report (stdout when absent)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Export the selection (or the filtered set when nothing is selected)
    #[arg(long, value_name = "FORMAT")]
    pub export: Option<ExportFormat>,

    /// Directory for export files
    #[arg(long, value_name = "DIR")]
    pub export_dir: Option<PathBuf>,

    /// Fix the clock for relative date ranges (RFC 3339)
    #[arg(long, value_name = "TIMESTAMP")]
    pub now: Option<DateTime<Utc>>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .neuroscan.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .neuroscan.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.page == 0 {
            return Err("Page must be at least 1".to_string());
        }

        if self.per_page == Some(0) {
            return Err("Rows per page must be at least 1".to_string());
        }

        let has_bounds = self.from.is_some() || self.to.is_some();
        if has_bounds && !matches!(self.date_range, DateRange::All | DateRange::Custom) {
            return Err(format!(
                "--from/--to cannot be combined with --date-range {}",
                self.date_range
            ));
        }

        if let Some(ref records) = self.records {
            if !records.exists() {
                return Err(format!("Record archive does not exist: {}", records.display()));
            }
        }

        CustomRange::new(self.from, self.to).map_err(|e| e.to_string())?;

        Ok(())
    }

    /// Build the filter criteria the flags describe.
    pub fn criteria(&self) -> Result<FilterCriteria, ReviewError> {
        let custom_range = CustomRange::new(self.from, self.to)?;
        let date_range = if custom_range.is_open() {
            self.date_range
        } else {
            DateRange::Custom
        };

        Ok(FilterCriteria {
            search_query: self.search.clone().unwrap_or_default(),
            tumor_type: self.tumor_type,
            confidence_level: self.confidence,
            status: self.status,
            date_range,
            custom_range,
        })
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnalysisStatus, TumorType};

    fn make_args() -> Args {
        Args {
            records: None,
            search: None,
            tumor_type: TumorTypeFilter::All,
            confidence: ConfidenceLevel::All,
            status: StatusFilter::All,
            date_range: DateRange::All,
            from: None,
            to: None,
            sort: None,
            direction: None,
            page: 1,
            per_page: None,
            select: Vec::new(),
            select_all: false,
            format: None,
            output: None,
            export: None,
            export_dir: None,
            now: None,
            config: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_parse_flags() {
        let args = Args::try_parse_from([
            "neuroscan-review",
            "--tumor-type",
            "no_tumor",
            "--status",
            "completed",
            "--confidence",
            "high",
            "--sort",
            "confidence",
            "--direction",
            "asc",
            "--select",
            "4,7,10",
            "--now",
            "2024-01-16T00:00:00Z",
        ])
        .unwrap();

        assert_eq!(args.tumor_type, TumorTypeFilter::Only(TumorType::NoTumor));
        assert_eq!(args.status, StatusFilter::Only(AnalysisStatus::Completed));
        assert_eq!(args.confidence, ConfidenceLevel::High);
        assert_eq!(args.sort, Some(SortKey::Confidence));
        assert_eq!(args.direction, Some(SortDirection::Asc));
        assert_eq!(args.select, vec![4, 7, 10]);
        assert!(args.now.is_some());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_parse_rejects_unknown_values() {
        assert!(Args::try_parse_from(["neuroscan-review", "--status", "archived"]).is_err());
        assert!(Args::try_parse_from(["neuroscan-review", "--from", "15/01/2024"]).is_err());
        assert!(
            Args::try_parse_from(["neuroscan-review", "--select", "1", "--select-all"]).is_err()
        );
    }

    #[test]
    fn test_criteria_from_flags() {
        let mut args = make_args();
        args.search = Some("PT-2024".to_string());
        args.from = Some(date("2024-01-11"));

        let criteria = args.criteria().unwrap();
        assert_eq!(criteria.search_query, "PT-2024");
        assert_eq!(criteria.date_range, DateRange::Custom);
        assert_eq!(criteria.custom_range.start, Some(date("2024-01-11")));
        assert_eq!(criteria.custom_range.end, None);
    }

    #[test]
    fn test_criteria_without_bounds_keeps_range() {
        let mut args = make_args();
        args.date_range = DateRange::Week;
        assert_eq!(args.criteria().unwrap().date_range, DateRange::Week);
    }

    #[test]
    fn test_validation_inverted_range() {
        let mut args = make_args();
        args.from = Some(date("2024-01-15"));
        args.to = Some(date("2024-01-10"));
        assert!(args.validate().is_err());
        assert!(matches!(
            args.criteria(),
            Err(ReviewError::InvertedRange { .. })
        ));
    }

    #[test]
    fn test_validation_bounds_with_relative_range() {
        let mut args = make_args();
        args.date_range = DateRange::Month;
        args.to = Some(date("2024-01-10"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_zero_page() {
        let mut args = make_args();
        args.page = 0;
        assert!(args.validate().is_err());

        args.page = 1;
        args.per_page = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_missing_archive() {
        let mut args = make_args();
        args.records = Some(PathBuf::from("/nonexistent/records/12345"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
