//! Filter criteria narrowing the visible record set.

use crate::error::ReviewError;
use crate::models::{AnalysisStatus, ConfidenceBand, TumorType};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tumor type constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TumorTypeFilter {
    #[default]
    All,
    Only(TumorType),
}

impl TumorTypeFilter {
    pub fn matches(&self, tumor_type: TumorType) -> bool {
        match self {
            TumorTypeFilter::All => true,
            TumorTypeFilter::Only(wanted) => *wanted == tumor_type,
        }
    }
}

impl FromStr for TumorTypeFilter {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(TumorTypeFilter::All);
        }
        s.parse().map(TumorTypeFilter::Only)
    }
}

impl TryFrom<String> for TumorTypeFilter {
    type Error = ReviewError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TumorTypeFilter> for String {
    fn from(filter: TumorTypeFilter) -> Self {
        filter.to_string()
    }
}

impl fmt::Display for TumorTypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TumorTypeFilter::All => write!(f, "all"),
            TumorTypeFilter::Only(t) => write!(f, "{}", t),
        }
    }
}

/// Confidence band constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    #[default]
    All,
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    /// The band selected, `None` for `All`.
    pub fn band(&self) -> Option<ConfidenceBand> {
        match self {
            ConfidenceLevel::All => None,
            ConfidenceLevel::High => Some(ConfidenceBand::High),
            ConfidenceLevel::Medium => Some(ConfidenceBand::Medium),
            ConfidenceLevel::Low => Some(ConfidenceBand::Low),
        }
    }

    pub fn matches(&self, confidence: f64) -> bool {
        match self.band() {
            None => true,
            Some(band) => ConfidenceBand::of(confidence) == Some(band),
        }
    }
}

impl FromStr for ConfidenceLevel {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(ConfidenceLevel::All),
            "high" => Ok(ConfidenceLevel::High),
            "medium" => Ok(ConfidenceLevel::Medium),
            "low" => Ok(ConfidenceLevel::Low),
            _ => Err(ReviewError::UnknownConfidenceLevel(s.to_string())),
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConfidenceLevel::All => "all",
            ConfidenceLevel::High => "high",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::Low => "low",
        };
        write!(f, "{}", s)
    }
}

/// Status constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StatusFilter {
    #[default]
    All,
    Only(AnalysisStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: AnalysisStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        s.parse().map(StatusFilter::Only)
    }
}

impl TryFrom<String> for StatusFilter {
    type Error = ReviewError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<StatusFilter> for String {
    fn from(filter: StatusFilter) -> Self {
        filter.to_string()
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => write!(f, "all"),
            StatusFilter::Only(s) => write!(f, "{}", s),
        }
    }
}

/// Date window, relative to "now" except for `Custom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateRange {
    #[default]
    All,
    Today,
    Week,
    Month,
    Quarter,
    Year,
    Custom,
}

impl DateRange {
    /// Length of the trailing window, `None` for `All` and `Custom`.
    pub fn window(&self) -> Option<Duration> {
        match self {
            DateRange::Today => Some(Duration::days(1)),
            DateRange::Week => Some(Duration::days(7)),
            DateRange::Month => Some(Duration::days(30)),
            DateRange::Quarter => Some(Duration::days(90)),
            DateRange::Year => Some(Duration::days(365)),
            DateRange::All | DateRange::Custom => None,
        }
    }
}

impl FromStr for DateRange {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(DateRange::All),
            "today" => Ok(DateRange::Today),
            "week" => Ok(DateRange::Week),
            "month" => Ok(DateRange::Month),
            "quarter" => Ok(DateRange::Quarter),
            "year" => Ok(DateRange::Year),
            "custom" => Ok(DateRange::Custom),
            _ => Err(ReviewError::UnknownDateRange(s.to_string())),
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DateRange::All => "all",
            DateRange::Today => "today",
            DateRange::Week => "week",
            DateRange::Month => "month",
            DateRange::Quarter => "quarter",
            DateRange::Year => "year",
            DateRange::Custom => "custom",
        };
        write!(f, "{}", s)
    }
}

/// Inclusive calendar-day bounds for `DateRange::Custom`.
///
/// A missing bound is open on that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CustomRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
}

impl CustomRange {
    /// Build a range, rejecting a start that falls after the end.
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self, ReviewError> {
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(ReviewError::InvertedRange { start, end });
            }
        }
        Ok(Self { start, end })
    }

    pub fn is_open(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, date: DateTime<Utc>) -> bool {
        let day = date.date_naive();
        let after_start = self.start.map_or(true, |start| day >= start);
        let before_end = self.end.map_or(true, |end| day <= end);
        after_start && before_end
    }
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate, ReviewError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| ReviewError::InvalidDate(s.to_string()))
}

/// The full set of filters applied to the record set.
///
/// `Default` places no constraint on any field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterCriteria {
    /// Case-insensitive substring searched in patient id, filename and notes.
    pub search_query: String,
    pub tumor_type: TumorTypeFilter,
    pub confidence_level: ConfidenceLevel,
    pub status: StatusFilter,
    pub date_range: DateRange,
    pub custom_range: CustomRange,
}

impl FilterCriteria {
    /// True when any field narrows the record set.
    pub fn has_active_filters(&self) -> bool {
        !self.search_query.is_empty()
            || self.tumor_type != TumorTypeFilter::All
            || self.confidence_level != ConfidenceLevel::All
            || self.status != StatusFilter::All
            || self.date_range != DateRange::All
    }

    /// Human-readable descriptions of the active filters.
    pub fn describe(&self) -> Vec<String> {
        let mut parts = Vec::new();

        if !self.search_query.is_empty() {
            parts.push(format!("Search: \"{}\"", self.search_query));
        }
        if let TumorTypeFilter::Only(t) = self.tumor_type {
            parts.push(format!("Tumor type: {}", t.label()));
        }
        if let Some(band) = self.confidence_level.band() {
            parts.push(format!("Confidence: {}", band.label()));
        }
        if let StatusFilter::Only(s) = self.status {
            parts.push(format!("Status: {}", s));
        }
        match self.date_range {
            DateRange::All => {}
            DateRange::Custom => {
                let start = self
                    .custom_range
                    .start
                    .map_or_else(|| "…".to_string(), |d| d.to_string());
                let end = self
                    .custom_range
                    .end
                    .map_or_else(|| "…".to_string(), |d| d.to_string());
                parts.push(format!("Date: {} to {}", start, end));
            }
            other => parts.push(format!("Date: {}", other)),
        }

        parts
    }
}
