//! Record ordering.

use crate::error::ReviewError;
use crate::models::AnalysisRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Column the table is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Date,
    TumorType,
    Confidence,
    Status,
}

impl SortKey {
    /// Compare two records on this key alone.
    pub fn compare(&self, a: &AnalysisRecord, b: &AnalysisRecord) -> Ordering {
        match self {
            SortKey::Date => a.date.cmp(&b.date),
            SortKey::TumorType => a.tumor_type.as_str().cmp(b.tumor_type.as_str()),
            SortKey::Confidence => a.confidence.total_cmp(&b.confidence),
            SortKey::Status => a.status.as_str().cmp(b.status.as_str()),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Date => "Date",
            SortKey::TumorType => "Classification",
            SortKey::Confidence => "Confidence",
            SortKey::Status => "Status",
        }
    }
}

impl FromStr for SortKey {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(SortKey::Date),
            "tumor_type" | "tumortype" | "tumor-type" | "classification" => Ok(SortKey::TumorType),
            "confidence" => Ok(SortKey::Confidence),
            "status" => Ok(SortKey::Status),
            _ => Err(ReviewError::UnknownSortKey(s.to_string())),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SortKey::Date => "date",
            SortKey::TumorType => "tumor_type",
            SortKey::Confidence => "confidence",
            SortKey::Status => "status",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Asc => "↑",
            SortDirection::Desc => "↓",
        }
    }
}

impl FromStr for SortDirection {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            _ => Err(ReviewError::UnknownSortDirection(s.to_string())),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

/// Current sort column and direction. Defaults to newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// State after clicking the header for `key`.
    ///
    /// Clicking the column already sorted ascending flips it to descending;
    /// any other click sorts `key` ascending.
    pub fn toggle(self, key: SortKey) -> Self {
        let direction = if self.key == key && self.direction == SortDirection::Asc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        Self { key, direction }
    }

    /// Full ordering: the key in the chosen direction, then ascending id.
    pub fn compare(&self, a: &AnalysisRecord, b: &AnalysisRecord) -> Ordering {
        let by_key = match self.direction {
            SortDirection::Asc => self.key.compare(a, b),
            SortDirection::Desc => self.key.compare(b, a),
        };
        by_key.then_with(|| a.id.cmp(&b.id))
    }
}

/// Return `records` ordered by `state`. The input is left untouched.
pub fn sort<'a>(records: &[&'a AnalysisRecord], state: &SortState) -> Vec<&'a AnalysisRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| state.compare(a, b));
    sorted
}
