//! Record filtering.

use super::criteria::{DateRange, FilterCriteria};
use crate::models::AnalysisRecord;
use chrono::{DateTime, Utc};

/// Return the records satisfying every predicate in `criteria`, in input order.
///
/// `now` anchors the trailing date windows.
pub fn filter<'a>(
    records: &'a [AnalysisRecord],
    criteria: &FilterCriteria,
    now: DateTime<Utc>,
) -> Vec<&'a AnalysisRecord> {
    let query = criteria.search_query.to_lowercase();

    records
        .iter()
        .filter(|record| {
            matches_search(record, &query)
                && criteria.tumor_type.matches(record.tumor_type)
                && criteria.confidence_level.matches(record.confidence)
                && criteria.status.matches(record.status)
                && matches_date(record, criteria, now)
        })
        .collect()
}

/// `query` must already be lowercased.
fn matches_search(record: &AnalysisRecord, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }

    let contains = |field: Option<&str>| {
        field.is_some_and(|value| value.to_lowercase().contains(query))
    };

    contains(record.patient_id.as_deref())
        || contains(Some(record.filename.as_str()))
        || contains(record.notes.as_deref())
}

fn matches_date(record: &AnalysisRecord, criteria: &FilterCriteria, now: DateTime<Utc>) -> bool {
    match criteria.date_range {
        DateRange::All => true,
        DateRange::Custom => criteria.custom_range.contains(record.date),
        trailing => match trailing.window() {
            Some(window) => record.date >= now - window && record.date <= now,
            None => true,
        },
    }
}
