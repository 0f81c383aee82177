//! Record archive loading.
//!
//! An archive is either a single JSON file or a directory walked
//! recursively for `*.json` files. Each file holds one record or an array
//! of records.

use crate::error::{Result, ReviewError};
use crate::models::AnalysisRecord;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Load every record under `path`.
///
/// Files are read in path order so the resulting sequence is stable.
/// Record ids must be unique across the whole archive.
pub fn load_records(path: &Path) -> Result<Vec<AnalysisRecord>> {
    if !path.exists() {
        return Err(ReviewError::RecordsNotFound(path.to_path_buf()));
    }

    let files = if path.is_dir() {
        discover_files(path)
    } else {
        vec![path.to_path_buf()]
    };
    debug!("Loading records from {} file(s)", files.len());

    let mut records = Vec::new();
    let mut seen: HashMap<u64, PathBuf> = HashMap::new();

    for file in &files {
        for record in read_file(file)? {
            if seen.insert(record.id, file.clone()).is_some() {
                return Err(ReviewError::DuplicateRecordId {
                    id: record.id,
                    path: file.clone(),
                });
            }
            check_record(&record, file);
            records.push(record);
        }
    }

    info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

fn discover_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry.file_name()))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("json"))
        .collect();

    files.sort();
    files
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().is_some_and(|s| s.starts_with('.'))
}

/// A file holds either an array of records or one record object.
fn read_file(path: &Path) -> Result<Vec<AnalysisRecord>> {
    let content = fs::read_to_string(path)?;
    let parse_error = |source| ReviewError::RecordParse {
        path: path.to_path_buf(),
        source,
    };

    // Parse the branch directly so errors keep serde's line and column.
    if content.trim_start().starts_with('[') {
        serde_json::from_str::<Vec<AnalysisRecord>>(&content).map_err(parse_error)
    } else {
        serde_json::from_str::<AnalysisRecord>(&content)
            .map(|record| vec![record])
            .map_err(parse_error)
    }
}

fn check_record(record: &AnalysisRecord, file: &Path) {
    if !(0.0..=100.0).contains(&record.confidence) {
        warn!(
            "Record {} in {} has confidence {} outside 0-100",
            record.id,
            file.display(),
            record.confidence
        );
    }
    if record.processing_time < 0.0 {
        warn!(
            "Record {} in {} has negative processing time",
            record.id,
            file.display()
        );
    }
}
