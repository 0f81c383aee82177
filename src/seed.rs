//! Built-in analysis history.
//!
//! Seeded into a session when no `--records` archive is given.

use crate::models::{AnalysisRecord, AnalysisStatus, TumorType};
use chrono::{TimeZone, Utc};

struct Entry {
    id: u64,
    date: (i32, u32, u32, u32, u32),
    patient_id: &'static str,
    filename: &'static str,
    tumor_type: TumorType,
    confidence: f64,
    status: AnalysisStatus,
    processing_time: f64,
    notes: &'static str,
}

const HISTORY: [Entry; 10] = [
    Entry {
        id: 1,
        date: (2024, 1, 15, 10, 30),
        patient_id: "PT-2024-001",
        filename: "brain_mri_axial_t1.jpg",
        tumor_type: TumorType::Glioma,
        confidence: 94.2,
        status: AnalysisStatus::Completed,
        processing_time: 2.3,
        notes: "High-grade glioma detected in left frontal lobe",
    },
    Entry {
        id: 2,
        date: (2024, 1, 14, 14, 15),
        patient_id: "PT-2024-002",
        filename: "mri_scan_sagittal_t2.png",
        tumor_type: TumorType::Meningioma,
        confidence: 87.6,
        status: AnalysisStatus::Completed,
        processing_time: 1.8,
        notes: "Meningioma identified in right parietal region",
    },
    Entry {
        id: 3,
        date: (2024, 1, 14, 9, 45),
        patient_id: "PT-2024-003",
        filename: "brain_scan_coronal_flair.jpg",
        tumor_type: TumorType::Pituitary,
        confidence: 91.3,
        status: AnalysisStatus::Completed,
        processing_time: 2.1,
        notes: "Pituitary adenoma detected",
    },
    Entry {
        id: 4,
        date: (2024, 1, 13, 16, 20),
        patient_id: "PT-2024-004",
        filename: "normal_brain_mri.png",
        tumor_type: TumorType::NoTumor,
        confidence: 96.8,
        status: AnalysisStatus::Completed,
        processing_time: 1.5,
        notes: "No tumor detected - normal brain anatomy",
    },
    Entry {
        id: 5,
        date: (2024, 1, 13, 11, 30),
        patient_id: "PT-2024-005",
        filename: "complex_case_multi_sequence.jpg",
        tumor_type: TumorType::Glioma,
        confidence: 89.4,
        status: AnalysisStatus::Pending,
        processing_time: 3.2,
        notes: "Complex case requiring radiologist review",
    },
    Entry {
        id: 6,
        date: (2024, 1, 12, 13, 45),
        patient_id: "PT-2024-006",
        filename: "pediatric_brain_scan.png",
        tumor_type: TumorType::Meningioma,
        confidence: 82.1,
        status: AnalysisStatus::Completed,
        processing_time: 2.7,
        notes: "Pediatric case - small meningioma",
    },
    Entry {
        id: 7,
        date: (2024, 1, 12, 8, 15),
        patient_id: "PT-2024-007",
        filename: "emergency_scan_trauma.jpg",
        tumor_type: TumorType::NoTumor,
        confidence: 93.7,
        status: AnalysisStatus::Completed,
        processing_time: 1.2,
        notes: "Emergency scan - no tumor, trauma-related changes",
    },
    Entry {
        id: 8,
        date: (2024, 1, 11, 15, 30),
        patient_id: "PT-2024-008",
        filename: "follow_up_post_surgery.png",
        tumor_type: TumorType::Glioma,
        confidence: 76.3,
        status: AnalysisStatus::Failed,
        processing_time: 0.0,
        notes: "Analysis failed - image quality issues",
    },
    Entry {
        id: 9,
        date: (2024, 1, 11, 10, 0),
        patient_id: "PT-2024-009",
        filename: "research_volunteer_scan.jpg",
        tumor_type: TumorType::Pituitary,
        confidence: 88.9,
        status: AnalysisStatus::Completed,
        processing_time: 2.0,
        notes: "Research study participant",
    },
    Entry {
        id: 10,
        date: (2024, 1, 10, 14, 45),
        patient_id: "PT-2024-010",
        filename: "routine_screening_mri.png",
        tumor_type: TumorType::NoTumor,
        confidence: 95.2,
        status: AnalysisStatus::Completed,
        processing_time: 1.6,
        notes: "Routine screening - normal findings",
    },
];

/// The ten-record history archive, newest first.
pub fn history_records() -> Vec<AnalysisRecord> {
    HISTORY
        .iter()
        .filter_map(|entry| {
            let (y, mo, d, h, mi) = entry.date;
            let date = Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).single()?;
            Some(AnalysisRecord {
                id: entry.id,
                date,
                patient_id: Some(entry.patient_id.to_string()),
                filename: entry.filename.to_string(),
                tumor_type: entry.tumor_type,
                confidence: entry.confidence,
                status: entry.status,
                notes: Some(entry.notes.to_string()),
                processing_time: entry.processing_time,
            })
        })
        .collect()
}
