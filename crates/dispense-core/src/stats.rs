//! Run statistics and reconciliation counts.

use serde::{Serialize, Serializer};

use crate::catalog::RejectedRule;
use crate::label::LabelDefect;

/// A subject whose last-visit label could not be projected as written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MalformedLabel {
    pub subject_number: String,
    pub label: String,
    pub defect: LabelDefect,
}

/// What happened to every patient and rule during a run.
///
/// Serializes with the derived reconciliation counts alongside the stored
/// fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    pub total_patients: usize,
    pub inactive_patients: usize,
    pub matched_patients: usize,
    /// Subjects with no applicable dispensing rule.
    pub unmatched_subjects: Vec<String>,
    /// Subjects matched only after dropping the status predicate.
    pub relaxed_subjects: Vec<String>,
    pub malformed_labels: Vec<MalformedLabel>,
    pub rejected_rules: Vec<RejectedRule>,
    pub rows_before_dedup: usize,
    pub rows_after_dedup: usize,
    /// Subjects with at least one row after deduplication.
    pub patients_with_rows: usize,
}

impl RunStats {
    pub fn active_patients(&self) -> usize {
        self.total_patients.saturating_sub(self.inactive_patients)
    }

    pub fn unmatched_patients(&self) -> usize {
        self.unmatched_subjects.len()
    }

    pub fn duplicates_removed(&self) -> usize {
        self.rows_before_dedup.saturating_sub(self.rows_after_dedup)
    }

    /// Active patients that produced no rows: unmatched, or matched with no
    /// visit before the horizon.
    pub fn reconciliation_gap(&self) -> usize {
        self.active_patients().saturating_sub(self.patients_with_rows)
    }
}

#[derive(Serialize)]
#[serde(rename = "RunStats")]
struct StatsRecord<'a> {
    total_patients: usize,
    inactive_patients: usize,
    active_patients: usize,
    matched_patients: usize,
    unmatched_patients: usize,
    unmatched_subjects: &'a [String],
    relaxed_subjects: &'a [String],
    malformed_labels: &'a [MalformedLabel],
    rejected_rules: &'a [RejectedRule],
    rows_before_dedup: usize,
    rows_after_dedup: usize,
    duplicates_removed: usize,
    patients_with_rows: usize,
    reconciliation_gap: usize,
}

impl Serialize for RunStats {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        StatsRecord {
            total_patients: self.total_patients,
            inactive_patients: self.inactive_patients,
            active_patients: self.active_patients(),
            matched_patients: self.matched_patients,
            unmatched_patients: self.unmatched_patients(),
            unmatched_subjects: &self.unmatched_subjects,
            relaxed_subjects: &self.relaxed_subjects,
            malformed_labels: &self.malformed_labels,
            rejected_rules: &self.rejected_rules,
            rows_before_dedup: self.rows_before_dedup,
            rows_after_dedup: self.rows_after_dedup,
            duplicates_removed: self.duplicates_removed(),
            patients_with_rows: self.patients_with_rows,
            reconciliation_gap: self.reconciliation_gap(),
        }
        .serialize(serializer)
    }
}
