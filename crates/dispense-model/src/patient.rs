//! Subject-level input records.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Sentinel used in source tables for experimental-arm patients.
pub const TPC_NOT_APPLICABLE: &str = "n/a";

/// Treatment of Physician's Choice, normalized at construction.
///
/// Blank cells and any casing of `n/a` collapse into [`Tpc::NotApplicable`],
/// so two sentinel values always compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Tpc {
    NotApplicable,
    Drug(String),
}

impl Tpc {
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(TPC_NOT_APPLICABLE) {
            Self::NotApplicable
        } else {
            Self::Drug(trimmed.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::NotApplicable => TPC_NOT_APPLICABLE,
            Self::Drug(name) => name,
        }
    }
}

impl fmt::Display for Tpc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Tpc {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl From<&str> for Tpc {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<Tpc> for String {
    fn from(value: Tpc) -> Self {
        value.as_str().to_string()
    }
}

/// One trial subject with current status and last recorded visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub protocol: String,
    pub site_id: String,
    pub country: String,
    pub depot: Option<String>,
    /// Unique across a subject table.
    pub subject_number: String,
    pub randomized_on: Option<NaiveDate>,
    pub status: String,
    pub randomized_treatment: String,
    /// TPC at randomization; kept after crossover so the crossover rule can
    /// be located.
    pub tpc: Tpc,
    pub last_visit_label: String,
    pub last_visit_date: NaiveDate,
}

/// Case-insensitive substring test used for status vocabulary checks.
pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
