//! Configuration options for a forecast run.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::patient::contains_ignore_case;

/// Status keywords that mark a subject as no longer receiving drug.
pub const DEFAULT_INACTIVE_KEYWORDS: &[&str] = &[
    "discontinued",
    "completed",
    "withdrawn",
    "terminated",
    "death",
    "died",
    "screen failure",
];

pub const DEFAULT_CROSSOVER_KEYWORD: &str = "crossover";

pub const DEFAULT_MONTHS_AHEAD: u32 = 12;

/// How the subject status takes part in treatment-plan matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusMatching {
    /// Status must equal the rule's status.
    #[default]
    Strict,
    /// Retry without the status when the strict match finds nothing.
    /// Crossover subjects are never relaxed.
    RelaxOnMiss,
}

/// Options controlling a forecast run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastOptions {
    /// Projection window in calendar months, counted from the run date.
    pub months_ahead: u32,

    /// Date the forecast is made on. Defaults to today when unset.
    pub run_date: Option<NaiveDate>,

    /// Case-insensitive status fragments that exclude a subject.
    pub inactive_keywords: Vec<String>,

    /// Case-insensitive status fragment that selects crossover matching.
    pub crossover_keyword: String,

    pub status_matching: StatusMatching,
}

impl Default for ForecastOptions {
    fn default() -> Self {
        Self {
            months_ahead: DEFAULT_MONTHS_AHEAD,
            run_date: None,
            inactive_keywords: DEFAULT_INACTIVE_KEYWORDS
                .iter()
                .map(|keyword| (*keyword).to_string())
                .collect(),
            crossover_keyword: DEFAULT_CROSSOVER_KEYWORD.to_string(),
            status_matching: StatusMatching::default(),
        }
    }
}

impl ForecastOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_months_ahead(mut self, months: u32) -> Self {
        self.months_ahead = months;
        self
    }

    #[must_use]
    pub fn with_run_date(mut self, date: NaiveDate) -> Self {
        self.run_date = Some(date);
        self
    }

    #[must_use]
    pub fn with_status_matching(mut self, mode: StatusMatching) -> Self {
        self.status_matching = mode;
        self
    }

    /// The configured run date, or `today` when none was set.
    pub fn effective_run_date(&self, today: NaiveDate) -> NaiveDate {
        self.run_date.unwrap_or(today)
    }

    /// Last date (inclusive) a visit may be projected on.
    ///
    /// Month arithmetic clamps to the end of shorter months, so a run on
    /// 31 January with one month ahead ends on the last day of February.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidHorizon`] when `months_ahead` is zero.
    pub fn horizon(&self, today: NaiveDate) -> Result<NaiveDate> {
        if self.months_ahead == 0 {
            return Err(ModelError::InvalidHorizon(self.months_ahead));
        }
        self.effective_run_date(today)
            .checked_add_months(Months::new(self.months_ahead))
            .ok_or(ModelError::HorizonOverflow)
    }

    pub fn is_inactive_status(&self, status: &str) -> bool {
        self.inactive_keywords
            .iter()
            .any(|keyword| contains_ignore_case(status, keyword))
    }

    pub fn is_crossover_status(&self, status: &str) -> bool {
        contains_ignore_case(status, &self.crossover_keyword)
    }
}
