use std::path::PathBuf;

use polars::prelude::DataFrame;

use dispense_core::{Forecast, RejectedRule};
use dispense_ingest::IngestIssue;
use dispense_model::{DispensingRule, ForecastOptions};
use dispense_report::OutputFiles;

/// Inputs of one forecast run, already resolved from flags and config.
#[derive(Debug, Clone)]
pub struct ForecastRequest {
    pub subjects: PathBuf,
    pub rules: PathBuf,
    pub output_dir: PathBuf,
    pub options: ForecastOptions,
    pub dry_run: bool,
}

#[derive(Debug)]
pub struct ForecastOutcome {
    pub forecast: Forecast,
    /// Subject and rule rows dropped during ingestion.
    pub issues: Vec<IngestIssue>,
    pub by_drug: DataFrame,
    /// `None` for a dry run.
    pub outputs: Option<OutputFiles>,
}

#[derive(Debug)]
pub struct RuleCheck {
    pub accepted: Vec<DispensingRule>,
    pub rejected: Vec<RejectedRule>,
    pub issues: Vec<IngestIssue>,
}

impl RuleCheck {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty() && self.issues.is_empty()
    }
}
