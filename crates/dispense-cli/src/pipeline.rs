//! Ingest, generate, summarize, write.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, info_span, warn};

use dispense_core::{RuleCatalog, generate};
use dispense_ingest::{load_rules, load_subjects};
use dispense_report::{demand_frame, summarize_by_drug, write_outputs};

use crate::types::{ForecastOutcome, ForecastRequest, RuleCheck};

/// Run a forecast end to end.
///
/// A missing required column aborts before anything is written. Dropped
/// rows are logged and returned in the outcome.
pub fn run_forecast(request: &ForecastRequest) -> Result<ForecastOutcome> {
    let span = info_span!("run", dry_run = request.dry_run);
    let _guard = span.enter();

    let subjects = load_subjects(&request.subjects)
        .with_context(|| format!("load subjects from {}", request.subjects.display()))?;
    let rules = load_rules(&request.rules)
        .with_context(|| format!("load dispensing rules from {}", request.rules.display()))?;

    let mut issues = subjects.issues;
    issues.extend(rules.issues);
    for issue in &issues {
        warn!(%issue, "dropped input row");
    }

    let forecast = generate(&subjects.patients, &rules.rules, &request.options)
        .context("generate forecast")?;
    let demand = demand_frame(&forecast.visits).context("build demand frame")?;
    let by_drug = summarize_by_drug(&demand).context("summarize demand by drug")?;

    let outputs = if request.dry_run {
        info!("dry run, no files written");
        None
    } else {
        let files = write_outputs(&request.output_dir, &forecast)
            .with_context(|| format!("write outputs to {}", request.output_dir.display()))?;
        Some(files)
    };

    Ok(ForecastOutcome {
        forecast,
        issues,
        by_drug,
        outputs,
    })
}

/// Load and validate a dispensing-rule table without projecting anything.
pub fn check_rules(path: &Path) -> Result<RuleCheck> {
    let table = load_rules(path)
        .with_context(|| format!("load dispensing rules from {}", path.display()))?;
    let catalog = RuleCatalog::new(&table.rules);
    let accepted = catalog
        .entries()
        .iter()
        .map(|entry| entry.rule.clone())
        .collect();
    let rejected = catalog.rejected().to_vec();
    Ok(RuleCheck {
        accepted,
        rejected,
        issues: table.issues,
    })
}
