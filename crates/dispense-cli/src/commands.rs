use anyhow::Result;

use dispense_cli::config::{ForecastOverrides, resolve_options};
use dispense_cli::pipeline::{check_rules, run_forecast};
use dispense_cli::types::{ForecastOutcome, ForecastRequest, RuleCheck};

use crate::cli::{CheckRulesArgs, ForecastArgs};

pub fn run_forecast_command(args: &ForecastArgs) -> Result<ForecastOutcome> {
    let overrides = ForecastOverrides {
        months_ahead: args.months_ahead,
        run_date: args.run_date,
        relaxed_status_fallback: args.relaxed_status_fallback,
    };
    let options = resolve_options(args.config.as_deref(), &overrides)?;
    let request = ForecastRequest {
        subjects: args.subjects.clone(),
        rules: args.rules.clone(),
        output_dir: args.output_dir.clone(),
        options,
        dry_run: args.dry_run,
    };
    run_forecast(&request)
}

pub fn run_check_rules(args: &CheckRulesArgs) -> Result<RuleCheck> {
    check_rules(&args.rules)
}
