//! Command-line arguments for `dispense-forecast`.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "dispense-forecast",
    version,
    about = "Forecast study drug dispensing demand for a trial cohort",
    long_about = "Project every active subject's future dispensing visits from their last \
                  recorded visit and the protocol's dispensing rules.\n\n\
                  Writes the per-visit demand table plus summaries by drug, month and \
                  country, and a JSON run report."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate the dispensing forecast and write output files.
    Forecast(ForecastArgs),

    /// Validate a dispensing-rule table and list accepted and rejected rules.
    CheckRules(CheckRulesArgs),
}

#[derive(Parser)]
pub struct ForecastArgs {
    /// Subject summary table (CSV).
    #[arg(long = "subjects", value_name = "PATH")]
    pub subjects: PathBuf,

    /// Dispensing rule table (CSV).
    #[arg(long = "rules", value_name = "PATH")]
    pub rules: PathBuf,

    /// Directory for output files.
    #[arg(long = "output-dir", value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// TOML file with a [forecast] table.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Projection window in calendar months.
    #[arg(long = "months-ahead", value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub months_ahead: Option<u32>,

    /// Date to forecast from (default: today).
    #[arg(long = "run-date", value_name = "YYYY-MM-DD")]
    pub run_date: Option<NaiveDate>,

    /// Retry without the subject status when a subject matches no rule.
    ///
    /// Crossover subjects are never relaxed.
    #[arg(long = "relaxed-status-fallback")]
    pub relaxed_status_fallback: bool,

    /// Generate and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct CheckRulesArgs {
    /// Dispensing rule table (CSV).
    #[arg(long = "rules", value_name = "PATH")]
    pub rules: PathBuf,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
