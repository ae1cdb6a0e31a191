//! Forecast settings from an optional TOML file plus command-line overrides.
//!
//! ```toml
//! [forecast]
//! months_ahead = 6
//! run_date = "2024-01-01"
//! status_matching = "relax-on-miss"
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;

use dispense_model::{ForecastOptions, StatusMatching};

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub forecast: ForecastOptions,
}

/// Flag values that win over the config file when given.
#[derive(Debug, Clone, Default)]
pub struct ForecastOverrides {
    pub months_ahead: Option<u32>,
    pub run_date: Option<NaiveDate>,
    pub relaxed_status_fallback: bool,
}

impl ForecastOverrides {
    pub fn apply(&self, mut options: ForecastOptions) -> ForecastOptions {
        if let Some(months) = self.months_ahead {
            options.months_ahead = months;
        }
        if let Some(date) = self.run_date {
            options.run_date = Some(date);
        }
        if self.relaxed_status_fallback {
            options.status_matching = StatusMatching::RelaxOnMiss;
        }
        options
    }
}

pub fn parse_config(text: &str) -> Result<ForecastOptions, toml::de::Error> {
    toml::from_str::<ConfigFile>(text).map(|config| config.forecast)
}

pub fn load_config(path: &Path) -> Result<ForecastOptions> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    parse_config(&text).with_context(|| format!("parse config {}", path.display()))
}

/// Defaults, then the config file if any, then flag overrides.
pub fn resolve_options(
    config: Option<&Path>,
    overrides: &ForecastOverrides,
) -> Result<ForecastOptions> {
    let base = match config {
        Some(path) => load_config(path)?,
        None => ForecastOptions::default(),
    };
    Ok(overrides.apply(base))
}
