//! Output files for a forecast run.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use polars::prelude::DataFrame;
use serde::Serialize;
use tracing::info;

use dispense_core::{Forecast, RunStats};
use dispense_model::ProjectedVisit;
use dispense_model::columns::forecast;

use crate::aggregate::{DateRange, DemandSummaries, summarize, unique_patients};
use crate::cells::frame_rows;
use crate::error::{ReportError, Result};
use crate::frame::demand_frame;

pub const DEMAND_FILE: &str = "inventory_demand.csv";
pub const BY_DRUG_FILE: &str = "summary_by_drug.csv";
pub const BY_MONTH_FILE: &str = "summary_by_month.csv";
pub const BY_COUNTRY_FILE: &str = "summary_by_country.csv";
pub const RUN_REPORT_FILE: &str = "run_report.json";

/// Machine-readable account of a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport<'a> {
    pub run_date: NaiveDate,
    pub horizon: NaiveDate,
    pub total_visits: usize,
    pub unique_patients: usize,
    pub date_range: Option<DateRange>,
    pub stats: &'a RunStats,
}

impl<'a> RunReport<'a> {
    pub fn new(forecast: &'a Forecast) -> Self {
        Self {
            run_date: forecast.run_date,
            horizon: forecast.horizon,
            total_visits: forecast.visits.len(),
            unique_patients: unique_patients(&forecast.visits),
            date_range: DateRange::of(&forecast.visits),
            stats: &forecast.stats,
        }
    }
}

/// Paths of the files written by [`write_outputs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFiles {
    pub demand: PathBuf,
    pub by_drug: PathBuf,
    pub by_month: PathBuf,
    pub by_country: PathBuf,
    pub run_report: PathBuf,
}

impl OutputFiles {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            demand: dir.join(DEMAND_FILE),
            by_drug: dir.join(BY_DRUG_FILE),
            by_month: dir.join(BY_MONTH_FILE),
            by_country: dir.join(BY_COUNTRY_FILE),
            run_report: dir.join(RUN_REPORT_FILE),
        }
    }

    pub fn paths(&self) -> [&Path; 5] {
        [
            self.demand.as_path(),
            self.by_drug.as_path(),
            self.by_month.as_path(),
            self.by_country.as_path(),
            self.run_report.as_path(),
        ]
    }
}

/// Write the demand table, the three summaries and the run report into
/// `output_dir`, creating it when needed.
pub fn write_outputs(output_dir: &Path, forecast: &Forecast) -> Result<OutputFiles> {
    std::fs::create_dir_all(output_dir).map_err(|source| ReportError::CreateDir {
        path: output_dir.to_path_buf(),
        source,
    })?;
    let files = OutputFiles::in_dir(output_dir);

    let demand = demand_frame(&forecast.visits)?;
    let summaries: DemandSummaries = summarize(&demand)?;

    write_visits_csv(&files.demand, &forecast.visits)?;
    write_frame_csv(&files.by_drug, &summaries.by_drug)?;
    write_frame_csv(&files.by_month, &summaries.by_month)?;
    write_frame_csv(&files.by_country, &summaries.by_country)?;
    write_run_report(&files.run_report, &RunReport::new(forecast))?;
    Ok(files)
}

/// Write projected visits with the demand-table headers. An empty forecast
/// still gets its header row.
pub fn write_visits_csv(path: &Path, visits: &[ProjectedVisit]) -> Result<()> {
    let csv_error = |source| ReportError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
    if visits.is_empty() {
        writer.write_record(forecast::HEADERS).map_err(csv_error)?;
    }
    for visit in visits {
        writer.serialize(visit).map_err(csv_error)?;
    }
    writer.flush().map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), rows = visits.len(), "wrote demand table");
    Ok(())
}

/// Write a summary frame as CSV, header first.
pub fn write_frame_csv(path: &Path, frame: &DataFrame) -> Result<()> {
    let csv_error = |source| ReportError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let (headers, rows) = frame_rows(frame)?;
    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
    writer.write_record(&headers).map_err(csv_error)?;
    for row in &rows {
        writer.write_record(row).map_err(csv_error)?;
    }
    writer.flush().map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), rows = rows.len(), "wrote summary");
    Ok(())
}

pub fn write_run_report(path: &Path, report: &RunReport<'_>) -> Result<()> {
    let io_error = |source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_error)?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, report).map_err(|source| ReportError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    out.write_all(b"\n").map_err(io_error)?;
    out.flush().map_err(io_error)?;
    info!(path = %path.display(), "wrote run report");
    Ok(())
}
