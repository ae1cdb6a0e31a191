//! Demand summaries and output files.
//!
//! The forecast is loaded into a polars frame, aggregated by drug, by month
//! and drug, and by country, and written as CSV next to the full demand
//! table. A JSON run report carries the reconciliation counts.

pub mod aggregate;
pub mod cells;
pub mod error;
pub mod frame;
pub mod writer;

pub use aggregate::{
    DateRange, DemandSummaries, PATIENTS, QUANTITY_NEEDED, TOTAL_QUANTITY, VISITS, summarize,
    summarize_by_country, summarize_by_drug, summarize_by_month, unique_patients,
};
pub use cells::{cell_text, format_quantity, frame_rows};
pub use error::{ReportError, Result};
pub use frame::demand_frame;
pub use writer::{
    BY_COUNTRY_FILE, BY_DRUG_FILE, BY_MONTH_FILE, DEMAND_FILE, OutputFiles, RUN_REPORT_FILE,
    RunReport, write_frame_csv, write_outputs, write_run_report, write_visits_csv,
};
