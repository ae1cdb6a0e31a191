//! Data model for clinical-trial dispensing forecasts.

pub mod columns;
pub mod error;
pub mod options;
pub mod patient;
pub mod rule;
pub mod visit;

pub use error::{CadenceError, ModelError, Result};
pub use options::{
    DEFAULT_CROSSOVER_KEYWORD, DEFAULT_INACTIVE_KEYWORDS, DEFAULT_MONTHS_AHEAD, ForecastOptions,
    StatusMatching,
};
pub use patient::{PatientRecord, TPC_NOT_APPLICABLE, Tpc};
pub use rule::{Cadence, DispensingRule};
pub use visit::{ProjectedVisit, VisitKey, visit_label};
