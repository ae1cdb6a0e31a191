//! Treatment-plan matching and dispensing visit projection.
//!
//! The flow for each active patient is: parse the last-visit label, match the
//! patient to dispensing rules, project each rule's cadence forward to the
//! horizon, and emit one row per (visit, drug). Rows from all patients are
//! deduplicated in a single pass at the end.

pub mod builder;
pub mod catalog;
pub mod forecast;
pub mod label;
pub mod matcher;
pub mod projector;
pub mod stats;

pub use builder::{build, build_rows, dedup_visits, patient_position};
pub use catalog::{CatalogEntry, RejectedRule, RuleCatalog};
pub use forecast::{Forecast, ForecastError, generate, generate_on};
pub use label::{LabelDefect, LabelPosition, VisitLabel, parse_visit_label};
pub use matcher::{MatchKey, MatchRoute, RuleField, RuleMatch, match_rules, select};
pub use projector::{CycleProjection, ProjectedPoint, VisitPosition, project};
pub use stats::{MalformedLabel, RunStats};
