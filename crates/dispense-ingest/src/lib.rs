//! Subject and dispensing-rule table ingestion.
//!
//! Tables are read with the `csv` crate, the header row is located below any
//! export preamble, and required columns are checked before a single row is
//! parsed. A missing column is fatal; a bad row is dropped and reported.

pub mod csv_table;
pub mod dates;
pub mod error;
pub mod rules;
pub mod subjects;

pub use csv_table::{CsvRow, CsvTable, HeaderIndex, read_csv_table, read_csv_table_from_reader};
pub use dates::parse_date;
pub use error::{IngestError, IngestIssue, TableKind};
pub use rules::{RuleTable, load_rules, parse_visit_days, read_rules, rules_from_table};
pub use subjects::{SubjectTable, load_subjects, read_subjects, subjects_from_table};
