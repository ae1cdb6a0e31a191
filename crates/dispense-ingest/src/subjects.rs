//! Subject table parsing.

use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use dispense_model::columns::subject;
use dispense_model::{PatientRecord, Tpc};

use crate::csv_table::{CsvRow, CsvTable, read_csv_table, read_csv_table_from_reader};
use crate::dates::parse_date;
use crate::error::{IngestError, IngestIssue, TableKind};

/// Parsed subjects plus the rows that had to be dropped.
#[derive(Debug, Clone, Default)]
pub struct SubjectTable {
    pub patients: Vec<PatientRecord>,
    pub issues: Vec<IngestIssue>,
}

pub fn load_subjects(path: &Path) -> Result<SubjectTable, IngestError> {
    let table = read_csv_table(path, TableKind::Subjects, subject::REQUIRED)?;
    let parsed = subjects_from_table(&table);
    info!(
        path = %path.display(),
        subjects = parsed.patients.len(),
        dropped = parsed.issues.len(),
        "loaded subject table"
    );
    Ok(parsed)
}

pub fn read_subjects<R: Read>(source: R) -> Result<SubjectTable, IngestError> {
    let table = read_csv_table_from_reader(source, TableKind::Subjects, subject::REQUIRED)?;
    Ok(subjects_from_table(&table))
}

/// Convert validated CSV rows into patient records.
///
/// Rows with a blank or repeated subject number, or an unreadable last-visit
/// date, are dropped and reported. The first row of a repeated subject wins.
pub fn subjects_from_table(table: &CsvTable) -> SubjectTable {
    let mut parsed = SubjectTable::default();
    let mut seen = BTreeSet::new();
    for row in &table.rows {
        match subject_from_row(table, row) {
            Ok(patient) => {
                if seen.insert(patient.subject_number.clone()) {
                    parsed.patients.push(patient);
                } else {
                    parsed.issues.push(issue(
                        row,
                        format!("duplicate subject number {}", patient.subject_number),
                    ));
                }
            }
            Err(message) => parsed.issues.push(issue(row, message)),
        }
    }
    parsed
}

fn subject_from_row(table: &CsvTable, row: &CsvRow) -> Result<PatientRecord, String> {
    let subject_number = table
        .non_empty(row, subject::SUBJECT_NUMBER)
        .ok_or_else(|| "blank subject number".to_string())?;
    let raw_visit_date = table.value(row, subject::LAST_VISIT_DATE);
    let last_visit_date = parse_date(raw_visit_date).ok_or_else(|| {
        format!("subject {subject_number}: unreadable last visit date '{raw_visit_date}'")
    })?;
    let randomized_on = table
        .non_empty(row, subject::DATE_RANDOMIZED)
        .and_then(|raw| {
            let parsed = parse_date(raw);
            if parsed.is_none() {
                debug!(line = row.line, "ignoring unreadable randomization date");
            }
            parsed
        });

    Ok(PatientRecord {
        protocol: table.value(row, subject::PROTOCOL).to_string(),
        site_id: table.value(row, subject::SITE_ID).to_string(),
        country: table.value(row, subject::COUNTRY).to_string(),
        depot: table.non_empty(row, subject::DEPOT).map(str::to_string),
        subject_number: subject_number.to_string(),
        randomized_on,
        status: table.value(row, subject::STATUS).to_string(),
        randomized_treatment: table.value(row, subject::TREATMENT).to_string(),
        tpc: Tpc::new(table.value(row, subject::TPC)),
        last_visit_label: table.value(row, subject::LAST_VISIT_LABEL).to_string(),
        last_visit_date,
    })
}

fn issue(row: &CsvRow, message: String) -> IngestIssue {
    IngestIssue {
        table: TableKind::Subjects,
        line: row.line,
        message,
    }
}
