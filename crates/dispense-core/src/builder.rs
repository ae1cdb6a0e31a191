//! Demand rows: matched rules crossed with projected visits.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use dispense_model::{ForecastOptions, PatientRecord, ProjectedVisit, visit_label};

use crate::catalog::CatalogEntry;
use crate::label::{VisitLabel, parse_visit_label};
use crate::projector::{ProjectedPoint, VisitPosition, project};

/// Position a patient's projection starts from.
///
/// Labels use the crossover wording when either the recorded label or the
/// subject status says crossover.
pub fn patient_position(
    patient: &PatientRecord,
    label: &VisitLabel,
    options: &ForecastOptions,
) -> VisitPosition {
    let mut position = VisitPosition::new(label.position(), patient.last_visit_date);
    position.crossover |= options.is_crossover_status(&patient.status);
    position
}

/// Parse the patient's last-visit label and build their rows.
pub fn build(
    patient: &PatientRecord,
    matched: &[&CatalogEntry<'_>],
    horizon: NaiveDate,
    options: &ForecastOptions,
) -> Vec<ProjectedVisit> {
    let label = parse_visit_label(&patient.last_visit_label);
    let position = patient_position(patient, &label, options);
    build_rows(patient, &position, matched, horizon)
}

/// One row per (projected point, drug) for every matched rule.
///
/// A rule naming two drugs yields two rows per point, each with the rule's
/// quantity. Rows come out grouped by rule, then by date.
pub fn build_rows(
    patient: &PatientRecord,
    position: &VisitPosition,
    matched: &[&CatalogEntry<'_>],
    horizon: NaiveDate,
) -> Vec<ProjectedVisit> {
    let mut rows = Vec::new();
    for entry in matched {
        let drugs = entry.rule.drugs();
        for point in project(position, &entry.cadence, horizon) {
            let label = visit_label(position.crossover, point.cycle, point.day);
            for drug in &drugs {
                rows.push(visit_row(patient, &point, &label, drug, entry.rule.quantity));
            }
        }
    }
    rows
}

fn visit_row(
    patient: &PatientRecord,
    point: &ProjectedPoint,
    label: &str,
    drug: &str,
    quantity: f64,
) -> ProjectedVisit {
    ProjectedVisit {
        protocol: patient.protocol.clone(),
        subject_number: patient.subject_number.clone(),
        site_id: patient.site_id.clone(),
        depot: patient.depot.clone(),
        country: patient.country.clone(),
        status: patient.status.clone(),
        randomized_treatment: patient.randomized_treatment.clone(),
        tpc: patient.tpc.clone(),
        drug: drug.to_string(),
        quantity,
        visit_date: point.date,
        visit_label: label.to_string(),
        cycle: point.cycle,
        day: point.day,
    }
}

/// Collapse rows sharing (subject number, visit date, drug), keeping the
/// first occurrence and the original order.
pub fn dedup_visits(rows: Vec<ProjectedVisit>) -> Vec<ProjectedVisit> {
    let keep: Vec<bool> = {
        let mut seen = BTreeSet::new();
        rows.iter().map(|row| seen.insert(row.key())).collect()
    };
    rows.into_iter()
        .zip(keep)
        .filter_map(|(row, keep)| keep.then_some(row))
        .collect()
}
