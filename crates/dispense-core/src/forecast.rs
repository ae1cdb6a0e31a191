//! End-to-end forecast generation.

use std::collections::BTreeSet;

use chrono::{Local, NaiveDate};
use tracing::{debug, info, info_span, warn};

use dispense_model::{DispensingRule, ForecastOptions, ModelError, PatientRecord, ProjectedVisit};

use crate::builder::{build_rows, dedup_visits, patient_position};
use crate::catalog::RuleCatalog;
use crate::label::{LabelDefect, parse_visit_label};
use crate::matcher::{MatchRoute, match_rules};
use crate::projector::project;
use crate::stats::{MalformedLabel, RunStats};

#[derive(Debug, thiserror::Error)]
pub enum ForecastError {
    #[error("invalid forecast options: {0}")]
    Options(#[from] ModelError),
}

/// Projected visits for a cohort plus what happened along the way.
#[derive(Debug, Clone)]
pub struct Forecast {
    pub run_date: NaiveDate,
    /// Last date a visit may fall on (inclusive).
    pub horizon: NaiveDate,
    /// Unique per (subject number, visit date, drug).
    pub visits: Vec<ProjectedVisit>,
    pub stats: RunStats,
}

/// Generate the dispensing forecast as of today.
///
/// # Errors
///
/// Returns [`ForecastError::Options`] when the horizon cannot be computed
/// (for example `months_ahead` is zero).
pub fn generate(
    subjects: &[PatientRecord],
    rules: &[DispensingRule],
    options: &ForecastOptions,
) -> Result<Forecast, ForecastError> {
    generate_on(subjects, rules, options, Local::now().date_naive())
}

/// Generate the forecast with `today` standing in for the current date.
///
/// Per-patient problems never abort the run: inactive subjects are skipped,
/// unmatched subjects and unreadable labels are counted in [`RunStats`], and
/// rules with an unusable cadence are excluded.
pub fn generate_on(
    subjects: &[PatientRecord],
    rules: &[DispensingRule],
    options: &ForecastOptions,
    today: NaiveDate,
) -> Result<Forecast, ForecastError> {
    let run_date = options.effective_run_date(today);
    let horizon = options.horizon(today)?;
    let span = info_span!("forecast", %run_date, %horizon);
    let _guard = span.enter();

    let catalog = RuleCatalog::new(rules);
    info!(
        usable_rules = catalog.len(),
        rejected_rules = catalog.rejected().len(),
        "built rule catalog"
    );

    let mut stats = RunStats {
        total_patients: subjects.len(),
        rejected_rules: catalog.rejected().to_vec(),
        ..RunStats::default()
    };
    let mut rows = Vec::new();

    for patient in subjects {
        let subject = patient.subject_number.as_str();
        if options.is_inactive_status(&patient.status) {
            debug!(subject, status = %patient.status, "skipping inactive subject");
            stats.inactive_patients += 1;
            continue;
        }

        let label = parse_visit_label(&patient.last_visit_label);
        if let Some(defect) = label.defect() {
            warn!(
                subject,
                label = %patient.last_visit_label,
                %defect,
                "unreadable last visit label, projecting from Cycle 1 Day 1"
            );
            stats.malformed_labels.push(MalformedLabel {
                subject_number: patient.subject_number.clone(),
                label: patient.last_visit_label.clone(),
                defect,
            });
        }

        let matched = match_rules(patient, &catalog, options);
        if matched.is_empty() {
            warn!(
                subject,
                protocol = %patient.protocol,
                treatment = %patient.randomized_treatment,
                status = %patient.status,
                tpc = %patient.tpc,
                "no dispensing rule matches subject"
            );
            stats.unmatched_subjects.push(patient.subject_number.clone());
            continue;
        }
        stats.matched_patients += 1;
        if matched.route == MatchRoute::RelaxedStatus {
            stats.relaxed_subjects.push(patient.subject_number.clone());
        }

        let position = patient_position(patient, &label, options);
        let unanchored = matched
            .rules
            .iter()
            .any(|entry| !project(&position, &entry.cadence, horizon).is_anchored());
        if unanchored {
            warn!(
                subject,
                label = %patient.last_visit_label,
                last_visit = %patient.last_visit_date,
                "last visit position reaches before the earliest supported date"
            );
            stats.malformed_labels.push(MalformedLabel {
                subject_number: patient.subject_number.clone(),
                label: patient.last_visit_label.clone(),
                defect: LabelDefect::PrecedesCalendar,
            });
        }
        let patient_rows = build_rows(patient, &position, &matched.rules, horizon);
        debug!(
            subject,
            rules = matched.rules.len(),
            rows = patient_rows.len(),
            "projected subject"
        );
        rows.extend(patient_rows);
    }

    stats.rows_before_dedup = rows.len();
    let visits = dedup_visits(rows);
    stats.rows_after_dedup = visits.len();
    stats.patients_with_rows = visits
        .iter()
        .map(|visit| visit.subject_number.as_str())
        .collect::<BTreeSet<_>>()
        .len();

    info!(
        patients = stats.total_patients,
        inactive = stats.inactive_patients,
        unmatched = stats.unmatched_patients(),
        visits = stats.rows_after_dedup,
        duplicates = stats.duplicates_removed(),
        gap = stats.reconciliation_gap(),
        "forecast complete"
    );

    Ok(Forecast {
        run_date,
        horizon,
        visits,
        stats,
    })
}
