//! End-to-end forecast behaviour over a small two-arm cohort.

use chrono::{Days, NaiveDate};
use dispense_core::{LabelDefect, MatchRoute, generate_on};
use dispense_model::{
    DispensingRule, ForecastOptions, PatientRecord, ProjectedVisit, StatusMatching, Tpc,
};

const PROTOCOL: &str = "GS-US-592-6173";
const SG_ARM: &str = "Sacituzumab Govitecan plus Pembrolizumab";
const TPC_ARM: &str = "Treatment of Physician's Choice plus Pembrolizumab";
const NAB_TPC: &str = "Nab-Paclitaxel 100 mg/m2";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn rule(
    treatment: &str,
    status: &str,
    tpc: &str,
    drug: &str,
    quantity: f64,
    visit_days: Vec<i64>,
) -> DispensingRule {
    DispensingRule {
        protocol: PROTOCOL.to_string(),
        randomized_treatment: treatment.to_string(),
        status: status.to_string(),
        tpc: Tpc::new(tpc),
        drug: drug.to_string(),
        additional_drug: None,
        visit_days,
        quantity,
        cycle_length_days: 21,
    }
}

fn rules() -> Vec<DispensingRule> {
    vec![
        rule(SG_ARM, "Randomized", "n/a", "Sacituzumab Govitecan", 4.0, vec![1, 8]),
        rule(SG_ARM, "Randomized", "n/a", "Pembrolizumab", 1.0, vec![1, 8]),
        rule(TPC_ARM, "Randomized", NAB_TPC, "Nab-Paclitaxel", 2.0, vec![1, 8]),
        rule(TPC_ARM, "Randomized", NAB_TPC, "Pembrolizumab", 1.0, vec![1]),
        rule(
            "Crossover",
            "Crossover Approved",
            NAB_TPC,
            "Sacituzumab Govitecan",
            4.0,
            vec![1, 8],
        ),
    ]
}

fn patient(
    subject: &str,
    treatment: &str,
    status: &str,
    tpc: &str,
    label: &str,
    last_visit: NaiveDate,
) -> PatientRecord {
    PatientRecord {
        protocol: PROTOCOL.to_string(),
        site_id: "10663".to_string(),
        country: "Japan".to_string(),
        depot: Some("Japan Depot".to_string()),
        subject_number: subject.to_string(),
        randomized_on: None,
        status: status.to_string(),
        randomized_treatment: treatment.to_string(),
        tpc: Tpc::new(tpc),
        last_visit_label: label.to_string(),
        last_visit_date: last_visit,
    }
}

fn cohort() -> Vec<PatientRecord> {
    vec![
        patient(
            "10663-101",
            SG_ARM,
            "Randomized",
            "n/a",
            "Cycle 2 Day 1",
            date(2024, 1, 1),
        ),
        patient(
            "10663-102",
            TPC_ARM,
            "Crossover Approved",
            NAB_TPC,
            "Crossover Cycle 1 Day 8",
            date(2024, 1, 8),
        ),
        patient(
            "10663-103",
            SG_ARM,
            "Discontinued",
            "n/a",
            "Cycle 4 Day 1",
            date(2024, 1, 3),
        ),
        patient(
            "10663-104",
            "Unknown Arm",
            "Randomized",
            "n/a",
            "Cycle 1 Day 1",
            date(2024, 1, 2),
        ),
    ]
}

fn options() -> ForecastOptions {
    ForecastOptions::new()
        .with_run_date(date(2024, 1, 1))
        .with_months_ahead(2)
}

fn rows_for<'a>(visits: &'a [ProjectedVisit], subject: &str) -> Vec<&'a ProjectedVisit> {
    visits
        .iter()
        .filter(|visit| visit.subject_number == subject)
        .collect()
}

#[test]
fn horizon_comes_from_run_date() {
    let forecast = generate_on(&cohort(), &rules(), &options(), date(2030, 6, 1)).unwrap();
    assert_eq!(forecast.run_date, date(2024, 1, 1));
    assert_eq!(forecast.horizon, date(2024, 3, 1));
    assert!(forecast.visits.iter().all(|v| v.visit_date <= forecast.horizon));
}

#[test]
fn combination_rules_fan_out_per_drug() {
    let forecast = generate_on(&cohort(), &rules(), &options(), date(2024, 1, 1)).unwrap();
    let rows = rows_for(&forecast.visits, "10663-101");

    // C2D8, C3D1, C3D8, C4D1, C4D8; C5D1 on 2024-03-04 is past the horizon.
    assert_eq!(rows.len(), 10);
    for visit_date in [
        date(2024, 1, 8),
        date(2024, 1, 22),
        date(2024, 1, 29),
        date(2024, 2, 12),
        date(2024, 2, 19),
    ] {
        let mut on_date: Vec<(&str, f64)> = rows
            .iter()
            .filter(|row| row.visit_date == visit_date)
            .map(|row| (row.drug.as_str(), row.quantity))
            .collect();
        on_date.sort_by(|a, b| a.0.cmp(b.0));
        assert_eq!(
            on_date,
            vec![("Pembrolizumab", 1.0), ("Sacituzumab Govitecan", 4.0)],
            "{visit_date}"
        );
    }
}

#[test]
fn crossover_subject_gets_new_drug_only() {
    let forecast = generate_on(&cohort(), &rules(), &options(), date(2024, 1, 1)).unwrap();
    let rows = rows_for(&forecast.visits, "10663-102");

    assert!(!rows.is_empty());
    assert!(rows.iter().all(|row| row.drug == "Sacituzumab Govitecan"));
    assert!(rows.iter().all(|row| row.quantity == 4.0));
    assert_eq!(rows[0].tpc.as_str(), NAB_TPC);

    let labels: Vec<&str> = rows.iter().map(|row| row.visit_label.as_str()).collect();
    insta::assert_snapshot!(labels.join("\n"), @r"
    Crossover Cycle 2 Day 1
    Crossover Cycle 2 Day 8
    Crossover Cycle 3 Day 1
    Crossover Cycle 3 Day 8
    ");
}

#[test]
fn inactive_and_unmatched_subjects_produce_no_rows() {
    let forecast = generate_on(&cohort(), &rules(), &options(), date(2024, 1, 1)).unwrap();
    assert!(rows_for(&forecast.visits, "10663-103").is_empty());
    assert!(rows_for(&forecast.visits, "10663-104").is_empty());

    let stats = &forecast.stats;
    assert_eq!(stats.total_patients, 4);
    assert_eq!(stats.inactive_patients, 1);
    assert_eq!(stats.matched_patients, 2);
    assert_eq!(stats.unmatched_subjects, vec!["10663-104".to_string()]);
    assert_eq!(stats.rows_before_dedup, 14);
    assert_eq!(stats.rows_after_dedup, 14);
    assert_eq!(stats.patients_with_rows, 2);
    assert_eq!(stats.reconciliation_gap(), 1);
}

#[test]
fn visits_are_unique_per_subject_date_and_drug() {
    let mut rules = rules();
    rules.push(rules[0].clone());
    let forecast = generate_on(&cohort(), &rules, &options(), date(2024, 1, 1)).unwrap();

    let stats = &forecast.stats;
    assert_eq!(stats.rows_before_dedup, 19);
    assert_eq!(stats.rows_after_dedup, 14);
    assert_eq!(stats.duplicates_removed(), 5);

    let mut keys: Vec<_> = forecast.visits.iter().map(ProjectedVisit::key).collect();
    let total = keys.len();
    keys.sort();
    keys.dedup();
    assert_eq!(keys.len(), total);
}

#[test]
fn visit_days_are_emitted_in_order() {
    let rules = vec![rule(
        SG_ARM,
        "Randomized",
        "n/a",
        "Sacituzumab Govitecan",
        4.0,
        vec![15, 1, 8],
    )];
    let subjects = vec![patient(
        "10663-105",
        SG_ARM,
        "Randomized",
        "n/a",
        "Cycle 1 Day 1",
        date(2024, 1, 1),
    )];
    let forecast = generate_on(&subjects, &rules, &options(), date(2024, 1, 1)).unwrap();
    let days: Vec<(u32, u32)> = forecast
        .visits
        .iter()
        .map(|visit| (visit.cycle, visit.day))
        .take(4)
        .collect();
    assert_eq!(days, vec![(1, 8), (1, 15), (2, 1), (2, 8)]);
}

#[test]
fn horizon_date_itself_is_included() {
    let rules = vec![DispensingRule {
        cycle_length_days: 31,
        ..rule(SG_ARM, "Randomized", "n/a", "Pembrolizumab", 1.0, vec![1])
    }];
    let subjects = vec![patient(
        "10663-106",
        SG_ARM,
        "Randomized",
        "n/a",
        "Cycle 1 Day 1",
        date(2024, 1, 1),
    )];
    let options = options().with_months_ahead(1);
    let forecast = generate_on(&subjects, &rules, &options, date(2024, 1, 1)).unwrap();
    assert_eq!(forecast.horizon, date(2024, 2, 1));
    let dates: Vec<NaiveDate> = forecast.visits.iter().map(|v| v.visit_date).collect();
    assert_eq!(dates, vec![date(2024, 2, 1)]);
}

#[test]
fn malformed_label_falls_back_and_is_reported() {
    let subjects = vec![patient(
        "10663-107",
        SG_ARM,
        "Randomized",
        "n/a",
        "Unscheduled",
        date(2024, 1, 1),
    )];
    let forecast = generate_on(&subjects, &rules(), &options(), date(2024, 1, 1)).unwrap();

    let malformed = &forecast.stats.malformed_labels;
    assert_eq!(malformed.len(), 1);
    assert_eq!(malformed[0].subject_number, "10663-107");
    assert_eq!(malformed[0].defect, LabelDefect::MissingCycle);
    assert_eq!(forecast.visits[0].visit_label, "Cycle 1 Day 8");
    assert_eq!(forecast.visits[0].visit_date, date(2024, 1, 8));
}

#[test]
fn relaxed_matching_is_opt_in() {
    let subjects = vec![patient(
        "10663-108",
        SG_ARM,
        "On Treatment",
        "n/a",
        "Cycle 1 Day 1",
        date(2024, 1, 1),
    )];
    let strict = generate_on(&subjects, &rules(), &options(), date(2024, 1, 1)).unwrap();
    assert!(strict.visits.is_empty());
    assert_eq!(strict.stats.unmatched_patients(), 1);

    let relaxed_options = options().with_status_matching(StatusMatching::RelaxOnMiss);
    let relaxed = generate_on(&subjects, &rules(), &relaxed_options, date(2024, 1, 1)).unwrap();
    assert!(!relaxed.visits.is_empty());
    assert_eq!(relaxed.stats.relaxed_subjects, vec!["10663-108".to_string()]);
    assert_eq!(
        dispense_core::match_rules(
            &subjects[0],
            &dispense_core::RuleCatalog::new(&rules()),
            &relaxed_options
        )
        .route,
        MatchRoute::RelaxedStatus
    );
}

#[test]
fn invalid_rules_are_excluded_not_fatal() {
    let mut rules = rules();
    rules[0].visit_days = vec![];
    let forecast = generate_on(&cohort(), &rules, &options(), date(2024, 1, 1)).unwrap();

    assert_eq!(forecast.stats.rejected_rules.len(), 1);
    assert_eq!(forecast.stats.rejected_rules[0].index, 0);
    let rows = rows_for(&forecast.visits, "10663-101");
    assert!(rows.iter().all(|row| row.drug == "Pembrolizumab"));
}

#[test]
fn zero_month_horizon_is_an_error() {
    let result = generate_on(
        &cohort(),
        &rules(),
        &options().with_months_ahead(0),
        date(2024, 1, 1),
    );
    assert!(result.is_err());
}

#[test]
fn stats_serialize_with_defect_names() {
    let subjects = vec![patient(
        "10663-109",
        SG_ARM,
        "Randomized",
        "n/a",
        "Day 8 of Cycle 4",
        date(2024, 1, 1),
    )];
    let forecast = generate_on(&subjects, &rules(), &options(), date(2024, 1, 1)).unwrap();
    let json = serde_json::to_value(&forecast.stats).unwrap();
    assert_eq!(json["total_patients"], 1);
    assert_eq!(json["malformed_labels"][0]["subject_number"], "10663-109");
    assert_eq!(json["malformed_labels"][0]["defect"], "day_before_cycle");
}

#[test]
fn oversized_label_day_falls_back_and_is_reported() {
    let subjects = vec![patient(
        "10663-110",
        SG_ARM,
        "Randomized",
        "n/a",
        "Cycle 1 Day 4000000000",
        date(2024, 1, 1),
    )];
    let forecast = generate_on(&subjects, &rules(), &options(), date(2024, 1, 1)).unwrap();

    let malformed = &forecast.stats.malformed_labels;
    assert_eq!(malformed.len(), 1);
    assert_eq!(malformed[0].defect, LabelDefect::OutOfRange);
    let rows = rows_for(&forecast.visits, "10663-110");
    let first = rows[0];
    assert_eq!(first.visit_date, date(2024, 1, 8));
    assert_eq!(first.visit_label, "Cycle 1 Day 8");
}

#[test]
fn position_before_calendar_start_is_reported() {
    let subjects = vec![patient(
        "10663-111",
        SG_ARM,
        "Randomized",
        "n/a",
        "Cycle 1 Day 300",
        NaiveDate::MIN + Days::new(5),
    )];
    let forecast = generate_on(&subjects, &rules(), &options(), date(2024, 1, 1)).unwrap();

    assert!(forecast.visits.is_empty());
    assert_eq!(forecast.stats.matched_patients, 1);
    let malformed = &forecast.stats.malformed_labels;
    assert_eq!(malformed.len(), 1);
    assert_eq!(malformed[0].subject_number, "10663-111");
    assert_eq!(malformed[0].defect, LabelDefect::PrecedesCalendar);
    assert_eq!(forecast.stats.reconciliation_gap(), 1);
}
