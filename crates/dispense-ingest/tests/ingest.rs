//! Integration tests for subject and rule table loading.

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use tempfile::TempDir;

use dispense_ingest::{IngestError, TableKind, load_rules, load_subjects, read_rules, read_subjects};
use dispense_model::Tpc;

const SUBJECTS_CSV: &str = "\
Study Protocol,Site ID,Country,Depot,Subject Number,Date Randomized,Subject Status,Randomized Treatment,TPC,Last Study Visit Recorded,Last Study Visit Date
GS-US-592-6173,10663,Japan,Tokyo-North,10663-106,2021-03-10,Crossover Approved,Treatment of Physician's Choice plus Pembrolizumab,Nab-Paclitaxel 100 mg/m2,Crossover Cycle 2 Day 1,2023-10-15
GS-US-592-6173,20735,France,3KI Lumbres,20735-001,2022-11-10,Randomized,Sacituzumab Govitecan plus Pembrolizumab,n/a,Cycle 18 Day 1,2023-12-12
GS-US-592-6173,23323,Australia,,23323-045,2022-09-20,Crossover Approved,Treatment of Physician's Choice plus Pembrolizumab,Paclitaxel 90 mg/m2,Crossover Cycle 1 Day 8,2023-10-20 00:00:00
";

const RULES_CSV: &str = "\
Study Protocol,Randomized Treatment,Subject Status,TPC,Study Drug Dispensed,Additional Study Drug Dispensed,Visit Days,Dispensing Quantity,Dispensing Frequency (Days)
GS-US-592-6173,Sacituzumab Govitecan plus Pembrolizumab,Randomized,n/a,Sacituzumab Govitecan,,\"1,8\",4,21
GS-US-592-6173,Sacituzumab Govitecan plus Pembrolizumab,Randomized,n/a,,Pembrolizumab,\"1,8\",1,21
GS-US-592-6173,Treatment of Physician's Choice plus Pembrolizumab,Randomized,Nab-Paclitaxel 100 mg/m2,Nab-Paclitaxel,,\"1,8,15\",1,28
GS-US-592-6173,Treatment of Physician's Choice plus Pembrolizumab,Crossover Approved,Nab-Paclitaxel 100 mg/m2,Sacituzumab Govitecan,,\"1,8\",4,21
";

fn write_temp(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn loads_sample_subjects() {
    let dir = TempDir::new().unwrap();
    let path = write_temp(&dir, "subjects.csv", SUBJECTS_CSV);

    let table = load_subjects(&path).unwrap();

    assert!(table.issues.is_empty(), "{:?}", table.issues);
    assert_eq!(table.patients.len(), 3);
    let crossover = &table.patients[0];
    assert_eq!(crossover.subject_number, "10663-106");
    assert_eq!(crossover.tpc, Tpc::Drug("Nab-Paclitaxel 100 mg/m2".to_string()));
    assert_eq!(crossover.depot.as_deref(), Some("Tokyo-North"));
    assert_eq!(crossover.randomized_on, NaiveDate::from_ymd_opt(2021, 3, 10));
    assert_eq!(table.patients[1].tpc, Tpc::NotApplicable);
    assert_eq!(table.patients[2].depot, None);
    assert_eq!(
        table.patients[2].last_visit_date,
        NaiveDate::from_ymd_opt(2023, 10, 20).unwrap()
    );
}

#[test]
fn loads_sample_rules_in_order() {
    let dir = TempDir::new().unwrap();
    let path = write_temp(&dir, "rules.csv", RULES_CSV);

    let table = load_rules(&path).unwrap();

    assert!(table.issues.is_empty(), "{:?}", table.issues);
    assert_eq!(table.rules.len(), 4);
    assert_eq!(table.rules[0].visit_days, vec![1, 8]);
    assert_eq!(table.rules[0].quantity, 4.0);
    assert_eq!(table.rules[1].drugs(), vec!["Pembrolizumab"]);
    assert_eq!(table.rules[2].visit_days, vec![1, 8, 15]);
    assert_eq!(table.rules[2].cycle_length_days, 28);
    assert_eq!(table.rules[3].status, "Crossover Approved");
}

#[test]
fn missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = load_subjects(&dir.path().join("absent.csv")).unwrap_err();
    assert!(matches!(err, IngestError::Csv { .. }));
}

#[test]
fn missing_required_column_aborts() {
    let csv = "Study Protocol,Randomized Treatment,Subject Status,TPC,Study Drug Dispensed,Visit Days,Dispensing Quantity\n\
               P1,Arm A,Randomized,n/a,Drug A,1,1\n";
    let err = read_rules(csv.as_bytes()).unwrap_err();
    match err {
        IngestError::MissingColumns { table, columns } => {
            assert_eq!(table, TableKind::Rules);
            assert_eq!(columns, vec!["Dispensing Frequency (Days)"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn bad_rows_are_dropped_and_reported() {
    let csv = "\
Study Protocol,Site ID,Subject Number,Subject Status,Randomized Treatment,TPC,Last Study Visit Recorded,Last Study Visit Date
P1,S1,001,Randomized,Arm A,n/a,Cycle 1 Day 1,2024-01-01
P1,S1,,Randomized,Arm A,n/a,Cycle 1 Day 1,2024-01-01
P1,S1,002,Randomized,Arm A,n/a,Cycle 1 Day 1,not a date
P1,S1,001,Randomized,Arm B,n/a,Cycle 4 Day 1,2024-02-01
";
    let table = read_subjects(csv.as_bytes()).unwrap();

    assert_eq!(table.patients.len(), 1);
    assert_eq!(table.patients[0].randomized_treatment, "Arm A");
    assert_eq!(table.patients[0].country, "");
    let lines: Vec<usize> = table.issues.iter().map(|issue| issue.line).collect();
    assert_eq!(lines, vec![3, 4, 5]);
    assert!(table.issues[2].message.contains("duplicate subject number 001"));
}

#[test]
fn unreadable_rule_numbers_are_reported() {
    let csv = "\
Study Protocol,Randomized Treatment,Subject Status,TPC,Study Drug Dispensed,Visit Days,Dispensing Quantity,Dispensing Frequency (Days)
P1,Arm A,Randomized,n/a,Drug A,\"1,x\",1,21
P1,Arm A,Randomized,n/a,Drug A,1,lots,21
P1,Arm A,Randomized,n/a,Drug A,1,1,weekly
P1,Arm A,Randomized,n/a,Drug A,,1,21.0
";
    let table = read_rules(csv.as_bytes()).unwrap();

    assert_eq!(table.issues.len(), 3);
    assert_eq!(table.rules.len(), 1);
    assert!(table.rules[0].visit_days.is_empty());
    assert_eq!(table.rules[0].cycle_length_days, 21);
}
