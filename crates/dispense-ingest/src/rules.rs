//! Dispensing-rule (treatment plan) table parsing.

use std::io::Read;
use std::path::Path;

use tracing::info;

use dispense_model::columns::rule;
use dispense_model::{DispensingRule, Tpc};

use crate::csv_table::{CsvRow, CsvTable, read_csv_table, read_csv_table_from_reader};
use crate::error::{IngestError, IngestIssue, TableKind};

/// Parsed rules in source order plus the rows that had to be dropped.
///
/// Rules are not checked for a usable cadence here; that happens when the
/// forecast builds its rule catalog, so defects are reported per rule.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    pub rules: Vec<DispensingRule>,
    pub issues: Vec<IngestIssue>,
}

pub fn load_rules(path: &Path) -> Result<RuleTable, IngestError> {
    let table = read_csv_table(path, TableKind::Rules, rule::REQUIRED)?;
    let parsed = rules_from_table(&table);
    info!(
        path = %path.display(),
        rules = parsed.rules.len(),
        dropped = parsed.issues.len(),
        "loaded dispensing rule table"
    );
    Ok(parsed)
}

pub fn read_rules<R: Read>(source: R) -> Result<RuleTable, IngestError> {
    let table = read_csv_table_from_reader(source, TableKind::Rules, rule::REQUIRED)?;
    Ok(rules_from_table(&table))
}

pub fn rules_from_table(table: &CsvTable) -> RuleTable {
    let mut parsed = RuleTable::default();
    for row in &table.rows {
        match rule_from_row(table, row) {
            Ok(rule) => parsed.rules.push(rule),
            Err(message) => parsed.issues.push(IngestIssue {
                table: TableKind::Rules,
                line: row.line,
                message,
            }),
        }
    }
    parsed
}

fn rule_from_row(table: &CsvTable, row: &CsvRow) -> Result<DispensingRule, String> {
    let raw_days = table.value(row, rule::VISIT_DAYS);
    let visit_days =
        parse_visit_days(raw_days).ok_or_else(|| format!("unreadable visit days '{raw_days}'"))?;
    let raw_quantity = table.value(row, rule::QUANTITY);
    let quantity = raw_quantity
        .parse::<f64>()
        .map_err(|_| format!("unreadable dispensing quantity '{raw_quantity}'"))?;
    let raw_frequency = table.value(row, rule::FREQUENCY);
    let cycle_length_days = parse_integer(raw_frequency)
        .ok_or_else(|| format!("unreadable dispensing frequency '{raw_frequency}'"))?;

    Ok(DispensingRule {
        protocol: table.value(row, rule::PROTOCOL).to_string(),
        randomized_treatment: table.value(row, rule::TREATMENT).to_string(),
        status: table.value(row, rule::STATUS).to_string(),
        tpc: Tpc::new(table.value(row, rule::TPC)),
        drug: table.value(row, rule::DRUG).to_string(),
        additional_drug: table
            .non_empty(row, rule::ADDITIONAL_DRUG)
            .map(str::to_string),
        visit_days,
        quantity,
        cycle_length_days,
    })
}

/// Split a comma-separated visit-day list.
///
/// Blank input yields an empty list, which the rule catalog later rejects;
/// any non-integer token makes the whole list unreadable.
///
/// ```
/// use dispense_ingest::parse_visit_days;
///
/// assert_eq!(parse_visit_days("1,8,15"), Some(vec![1, 8, 15]));
/// assert_eq!(parse_visit_days(" 1, 8 "), Some(vec![1, 8]));
/// assert_eq!(parse_visit_days(""), Some(vec![]));
/// assert_eq!(parse_visit_days("1;8"), None);
/// ```
pub fn parse_visit_days(value: &str) -> Option<Vec<i64>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(Vec::new());
    }
    trimmed
        .split(',')
        .map(|token| parse_integer(token.trim()))
        .collect()
}

/// Integer cell value; spreadsheet exports may render whole numbers as `21.0`.
fn parse_integer(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if let Ok(parsed) = trimmed.parse::<i64>() {
        return Some(parsed);
    }
    let float = trimmed.parse::<f64>().ok()?;
    if float.is_finite() && float.fract() == 0.0 {
        Some(float as i64)
    } else {
        None
    }
}
