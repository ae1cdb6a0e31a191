use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use polars::prelude::DataFrame;
use tracing::warn;

use dispense_cli::types::{ForecastOutcome, RuleCheck};
use dispense_report::frame_rows;

pub fn print_forecast_summary(outcome: &ForecastOutcome) {
    let forecast = &outcome.forecast;
    println!("Run date: {}", forecast.run_date);
    println!("Horizon: {}", forecast.horizon);
    match &outcome.outputs {
        Some(files) => {
            for path in files.paths() {
                println!("Wrote: {}", path.display());
            }
        }
        None => println!("Dry run: no files written"),
    }

    print_drug_table(outcome);
    print_reconciliation_table(outcome);

    let stats = &forecast.stats;
    if !stats.unmatched_subjects.is_empty() {
        eprintln!("Subjects without a matching dispensing rule:");
        for subject in &stats.unmatched_subjects {
            eprintln!("- {subject}");
        }
    }
    if !outcome.issues.is_empty() {
        eprintln!("Dropped input rows:");
        for issue in &outcome.issues {
            eprintln!("- {issue}");
        }
    }
}

fn print_drug_table(outcome: &ForecastOutcome) {
    let Some(table) = drug_table(&outcome.by_drug) else {
        return;
    };
    println!();
    println!("Demand by drug:");
    println!("{table}");
}

fn drug_table(frame: &DataFrame) -> Option<Table> {
    let (headers, rows) = match frame_rows(frame) {
        Ok(table) => table,
        Err(error) => {
            warn!(%error, "could not render demand by drug table");
            return None;
        }
    };
    let mut table = Table::new();
    table.set_header(
        headers
            .iter()
            .map(String::as_str)
            .map(header_cell)
            .collect::<Vec<_>>(),
    );
    apply_table_style(&mut table);
    for index in 1..headers.len() {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for row in rows {
        table.add_row(row);
    }
    Some(table)
}

fn print_reconciliation_table(outcome: &ForecastOutcome) {
    let stats = &outcome.forecast.stats;
    let mut table = Table::new();
    table.set_header(vec![header_cell("Check"), header_cell("Count")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);

    let rows: [(&str, usize, Option<Color>); 12] = [
        ("Subjects read", stats.total_patients, None),
        ("Inactive subjects", stats.inactive_patients, None),
        ("Matched subjects", stats.matched_patients, None),
        ("Unmatched subjects", stats.unmatched_patients(), Some(Color::Yellow)),
        ("Relaxed status matches", stats.relaxed_subjects.len(), Some(Color::Yellow)),
        ("Unreadable visit labels", stats.malformed_labels.len(), Some(Color::Yellow)),
        ("Rejected rules", stats.rejected_rules.len(), Some(Color::Red)),
        ("Dropped input rows", outcome.issues.len(), Some(Color::Red)),
        ("Duplicate rows removed", stats.duplicates_removed(), None),
        ("Projected visits", stats.rows_after_dedup, None),
        ("Subjects with visits", stats.patients_with_rows, None),
        ("Active subjects without visits", stats.reconciliation_gap(), Some(Color::Yellow)),
    ];
    for (label, count, color) in rows {
        table.add_row(vec![Cell::new(label), count_cell(count, color)]);
    }
    println!();
    println!("Reconciliation:");
    println!("{table}");
}

pub fn print_rule_check(check: &RuleCheck) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Protocol"),
        header_cell("Treatment"),
        header_cell("Status"),
        header_cell("TPC"),
        header_cell("Drugs"),
        header_cell("Visit Days"),
        header_cell("Quantity"),
        header_cell("Cycle"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 6, CellAlignment::Right);
    align_column(&mut table, 7, CellAlignment::Right);
    for rule in &check.accepted {
        let days: Vec<String> = rule.visit_days.iter().map(i64::to_string).collect();
        table.add_row(vec![
            Cell::new(&rule.protocol),
            Cell::new(&rule.randomized_treatment),
            Cell::new(&rule.status),
            Cell::new(rule.tpc.as_str()),
            Cell::new(rule.drugs().join(" + ")),
            Cell::new(days.join(", ")),
            Cell::new(dispense_report::format_quantity(rule.quantity)),
            Cell::new(rule.cycle_length_days),
        ]);
    }
    println!("Accepted rules: {}", check.accepted.len());
    println!("{table}");

    if !check.rejected.is_empty() {
        let mut rejected = Table::new();
        rejected.set_header(vec![
            header_cell("Row"),
            header_cell("Treatment"),
            header_cell("Status"),
            header_cell("Drugs"),
            header_cell("Reason"),
        ]);
        apply_table_style(&mut rejected);
        align_column(&mut rejected, 0, CellAlignment::Right);
        for rule in &check.rejected {
            rejected.add_row(vec![
                dim_cell(rule.index + 1),
                Cell::new(&rule.randomized_treatment),
                Cell::new(&rule.status),
                Cell::new(&rule.drug),
                Cell::new(&rule.reason).fg(Color::Red),
            ]);
        }
        println!();
        println!("Rejected rules: {}", check.rejected.len());
        println!("{rejected}");
    }

    if !check.issues.is_empty() {
        eprintln!("Dropped input rows:");
        for issue in &check.issues {
            eprintln!("- {issue}");
        }
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: usize, color: Option<Color>) -> Cell {
    match color {
        Some(color) if count > 0 => Cell::new(count).fg(color).add_attribute(Attribute::Bold),
        _ if count == 0 => dim_cell(count),
        _ => Cell::new(count),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
