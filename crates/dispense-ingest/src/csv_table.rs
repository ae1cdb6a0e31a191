//! Raw CSV loading with header detection and case-insensitive column lookup.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;

use crate::error::{IngestError, TableKind};

/// Rows inspected when looking for the header line below a preamble.
const HEADER_PROBE_ROWS: usize = 5;

#[derive(Debug, Clone)]
pub struct CsvRow {
    /// 1-based line in the source file.
    pub line: usize,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CsvTable {
    pub headers: HeaderIndex,
    pub rows: Vec<CsvRow>,
}

impl CsvTable {
    /// Cell value for `column`, or an empty string if the column is absent
    /// or the row is short.
    pub fn value<'a>(&self, row: &'a CsvRow, column: &str) -> &'a str {
        self.headers
            .position(column)
            .and_then(|idx| row.cells.get(idx))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Like [`CsvTable::value`] but `None` for blank cells.
    pub fn non_empty<'a>(&self, row: &'a CsvRow, column: &str) -> Option<&'a str> {
        let value = self.value(row, column);
        if value.is_empty() { None } else { Some(value) }
    }
}

/// Header names keyed case-insensitively; the first occurrence wins.
#[derive(Debug, Clone, Default)]
pub struct HeaderIndex {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl HeaderIndex {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = Self::default();
        for (idx, name) in names.into_iter().enumerate() {
            let name = normalize_header(name.as_ref());
            index.positions.entry(header_key(&name)).or_insert(idx);
            index.names.push(name);
        }
        index
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(&header_key(name)).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Required columns not present, in the order given.
    pub fn missing(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|name| !self.contains(name))
            .map(|name| (*name).to_string())
            .collect()
    }
}

fn header_key(name: &str) -> String {
    normalize_header(name).to_ascii_uppercase()
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Read a CSV file and validate that `required` columns are present.
///
/// # Errors
///
/// Returns [`IngestError::Csv`] when the file cannot be read or parsed and
/// [`IngestError::MissingColumns`] when the detected header lacks a required
/// column.
pub fn read_csv_table(
    path: &Path,
    table: TableKind,
    required: &[&str],
) -> Result<CsvTable, IngestError> {
    let reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| IngestError::csv(path, e))?;
    collect_table(reader, path, table, required)
}

/// Same as [`read_csv_table`] for an in-memory or streamed source.
pub fn read_csv_table_from_reader<R: Read>(
    source: R,
    table: TableKind,
    required: &[&str],
) -> Result<CsvTable, IngestError> {
    let reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(source);
    collect_table(reader, Path::new("<memory>"), table, required)
}

fn collect_table<R: Read>(
    mut reader: csv::Reader<R>,
    path: &Path,
    table: TableKind,
    required: &[&str],
) -> Result<CsvTable, IngestError> {
    let mut raw_rows: Vec<CsvRow> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| IngestError::csv(path, e))?;
        let cells: Vec<String> = record.iter().map(normalize_cell).collect();
        if cells.iter().all(String::is_empty) {
            continue;
        }
        let line = record
            .position()
            .map_or(raw_rows.len() + 1, |pos| pos.line() as usize);
        raw_rows.push(CsvRow { line, cells });
    }

    let header_at = locate_header(&raw_rows, required);
    let headers = raw_rows
        .get(header_at)
        .map(|row| HeaderIndex::new(&row.cells))
        .unwrap_or_default();
    let missing = headers.missing(required);
    if !missing.is_empty() {
        return Err(IngestError::MissingColumns {
            table,
            columns: missing,
        });
    }

    let rows = raw_rows.into_iter().skip(header_at + 1).collect();
    Ok(CsvTable { headers, rows })
}

/// Index of the header row: the probed row naming the most required
/// columns, earliest on ties.
fn locate_header(rows: &[CsvRow], required: &[&str]) -> usize {
    let mut best = (0usize, 0usize);
    for (idx, row) in rows.iter().take(HEADER_PROBE_ROWS).enumerate() {
        let index = HeaderIndex::new(&row.cells);
        let hits = required.iter().filter(|name| index.contains(name)).count();
        if hits == required.len() {
            return idx;
        }
        if hits > best.1 {
            best = (idx, hits);
        }
    }
    best.0
}
