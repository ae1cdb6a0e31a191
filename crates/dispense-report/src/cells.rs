//! Rendering polars values as output cells.

use polars::prelude::{AnyValue, DataFrame, PolarsResult};

/// Text form of a frame value. Nulls render empty and floats drop trailing
/// zeros, so a quantity of `4.0` reads `4`.
///
/// ```
/// use polars::prelude::AnyValue;
/// use dispense_report::cell_text;
///
/// assert_eq!(cell_text(AnyValue::Null), "");
/// assert_eq!(cell_text(AnyValue::Float64(2.5)), "2.5");
/// assert_eq!(cell_text(AnyValue::UInt32(7)), "7");
/// ```
pub fn cell_text(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_quantity(f64::from(v)),
        AnyValue::Float64(v) => format_quantity(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    }
}

pub fn format_quantity(value: f64) -> String {
    let text = format!("{value}");
    if !text.contains('.') {
        return text;
    }
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Column names and row cells of a frame, in frame order.
pub fn frame_rows(frame: &DataFrame) -> PolarsResult<(Vec<String>, Vec<Vec<String>>)> {
    let headers = frame
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    let mut rows = Vec::with_capacity(frame.height());
    for idx in 0..frame.height() {
        let mut row = Vec::with_capacity(frame.width());
        for column in frame.get_columns() {
            row.push(cell_text(column.get(idx)?));
        }
        rows.push(row);
    }
    Ok((headers, rows))
}
