//! Calendar-date parsing for spreadsheet exports.
//!
//! Exports carry dates as plain ISO dates, as ISO date-times with a zero
//! time part, or with slashes. Only the calendar date is kept.

use chrono::{NaiveDate, NaiveDateTime};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parse a calendar date, returning `None` for blank or unrecognized text.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use dispense_ingest::parse_date;
///
/// let expected = NaiveDate::from_ymd_opt(2023, 10, 15);
/// assert_eq!(parse_date("2023-10-15"), expected);
/// assert_eq!(parse_date("2023-10-15 00:00:00"), expected);
/// assert_eq!(parse_date("2023/10/15"), expected);
/// assert_eq!(parse_date("15 Oct"), None);
/// ```
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
                .map(|datetime| datetime.date())
        })
}
