//! Flight row normalization.
//!
//! Turns one raw CSV row into a [`FlightRecord`]. Column positions follow the
//! flight export the builder consumes: an index column, then year, month,
//! day, departure time, ..., airline name.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::records::FlightRecord;

/// Fixed column positions in the flight file.
pub mod columns {
    pub const YEAR: usize = 1;
    pub const MONTH: usize = 2;
    pub const DAY: usize = 3;
    pub const DEPARTURE_TIME: usize = 4;
    pub const ARRIVAL_TIME: usize = 7;
    pub const FLIGHT_NUMBER: usize = 11;
    pub const SOURCE_IATA: usize = 13;
    pub const DESTINATION_IATA: usize = 14;
    pub const AIR_TIME: usize = 15;
    pub const DISTANCE: usize = 16;
    pub const AIRLINE: usize = 20;

    /// Minimum number of fields a usable row has.
    pub const REQUIRED: usize = AIRLINE + 1;
}

/// Why a row could not be turned into a record at all.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RowError {
    #[error("row has {found} columns, expected at least {expected}")]
    TooShort { found: usize, expected: usize },

    #[error("missing airline name")]
    MissingAirline,
}

/// A non-blank field that could not be parsed and was left off the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: &'static str,
    pub value: String,
}

/// Output of [`normalize_row`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRow {
    pub record: FlightRecord,
    pub issues: Vec<FieldIssue>,
}

/// Convert an `hour*100+minute` time code to `HH:MM`.
///
/// Accepts integer or float text (`930`, `930.0`). Returns `None` for blank,
/// non-numeric, negative, or codes wider than four digits.
pub fn format_time(value: &str) -> Option<String> {
    let code = parse_number(value)?;
    if code < 0 {
        return None;
    }
    let digits = format!("{:04}", code);
    if digits.len() != 4 {
        return None;
    }
    Some(format!("{}:{}", &digits[..2], &digits[2..]))
}

/// Parse a whole number, truncating float text. `None` for blank or
/// unparseable input.
pub fn parse_number(value: &str) -> Option<i64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(n) = value.parse::<i64>() {
        return Some(n);
    }
    value
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(|f| f.trunc() as i64)
}

fn parse_date(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    let year = i32::try_from(parse_number(year)?).ok()?;
    let month = u32::try_from(parse_number(month)?).ok()?;
    let day = u32::try_from(parse_number(day)?).ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse an optional integer column, noting non-blank values that fail.
fn integer_field(value: &str, field: &'static str, issues: &mut Vec<FieldIssue>) -> Option<i64> {
    if value.trim().is_empty() {
        return None;
    }
    let parsed = parse_number(value);
    if parsed.is_none() {
        issues.push(FieldIssue {
            field,
            value: value.to_string(),
        });
    }
    parsed
}

/// Normalize one raw row.
pub fn normalize_row<S: AsRef<str>>(fields: &[S]) -> Result<NormalizedRow, RowError> {
    if fields.len() < columns::REQUIRED {
        return Err(RowError::TooShort {
            found: fields.len(),
            expected: columns::REQUIRED,
        });
    }
    let get = |i: usize| fields[i].as_ref();

    let airline = get(columns::AIRLINE);
    if airline.trim().is_empty() {
        return Err(RowError::MissingAirline);
    }

    let mut issues = Vec::new();
    let mut record = FlightRecord::new(
        get(columns::SOURCE_IATA).trim(),
        get(columns::DESTINATION_IATA).trim(),
        airline,
        get(columns::FLIGHT_NUMBER).trim(),
    );

    record.departure_time = format_time(get(columns::DEPARTURE_TIME));
    record.arrival_time = format_time(get(columns::ARRIVAL_TIME));
    record.duration_minutes = integer_field(get(columns::AIR_TIME), "air_time", &mut issues);
    record.distance = integer_field(get(columns::DISTANCE), "distance", &mut issues);
    record.date = parse_date(get(columns::YEAR), get(columns::MONTH), get(columns::DAY));

    Ok(NormalizedRow { record, issues })
}
