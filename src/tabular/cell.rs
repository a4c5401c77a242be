//! Typed cell coercion
//!
//! Infers whether a raw field is empty, a number, a calendar date or free text.
//! Numbers are tried before dates, so `2024` and `20240101` are numbers.
//!
//! Accepted date shapes (anything else stays text):
//!
//! | Shape                              | Example                         |
//! |------------------------------------|---------------------------------|
//! | `YYYY-MM-DD`                       | `2024-03-05`                    |
//! | `YYYY/MM/DD`                       | `2024/03/05`                    |
//! | `MM/DD/YYYY`                       | `03/05/2024`                    |
//! | `YYYY-MM-DDTHH:MM:SS[.f]`          | `2024-03-05T10:00:00`           |
//! | `YYYY-MM-DD HH:MM:SS[.f]`          | `2024-03-05 10:00:00`           |
//! | RFC 3339 (converted to UTC)        | `2024-03-05T23:30:00-02:00`     |
//! | RFC 2822 (converted to UTC)        | `Tue, 5 Mar 2024 10:00:00 +0000`|
//! | `Month D, YYYY` / `Mon D, YYYY`    | `March 5, 2024`                 |
//! | `D Month YYYY` / `D Mon YYYY`      | `5 March 2024`                  |
//!
//! The year must be written with exactly four digits, so `12/31/99` and
//! `1/2/3` stay text.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use serde::{Serialize, Serializer};
use std::fmt;

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// A single typed table cell
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Date(NaiveDate),
    Text(String),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Convert a JSON value received from the analysis service.
    ///
    /// Strings are kept as text; the service has already typed its columns.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => CellValue::Empty,
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(CellValue::Number)
                .unwrap_or_else(|| CellValue::Text(n.to_string())),
            serde_json::Value::String(s) if s.is_empty() => CellValue::Empty,
            serde_json::Value::String(s) => CellValue::Text(s.clone()),
            serde_json::Value::Bool(b) => CellValue::Text(b.to_string()),
            other => CellValue::Text(other.to_string()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Empty => serializer.serialize_str(""),
            CellValue::Number(n) => serializer.serialize_f64(*n),
            CellValue::Date(d) => serializer.collect_str(&d.format("%Y-%m-%d")),
            CellValue::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// Coerce one trimmed field into a typed value.
pub fn coerce(field: &str) -> CellValue {
    if field.is_empty() {
        return CellValue::Empty;
    }
    if let Some(n) = parse_number(field) {
        return CellValue::Number(n);
    }
    if let Some(date) = parse_date(field) {
        return CellValue::Date(date);
    }
    CellValue::Text(field.to_string())
}

fn parse_number(field: &str) -> Option<f64> {
    // f64::from_str also accepts "inf" and "NaN" spellings
    if !field.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn parse_date(field: &str) -> Option<NaiveDate> {
    // The year is checked on the written value, before any UTC shift
    let zoned = [
        DateTime::parse_from_rfc3339(field),
        DateTime::parse_from_rfc2822(field),
    ];
    for dt in zoned.into_iter().flatten() {
        if has_four_digit_year(field, dt.year()) {
            return Some(dt.with_timezone(&Utc).date_naive());
        }
    }
    DATETIME_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDateTime::parse_from_str(field, fmt).ok())
        .map(|dt| dt.date())
        .chain(
            DATE_FORMATS
                .iter()
                .filter_map(|fmt| NaiveDate::parse_from_str(field, fmt).ok()),
        )
        .find(|date| has_four_digit_year(field, date.year()))
}

/// chrono's `%Y` accepts any digit count; only `YYYY` years count as dates.
fn has_four_digit_year(field: &str, year: i32) -> bool {
    (1000..=9999).contains(&year) && field.contains(&year.to_string())
}
