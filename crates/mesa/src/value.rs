//! Cell values.
//!
//! Rows are open-ended maps, but every cell holds one of a closed set of
//! primitive values. Coercions to text, number and calendar date are the
//! ones search, sort and filter predicates rely on.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing or null value.
    #[default]
    Null,
    /// Boolean flag.
    Bool(bool),
    /// Any number.
    Number(f64),
    /// Free text.
    Text(String),
    /// Calendar date and time of day, without time zone.
    Date(NaiveDateTime),
}

const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

impl Value {
    /// Returns true for [`Value::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the text if this is a [`Value::Text`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Coerces the value to a number.
    ///
    /// Text is parsed after trimming; dates become epoch milliseconds.
    /// Null, blank text and unparsable text have no numeric value.
    #[must_use]
    pub fn to_number(&self) -> Option<f64> {
        let n = match self {
            Self::Null => return None,
            Self::Bool(b) => f64::from(u8::from(*b)),
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
            Self::Date(dt) => dt.and_utc().timestamp_millis() as f64,
        };
        (!n.is_nan()).then_some(n)
    }

    /// Coerces the value to a calendar date, ignoring the time of day.
    ///
    /// Text is accepted as RFC 3339, `YYYY-MM-DD`, or `YYYY-MM-DD HH:MM:SS`
    /// (with `T` or a space). Numbers are epoch milliseconds.
    #[must_use]
    pub fn to_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(dt) => Some(dt.date()),
            Self::Number(n) if n.is_finite() => {
                DateTime::from_timestamp_millis(*n as i64).map(|dt| dt.date_naive())
            }
            Self::Text(s) => parse_date(s.trim()),
            _ => None,
        }
    }

    /// Compares two values for sorting.
    ///
    /// The order is total: nulls first, then numeric-like values (booleans,
    /// numbers, dates) by numeric value, then text in code point order.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Date(a), Self::Date(b)) => a.cmp(b),
            _ if self.rank() != other.rank() => self.rank().cmp(&other.rank()),
            _ => {
                let a = self.to_number().unwrap_or(f64::NAN);
                let b = other.to_number().unwrap_or(f64::NAN);
                a.total_cmp(&b)
            }
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) | Self::Number(_) | Self::Date(_) => 1,
            Self::Text(_) => 2,
        }
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc().date());
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::Date(dt) if dt.num_seconds_from_midnight() == 0 && dt.nanosecond() == 0 => {
                write!(f, "{}", dt.format("%Y-%m-%d"))
            }
            Self::Date(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S")),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Self::Number(n as f64)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Self::Date(dt)
    }
}

impl From<NaiveDate> for Value {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date.and_time(chrono::NaiveTime::MIN))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map_or(Self::Null, Self::Number),
            serde_json::Value::String(s) => Self::Text(s),
            other => Self::Text(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::from(3).to_string(), "3");
        assert_eq!(Value::from(2.5).to_string(), "2.5");
        assert_eq!(Value::from("Ativo").to_string(), "Ativo");
        assert_eq!(Value::from(date(2024, 3, 9)).to_string(), "2024-03-09");
        let dt = date(2024, 3, 9).and_hms_opt(14, 5, 0).expect("valid time");
        assert_eq!(Value::from(dt).to_string(), "2024-03-09T14:05:00");
    }

    #[test]
    fn test_to_number() {
        assert_eq!(Value::from(" 42 ").to_number(), Some(42.0));
        assert_eq!(Value::from("4.5").to_number(), Some(4.5));
        assert_eq!(Value::from("abc").to_number(), None);
        assert_eq!(Value::from("").to_number(), None);
        assert_eq!(Value::Null.to_number(), None);
        assert_eq!(Value::from(true).to_number(), Some(1.0));
        assert_eq!(Value::Number(f64::NAN).to_number(), None);
    }

    #[test]
    fn test_to_date_ignores_time() {
        let expected = Some(date(2024, 1, 15));
        assert_eq!(Value::from("2024-01-15").to_date(), expected);
        assert_eq!(Value::from("2024-01-15T23:59:59").to_date(), expected);
        assert_eq!(Value::from("2024-01-15 08:00:00").to_date(), expected);
        assert_eq!(Value::from("2024-01-15T10:00:00Z").to_date(), expected);
        assert_eq!(Value::from(date(2024, 1, 15)).to_date(), expected);
        assert_eq!(Value::from("not a date").to_date(), None);
        assert_eq!(Value::from(true).to_date(), None);
    }

    #[test]
    fn test_to_date_from_epoch_millis() {
        assert_eq!(Value::from(0).to_date(), Some(date(1970, 1, 1)));
    }

    #[test]
    fn test_compare_same_kind() {
        assert_eq!(Value::from(1).compare(&Value::from(2)), Ordering::Less);
        assert_eq!(Value::from("b").compare(&Value::from("a")), Ordering::Greater);
        assert_eq!(Value::from("a").compare(&Value::from("a")), Ordering::Equal);
        assert_eq!(
            Value::from(date(2024, 1, 1)).compare(&Value::from(date(2023, 1, 1))),
            Ordering::Greater
        );
    }

    #[test]
    fn test_compare_mixed_kinds_is_total() {
        assert_eq!(Value::Null.compare(&Value::from(0)), Ordering::Less);
        assert_eq!(Value::from(99).compare(&Value::from("1")), Ordering::Less);
        assert_eq!(Value::from(false).compare(&Value::from(1)), Ordering::Less);
        assert_eq!(Value::Null.compare(&Value::Null), Ordering::Equal);
    }

    #[test]
    fn test_from_json() {
        let v: Value = serde_json::json!(12).into();
        assert_eq!(v, Value::Number(12.0));
        let v: Value = serde_json::json!(null).into();
        assert!(v.is_null());
        let v: Value = serde_json::json!(["a"]).into();
        assert_eq!(v.as_str(), Some("[\"a\"]"));
    }

    #[test]
    fn test_serde_untagged() {
        let values: Vec<Value> = serde_json::from_str(r#"[null, true, 3, "x"]"#).expect("parse");
        assert_eq!(
            values,
            vec![Value::Null, Value::Bool(true), Value::Number(3.0), Value::from("x")]
        );
    }
}
