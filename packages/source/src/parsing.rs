//! Shared parsing utilities for raw open-data records.
//!
//! Coordinates and dates arrive as loosely typed JSON: numbers, numeric
//! strings, or date strings in whatever format the portal exported.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Date-time formats accepted for source dates, tried in order.
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Date-only formats accepted for source dates, tried in order. Parsed as
/// UTC midnight.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];

/// Parses a coordinate from a JSON number or numeric string.
///
/// Returns `None` for non-numeric, non-finite, or zero values. Zero is
/// what the portal exports for records that were never geocoded.
#[must_use]
pub fn parse_coordinate(value: &serde_json::Value) -> Option<f64> {
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_f64()?,
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !parsed.is_finite() || parsed == 0.0 {
        return None;
    }
    Some(parsed)
}

/// Parses a source date string.
///
/// Accepts RFC 3339, ISO 8601 date-times with or without fractional
/// seconds (naive values are taken as UTC), and a few date-only layouts.
#[must_use]
pub fn parse_incident_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
        }
    }
    None
}

/// Renders a scalar JSON value as text. Strings are returned as-is,
/// numbers and booleans via their JSON representation.
#[must_use]
pub fn value_as_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
