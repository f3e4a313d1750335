//! Sanitizing raw record fields into numbers and calendar dates.
//!
//! Every component that reads a metric goes through [`parse_value`] so a
//! missing or garbled field is always `None` and never silently zero.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Display format for chart labels, e.g. `15/06/24`.
pub const LABEL_FORMAT: &str = "%d/%m/%y";

/// Parse a raw field into a number.
///
/// `null`, empty strings, non-numeric strings, booleans, arrays and objects
/// all yield `None`. Numeric strings are trimmed before parsing. Negative and
/// fractional values are accepted as is.
pub fn parse_value(raw: &Value) -> Option<f64> {
    match raw {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_str(s),
        _ => None,
    }
}

/// Parse a textual field into a number. See [`parse_value`].
pub fn parse_str(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    // `f64::from_str` accepts "NaN" and "inf", neither of which is a measurement.
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Drop non-finite numbers that may have been constructed in code.
pub fn sanitize(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Serde adapter for optional numeric fields that may arrive as strings.
pub fn lenient<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(parse_value(&raw))
}

/// Text content of a raw field. Numbers are rendered as text, anything else
/// (`null`, booleans, arrays, objects) has no text.
fn text_of(raw: Value) -> Option<String> {
    match raw {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Serde adapter for text fields such as dates and names. A field without
/// usable text becomes an empty string, so a bad date leaves the entry
/// undated instead of failing the whole document.
pub fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(text_of(raw).unwrap_or_default())
}

/// Same as [`lenient_text`] for optional text such as an end date or a
/// dose. Blank text is `None`.
pub fn lenient_opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(text_of(raw).filter(|s| !s.trim().is_empty()))
}

/// Parse a calendar date.
///
/// Accepts `YYYY-MM-DD` as well as full timestamps (RFC 3339 or naive
/// `YYYY-MM-DDTHH:MM:SS`), in which case only the date part is kept.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
}

/// Compact label used on chart axes.
pub fn format_label(date: NaiveDate) -> String {
    date.format(LABEL_FORMAT).to_string()
}
