//! Row-to-entity parsing helpers for the memory backend.
//!
//! Converting `libsql::Row` (column-indexed) into typed entities needs the
//! same handful of conversions everywhere. These helpers isolate them and
//! handle the dual datetime format issue (`SQLite`'s `datetime('now')` vs
//! Rust's `to_rfc3339()`).

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::BackendError;

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// Handles both RFC 3339 (`"2026-02-09T14:30:00+00:00"`) and `SQLite`'s
/// default format (`"2026-02-09 14:30:00"`).
///
/// # Errors
///
/// Returns `BackendError::Query` if the string parses as neither format.
pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, BackendError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| BackendError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Parse an optional TEXT column as `Option<DateTime<Utc>>`.
///
/// # Errors
///
/// Returns `BackendError::Query` if a non-empty string cannot be parsed.
pub(crate) fn parse_optional_datetime(
    s: Option<&str>,
) -> Result<Option<DateTime<Utc>>, BackendError> {
    match s {
        Some(s) if !s.is_empty() => Ok(Some(parse_datetime(s)?)),
        _ => Ok(None),
    }
}

/// Parse a TEXT column into a serde-deserializable enum.
///
/// Works with all tally-core enums that use `#[serde(rename_all = "snake_case")]`.
///
/// # Errors
///
/// Returns `BackendError::Query` if the string matches no variant.
pub(crate) fn parse_enum<T: DeserializeOwned>(s: &str) -> Result<T, BackendError> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| BackendError::Query(format!("Failed to parse enum from '{s}': {e}")))
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty
/// string.
///
/// `row.get::<String>(idx)` on a NULL column returns an error, not `""`;
/// nullable columns must go through `get::<Option<String>>()`.
///
/// # Errors
///
/// Returns `BackendError` if the column read fails.
pub(crate) fn get_opt_string(
    row: &libsql::Row,
    idx: i32,
) -> Result<Option<String>, BackendError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// Decode a JSON TEXT column into a typed value.
///
/// # Errors
///
/// Returns `BackendError::Query` naming the column on invalid JSON.
pub(crate) fn parse_json<T: DeserializeOwned>(s: &str, column: &str) -> Result<T, BackendError> {
    serde_json::from_str(s)
        .map_err(|e| BackendError::Query(format!("Invalid JSON in column {column}: {e}")))
}

/// Encode a value into a JSON TEXT column.
///
/// # Errors
///
/// Returns `BackendError::Query` naming the column if serialization fails.
pub(crate) fn to_json<T: Serialize>(value: &T, column: &str) -> Result<String, BackendError> {
    serde_json::to_string(value)
        .map_err(|e| BackendError::Query(format!("Failed to serialize column {column}: {e}")))
}
