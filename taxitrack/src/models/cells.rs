//! Serde adapters for values read back from spreadsheet cells.
//!
//! A sheet does not preserve the JSON type a value was written with: phone
//! numbers and IDs come back as numbers, empty cells come back as `""`, dates
//! come back as full ISO timestamps and booleans sometimes as `"TRUE"`. Each
//! adapter accepts every shape we have seen and normalises it.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;

fn value_to_string(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Text cell; numbers and booleans are rendered, null is empty.
pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(value_to_string(Value::deserialize(d)?))
}

/// Optional text cell; an empty cell is `None`.
pub fn opt_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let s = value_to_string(Value::deserialize(d)?);
    Ok(if s.is_empty() { None } else { Some(s) })
}

/// Money or quantity cell; an empty cell is zero.
pub fn decimal<'de, D: Deserializer<'de>>(d: D) -> Result<Decimal, D::Error> {
    match Value::deserialize(d)? {
        Value::Null => Ok(Decimal::ZERO),
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .map_err(D::Error::custom),
        Value::String(s) if s.trim().is_empty() => Ok(Decimal::ZERO),
        Value::String(s) => Decimal::from_str(s.trim()).map_err(D::Error::custom),
        other => Err(D::Error::custom(format!("expected a number, got {}", other))),
    }
}

/// Integer cell (sort orders); an empty cell is zero.
pub fn int<'de, D: Deserializer<'de>>(d: D) -> Result<i32, D::Error> {
    match Value::deserialize(d)? {
        Value::Null => Ok(0),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .map(|v| v as i32)
            .ok_or_else(|| D::Error::custom("sort order out of range")),
        Value::String(s) if s.trim().is_empty() => Ok(0),
        Value::String(s) => s.trim().parse().map_err(D::Error::custom),
        other => Err(D::Error::custom(format!("expected an integer, got {}", other))),
    }
}

/// Boolean cell: `true`, `"TRUE"`, `"yes"`, `1`. Anything else is false.
pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "yes" | "1"),
        _ => false,
    })
}

/// Like [`flag`] but an empty cell means true (used for `is_active`).
pub fn flag_default_true<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Null => true,
        Value::String(s) if s.trim().is_empty() => true,
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "yes" | "1"),
        _ => false,
    })
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}

pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.and_utc())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc())
        })
}

/// Stand-in for a blank required timestamp cell: the Unix epoch.
pub fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::default()
}

/// Stand-in for a blank required date cell: 1970-01-01.
pub fn epoch_date() -> NaiveDate {
    epoch().date_naive()
}

/// Calendar date cell; accepts `YYYY-MM-DD` or a full timestamp. A blank
/// cell reads as [`epoch_date`] so one hand-edited row cannot sink the sheet.
pub fn date<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
    let raw = value_to_string(Value::deserialize(d)?);
    if raw.trim().is_empty() {
        return Ok(epoch_date());
    }
    parse_date(&raw).ok_or_else(|| D::Error::custom(format!("invalid date '{}'", raw)))
}

/// Optional calendar date cell; an empty cell is `None`.
pub fn opt_date<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
    let raw = value_to_string(Value::deserialize(d)?);
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_date(&raw)
        .map(Some)
        .ok_or_else(|| D::Error::custom(format!("invalid date '{}'", raw)))
}

/// Timestamp cell; a bare date is midnight UTC, a blank cell is [`epoch`].
pub fn timestamp<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = value_to_string(Value::deserialize(d)?);
    if raw.trim().is_empty() {
        return Ok(epoch());
    }
    parse_timestamp(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp '{}'", raw)))
}

/// Optional timestamp cell; an empty cell is `None`.
pub fn opt_timestamp<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateTime<Utc>>, D::Error> {
    let raw = value_to_string(Value::deserialize(d)?);
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_timestamp(&raw)
        .map(Some)
        .ok_or_else(|| D::Error::custom(format!("invalid timestamp '{}'", raw)))
}
