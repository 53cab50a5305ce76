//! Lenient parsing for values typed into forms or spreadsheet cells.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};

/// Parses a numeric cell, coercing blanks and garbage to zero.
pub fn coerce_number(raw: &str) -> f64 {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|ch| !matches!(ch, ',' | '%' | ' '))
        .collect();
    let unprefixed = cleaned.trim_start_matches(|ch: char| ch.is_ascii_alphabetic());
    let unprefixed = if unprefixed.len() == cleaned.len() {
        unprefixed
    } else {
        unprefixed.strip_prefix('.').unwrap_or(unprefixed)
    };

    unprefixed
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Interprets "Yes"/"true"/"1" style cells.
pub fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "yes" | "y" | "true" | "1"
    )
}

/// Accepts `YYYY-MM-DD`, `MM/DD/YYYY` and RFC 3339 timestamps.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%m/%d/%Y") {
        return Some(date);
    }

    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.date_naive())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
    Flag(bool),
}

pub(crate) fn deserialize_lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<NumberOrText>::deserialize(deserializer)?;
    Ok(match value {
        Some(NumberOrText::Number(number)) if number.is_finite() => number,
        Some(NumberOrText::Text(text)) => coerce_number(&text),
        _ => 0.0,
    })
}

pub(crate) fn deserialize_optional_lenient_number<'de, D>(
    deserializer: D,
) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<NumberOrText>::deserialize(deserializer)?;
    Ok(match value {
        Some(NumberOrText::Number(number)) if number.is_finite() => Some(number),
        Some(NumberOrText::Text(text)) if !text.trim().is_empty() => Some(coerce_number(&text)),
        Some(NumberOrText::Flag(_)) => Some(0.0),
        _ => None,
    })
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw {
        Some(value) if !value.trim().is_empty() => parse_date(&value)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{value}'"))),
        _ => Ok(None),
    }
}
