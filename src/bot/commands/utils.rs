//! Shared input parsing for the wizard commands.

use crate::errors::{Error, Result};
use chrono::{DateTime, NaiveDateTime, Utc};

/// Format accepted for date/time parameters.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Parses a `YYYY-MM-DD HH:MM` string as a UTC timestamp.
pub fn parse_datetime_utc(field: &str, value: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value.trim(), DATETIME_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| Error::InvalidField {
            field: field.to_string(),
            message: format!("expected `{DATETIME_FORMAT}` (UTC), got \"{value}\""),
        })
}

/// Parses a comma-separated list of reminder lead times in minutes.
pub fn parse_reminder_list(value: &str) -> Result<Vec<i64>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i64>().map_err(|_| Error::InvalidField {
                field: "reminders".to_string(),
                message: format!("\"{part}\" is not a number of minutes"),
            })
        })
        .collect()
}
