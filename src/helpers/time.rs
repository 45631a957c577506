use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

const CALENDAR_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateParseError {
    #[error("'{value}' is not an RFC3339 timestamp: {reason}")]
    Rfc3339 { value: String, reason: String },
    #[error("'{value}' is neither a YYYY-MM-DD date nor an RFC3339 timestamp")]
    UnsupportedFormat { value: String },
}

pub fn parse_rfc3339(value: &str) -> Result<DateTime<Utc>, DateParseError> {
    DateTime::parse_from_rfc3339(value)
        .map(|date_time| date_time.with_timezone(&Utc))
        .map_err(|e| DateParseError::Rfc3339 {
            value: value.to_owned(),
            reason: e.to_string(),
        })
}

/// Bare calendar date at UTC midnight, falling back to RFC3339.
pub fn parse_date_or_rfc3339(value: &str) -> Result<DateTime<Utc>, DateParseError> {
    Some(value)
        .filter(|value| is_zero_padded_date(value))
        .and_then(|value| NaiveDate::parse_from_str(value, CALENDAR_DATE_FORMAT).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .or_else(|| parse_rfc3339(value).ok())
        .ok_or_else(|| DateParseError::UnsupportedFormat {
            value: value.to_owned(),
        })
}

/// Exactly `dddd-dd-dd`. chrono alone also takes `2024-6-1`, a sign or
/// leading whitespace.
fn is_zero_padded_date(value: &str) -> bool {
    value.len() == 10
        && value.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Seconds since epoch with the sub-second part kept as a fraction.
pub fn epoch_seconds(date_time: &DateTime<Utc>) -> f64 {
    date_time.timestamp() as f64 + f64::from(date_time.timestamp_subsec_nanos()) / 1e9
}
