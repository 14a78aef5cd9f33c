//! Date and timestamp parsing and formatting.
//!
//! Dates are externalized as `YYYY-MM-DD`. Stored expiry dates come in two
//! shapes: the plain date written on create and the midnight date-time
//! (`YYYY-MM-DDT00:00:00`) written on update. [`parse_date`] reads both.
//!
//! Timestamps are UTC. Inputs without an offset are taken to be UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// Format used for externalized dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format used for midnight date-times written on update.
pub const MIDNIGHT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Offset-less date-time shapes accepted in query parameters.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Errors that can occur when parsing or validating dates.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TemporalError {
    /// The input is not an ISO-8601 date or date-time.
    #[error("'{0}' is not an ISO-8601 date or date-time")]
    Unparseable(String),
    /// The date is not strictly after the reference day.
    #[error("date {date} must be after {today}")]
    NotInFuture {
        /// The rejected date.
        date: NaiveDate,
        /// The day it was checked against.
        today: NaiveDate,
    },
}

/// Parse a calendar date from `YYYY-MM-DD` or any accepted date-time form.
///
/// Date-times contribute their date in their own offset.
///
/// # Errors
///
/// Returns [`TemporalError::Unparseable`] if no accepted form matches.
///
/// ```
/// use chrono::NaiveDate;
/// use pantry_core::parse_date;
///
/// let expected = NaiveDate::from_ymd_opt(2030, 12, 31).unwrap();
/// assert_eq!(parse_date("2030-12-31").unwrap(), expected);
/// assert_eq!(parse_date("2030-12-31T00:00:00").unwrap(), expected);
/// assert!(parse_date("31/12/2030").is_err());
/// ```
pub fn parse_date(s: &str) -> Result<NaiveDate, TemporalError> {
    let s = s.trim();

    if let Ok(date) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }
    parse_naive_datetime(s)
        .map(|dt| dt.date())
        .ok_or_else(|| TemporalError::Unparseable(s.to_owned()))
}

/// Parse an instant from an RFC 3339 timestamp, an offset-less date-time, or
/// a bare date (taken as midnight).
///
/// # Errors
///
/// Returns [`TemporalError::Unparseable`] if no accepted form matches.
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>, TemporalError> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Some(dt) = parse_naive_datetime(s) {
        return Ok(dt.and_utc());
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| TemporalError::Unparseable(s.to_owned()))
}

fn parse_naive_datetime(s: &str) -> Option<NaiveDateTime> {
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

/// Format a date as `YYYY-MM-DD`.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Format a date as a midnight date-time, `YYYY-MM-DDT00:00:00`.
#[must_use]
pub fn format_midnight(date: NaiveDate) -> String {
    date.and_time(NaiveTime::MIN)
        .format(MIDNIGHT_FORMAT)
        .to_string()
}

/// Check that `date` falls strictly after `today`.
///
/// # Errors
///
/// Returns [`TemporalError::NotInFuture`] for `today` or any earlier day.
pub fn ensure_after(date: NaiveDate, today: NaiveDate) -> Result<NaiveDate, TemporalError> {
    if date > today {
        Ok(date)
    } else {
        Err(TemporalError::NotInFuture { date, today })
    }
}
