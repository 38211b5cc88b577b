//! Civil-day and instant helpers.
//!
//! Sessions are bucketed into calendar days of a fixed reference zone
//! (the study runs on US Pacific time), and reward instants are rendered
//! as RFC 3339 strings carrying that zone's offset.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use chrono_tz::Tz;

use crate::errors::CoreError;

/// The "start of time" cursor: everything is newer than this.
pub const EPOCH: DateTime<Utc> = DateTime::UNIX_EPOCH;

/// Convert seconds since the epoch into a UTC instant.
///
/// # Errors
///
/// Returns `CoreError::Validation` if the value is outside chrono's range.
pub fn instant_from_unix(secs: i64) -> Result<DateTime<Utc>, CoreError> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| CoreError::Validation(format!("timestamp {secs} out of range")))
}

/// Calendar date of `instant` in the reference zone.
#[must_use]
pub fn civil_day(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Render an instant as `2024-03-09T09:00:00-08:00` in the reference zone.
#[must_use]
pub fn render_instant(instant: DateTime<Utc>, tz: Tz) -> String {
    instant
        .with_timezone(&tz)
        .to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Parse an RFC 3339 instant with any offset.
///
/// # Errors
///
/// Returns `CoreError::Validation` if `s` is not RFC 3339.
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>, CoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| CoreError::Validation(format!("invalid instant '{s}': {e}")))
}

/// Compact `YYYYMMDD` form used for progress completion markers.
#[must_use]
pub fn compact_date(day: NaiveDate) -> String {
    day.format("%Y%m%d").to_string()
}
