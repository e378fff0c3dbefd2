//! DATE and DATE-TIME values.
//!
//! - `20250120T080000Z` -- UTC.
//! - `20250120T090000` -- floating, interpreted in the institution's timezone.
//! - `20250120` -- a calendar date, midnight in the institution's timezone.
//!
//! `TZID` parameters are discarded by the lexer; feeds from the institution
//! only ever use its own zone.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::types::{Timestamp, INSTITUTION_TZ};

const UTC_FORMAT: &str = "%Y%m%dT%H%M%SZ";
const LOCAL_FORMAT: &str = "%Y%m%dT%H%M%S";
const DATE_FORMAT: &str = "%Y%m%d";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("malformed date-time '{0}'")]
    Malformed(String),

    #[error("local time '{0}' does not exist in the institution's timezone")]
    NonexistentLocal(String),
}

/// Parse a DATE or DATE-TIME value into UTC.
pub fn parse(value: &str) -> Result<Timestamp, TimeParseError> {
    let value = value.trim();

    if value.ends_with('Z') {
        return NaiveDateTime::parse_from_str(value, UTC_FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(|_| TimeParseError::Malformed(value.to_string()));
    }

    let naive = if value.len() == 8 {
        NaiveDate::parse_from_str(value, DATE_FORMAT)
            .map(|date| date.and_time(NaiveTime::MIN))
            .map_err(|_| TimeParseError::Malformed(value.to_string()))?
    } else {
        NaiveDateTime::parse_from_str(value, LOCAL_FORMAT)
            .map_err(|_| TimeParseError::Malformed(value.to_string()))?
    };

    resolve_local(naive).ok_or_else(|| TimeParseError::NonexistentLocal(value.to_string()))
}

/// Convert an institution-local wall time to UTC.
///
/// Ambiguous times (the repeated hour in autumn) resolve to the earlier
/// instant. Times inside the spring-forward gap move one hour ahead, so
/// 02:30 on the changeover day becomes 03:30 summer time.
fn resolve_local(naive: NaiveDateTime) -> Option<Timestamp> {
    let local = match INSTITUTION_TZ.from_local_datetime(&naive) {
        LocalResult::Single(t) => t,
        LocalResult::Ambiguous(earlier, _) => earlier,
        LocalResult::None => INSTITUTION_TZ
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()?,
    };
    Some(local.with_timezone(&Utc))
}

/// The timestamp used when a value cannot be parsed.
pub fn zero() -> Timestamp {
    DateTime::UNIX_EPOCH
}

/// Parse a value, logging and falling back to [`zero`] on failure.
pub fn parse_or_zero(value: &str, property: &str) -> Timestamp {
    parse(value).unwrap_or_else(|e| {
        tracing::warn!(property, error = %e, "Unparseable calendar time, using zero timestamp");
        zero()
    })
}

/// Format a timestamp as a UTC DATE-TIME (`YYYYMMDDTHHMMSSZ`).
pub fn format_utc(t: Timestamp) -> String {
    t.format(UTC_FORMAT).to_string()
}
