//! Room occupancy views.
//!
//! Occupancy merges imported timetable events with custom hours booked into
//! the same room. Custom hours are private to their owner, so they enter the
//! view only as a [`BlockedSlot`], which has no room for a title or
//! description.

use chrono::{Days, NaiveTime, TimeZone};
use serde::{Serialize, Serializer};

use crate::time_range::TimeRange;
use crate::types::{Timestamp, INSTITUTION_TZ};

/// Length of the occupancy window in days.
pub const WINDOW_DAYS: u64 = 7;

/// Always serializes as `null`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Redacted;

impl Serialize for Redacted {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_none()
    }
}

/// A timetable event as it appears in an occupancy view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimetableSlot {
    pub start: Timestamp,
    pub end: Timestamp,
    pub details: String,
}

impl TimetableSlot {
    /// Details are the summary, followed by `" (professor)"` when known.
    pub fn new(start: Timestamp, end: Timestamp, summary: &str, professor: Option<&str>) -> Self {
        let details = match professor.filter(|p| !p.trim().is_empty()) {
            Some(professor) => format!("{summary} ({professor})"),
            None => summary.to_string(),
        };
        Self {
            start,
            end,
            details,
        }
    }
}

/// A custom hour reduced to the time it blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockedSlot {
    pub start: Timestamp,
    pub end: Timestamp,
    details: Redacted,
}

impl BlockedSlot {
    pub fn new(start: Timestamp, end: Timestamp) -> Self {
        Self {
            start,
            end,
            details: Redacted,
        }
    }
}

/// One row of an occupancy view: `{event_type, start, end, details}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum OccupancyEntry {
    Timetable(TimetableSlot),
    CustomHourBlocked(BlockedSlot),
}

impl OccupancyEntry {
    pub fn start(&self) -> Timestamp {
        match self {
            OccupancyEntry::Timetable(slot) => slot.start,
            OccupancyEntry::CustomHourBlocked(slot) => slot.start,
        }
    }
}

/// Merge both sources into one list ordered by start time.
///
/// Ties keep timetable entries first.
pub fn merge(timetable: Vec<TimetableSlot>, blocked: Vec<BlockedSlot>) -> Vec<OccupancyEntry> {
    let mut entries: Vec<OccupancyEntry> = timetable
        .into_iter()
        .map(OccupancyEntry::Timetable)
        .chain(blocked.into_iter().map(OccupancyEntry::CustomHourBlocked))
        .collect();
    entries.sort_by_key(OccupancyEntry::start);
    entries
}

/// The seven-day window starting at local midnight of the day containing `now`.
pub fn window(now: Timestamp) -> TimeRange {
    let local_day = now.with_timezone(&INSTITUTION_TZ).date_naive();
    let start = local_midnight_utc(local_day).unwrap_or(now);
    let end = local_day
        .checked_add_days(Days::new(WINDOW_DAYS))
        .and_then(local_midnight_utc)
        .unwrap_or(start + chrono::Duration::days(WINDOW_DAYS as i64));

    TimeRange::spanning(start, end)
}

fn local_midnight_utc(day: chrono::NaiveDate) -> Option<Timestamp> {
    INSTITUTION_TZ
        .from_local_datetime(&day.and_time(NaiveTime::MIN))
        .earliest()
        .map(|t| t.with_timezone(&chrono::Utc))
}
