//! Ingestion timetable: the job fires on minutes 0 and 30 of every hour (UTC).

use chrono::{Duration, DurationRound, Timelike};

use crate::types::Timestamp;

/// Cadence of the ingestion job.
pub const INTERVAL_MINUTES: i64 = 30;

/// The next firing instant at or after `now`.
pub fn next_run(now: Timestamp) -> Timestamp {
    let slot = Duration::minutes(INTERVAL_MINUTES);
    // duration_trunc only fails for out-of-range timestamps.
    let floor = now.duration_trunc(slot).unwrap_or(now);
    if floor == now {
        now
    } else {
        floor + slot
    }
}

/// The next firing instant strictly after `now`.
pub fn next_run_after(now: Timestamp) -> Timestamp {
    let next = next_run(now);
    if next == now {
        next + Duration::minutes(INTERVAL_MINUTES)
    } else {
        next
    }
}

/// Whether `t` sits exactly on a firing slot.
pub fn is_slot(t: Timestamp) -> bool {
    t.minute() % INTERVAL_MINUTES as u32 == 0 && t.second() == 0 && t.nanosecond() == 0
}
