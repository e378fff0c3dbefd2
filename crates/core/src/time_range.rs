//! Half-open time ranges.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::Timestamp;

/// A validated `[start, end)` interval with `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    start: Timestamp,
    end: Timestamp,
}

impl TimeRange {
    /// Build a range, rejecting empty or inverted intervals.
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self, CoreError> {
        if start >= end {
            return Err(CoreError::InvalidTimeRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Build a range from bounds the caller has already ordered.
    ///
    /// Inverted bounds are swapped and an empty range is widened by a second.
    pub(crate) fn spanning(a: Timestamp, b: Timestamp) -> Self {
        let (start, end) = if a <= b { (a, b) } else { (b, a) };
        let end = if start == end {
            end + chrono::Duration::seconds(1)
        } else {
            end
        };
        Self { start, end }
    }

    pub fn start(&self) -> Timestamp {
        self.start
    }

    pub fn end(&self) -> Timestamp {
        self.end
    }

    /// Whether an occupied interval conflicts with this range.
    ///
    /// Back-to-back intervals do not conflict and zero-length (or inverted)
    /// intervals never do.
    pub fn conflicts_with(&self, start: Timestamp, end: Timestamp) -> bool {
        start < end && start < self.end && end > self.start
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    use super::*;

    fn at(h: u32, m: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2025, 1, 20, h, m, 0).unwrap()
    }

    #[test]
    fn rejects_inverted_range() {
        assert_matches!(
            TimeRange::new(at(12, 0), at(10, 0)),
            Err(CoreError::InvalidTimeRange { .. })
        );
    }

    #[test]
    fn rejects_empty_range() {
        assert_matches!(
            TimeRange::new(at(10, 0), at(10, 0)),
            Err(CoreError::InvalidTimeRange { .. })
        );
    }

    #[test]
    fn back_to_back_is_free() {
        let query = TimeRange::new(at(10, 30), at(12, 0)).unwrap();
        assert!(!query.conflicts_with(at(9, 0), at(10, 30)));
        assert!(!query.conflicts_with(at(12, 0), at(13, 0)));
    }

    #[test]
    fn one_minute_overlap_conflicts() {
        let query = TimeRange::new(at(10, 29), at(12, 0)).unwrap();
        assert!(query.conflicts_with(at(9, 0), at(10, 30)));
    }

    #[test]
    fn zero_duration_never_conflicts() {
        let query = TimeRange::new(at(10, 0), at(12, 0)).unwrap();
        assert!(!query.conflicts_with(at(11, 0), at(11, 0)));
    }

    #[test]
    fn containing_interval_conflicts() {
        let query = TimeRange::new(at(10, 0), at(11, 0)).unwrap();
        assert!(query.conflicts_with(at(8, 0), at(18, 0)));
    }

    #[test]
    fn splitting_is_consistent() {
        // A room is free over [a, c) iff free over [a, b) and [b, c)
        // when no interval crosses b.
        let whole = TimeRange::new(at(8, 0), at(12, 0)).unwrap();
        let left = TimeRange::new(at(8, 0), at(10, 0)).unwrap();
        let right = TimeRange::new(at(10, 0), at(12, 0)).unwrap();
        let events = [(at(7, 0), at(8, 0)), (at(10, 0), at(10, 45))];

        let free = |r: &TimeRange| !events.iter().any(|(s, e)| r.conflicts_with(*s, *e));
        assert_eq!(free(&whole), free(&left) && free(&right));
    }
}
