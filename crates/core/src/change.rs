//! Change detection for imported timetable events.
//!
//! Re-ingesting a feed must not rewrite rows that did not change. Only the
//! fields in [`TrackedEventFields`] participate in the comparison.

use chrono::SubsecRound;

use crate::types::{DbId, Timestamp};

/// Outcome of reconciling one parsed event against the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Updated,
    Unchanged,
}

/// The subset of a timetable event that decides whether a row is rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedEventFields<'a> {
    pub zenturie_id: DbId,
    pub summary: &'a str,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub course_id: Option<DbId>,
    pub room_id: Option<DbId>,
    pub description: Option<&'a str>,
    pub location: Option<&'a str>,
    pub professor: Option<&'a str>,
    pub course_type: Option<&'a str>,
    pub course_code: Option<&'a str>,
}

impl TrackedEventFields<'_> {
    /// Whether any tracked field differs from `other`.
    ///
    /// Timestamps are compared at whole-second precision and a missing
    /// string equals an empty one.
    pub fn differs_from(&self, other: &TrackedEventFields<'_>) -> bool {
        self.zenturie_id != other.zenturie_id
            || self.summary != other.summary
            || self.start_time.trunc_subsecs(0) != other.start_time.trunc_subsecs(0)
            || self.end_time.trunc_subsecs(0) != other.end_time.trunc_subsecs(0)
            || self.course_id != other.course_id
            || self.room_id != other.room_id
            || !same_text(self.description, other.description)
            || !same_text(self.location, other.location)
            || !same_text(self.professor, other.professor)
            || !same_text(self.course_type, other.course_type)
            || !same_text(self.course_code, other.course_code)
    }
}

/// Null-aware string equality where `None` and `""` are equivalent.
pub fn same_text(a: Option<&str>, b: Option<&str>) -> bool {
    a.unwrap_or_default() == b.unwrap_or_default()
}
