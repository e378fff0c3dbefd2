//! Imported timetable event model.

use campus_core::calendar::TimetableEntry;
use campus_core::change::TrackedEventFields;
use campus_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `timetable_events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TimetableEvent {
    pub id: DbId,
    pub tenant_id: DbId,
    pub zenturie_id: DbId,
    pub course_id: Option<DbId>,
    pub room_id: Option<DbId>,
    pub uid: String,
    pub summary: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub professor: Option<String>,
    pub course_type: Option<String>,
    pub course_code: Option<String>,
    pub color: Option<String>,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TimetableEvent {
    pub fn tracked(&self) -> TrackedEventFields<'_> {
        TrackedEventFields {
            zenturie_id: self.zenturie_id,
            summary: &self.summary,
            start_time: self.start_time,
            end_time: self.end_time,
            course_id: self.course_id,
            room_id: self.room_id,
            description: self.description.as_deref(),
            location: self.location.as_deref(),
            professor: self.professor.as_deref(),
            course_type: self.course_type.as_deref(),
            course_code: self.course_code.as_deref(),
        }
    }
}

impl From<TimetableEvent> for TimetableEntry {
    fn from(row: TimetableEvent) -> Self {
        TimetableEntry {
            id: row.id,
            uid: row.uid,
            summary: row.summary,
            description: row.description,
            location: row.location,
            professor: row.professor,
            course_type: row.course_type,
            course_code: row.course_code,
            color: row.color,
            start_time: row.start_time,
            end_time: row.end_time,
        }
    }
}

/// Candidate row built from a parsed feed event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTimetableEvent {
    pub tenant_id: DbId,
    pub zenturie_id: DbId,
    pub course_id: Option<DbId>,
    pub room_id: Option<DbId>,
    pub uid: String,
    pub summary: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub professor: Option<String>,
    pub course_type: Option<String>,
    pub course_code: Option<String>,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
}

impl NewTimetableEvent {
    pub fn tracked(&self) -> TrackedEventFields<'_> {
        TrackedEventFields {
            zenturie_id: self.zenturie_id,
            summary: &self.summary,
            start_time: self.start_time,
            end_time: self.end_time,
            course_id: self.course_id,
            room_id: self.room_id,
            description: self.description.as_deref(),
            location: self.location.as_deref(),
            professor: self.professor.as_deref(),
            course_type: self.course_type.as_deref(),
            course_code: self.course_code.as_deref(),
        }
    }
}
