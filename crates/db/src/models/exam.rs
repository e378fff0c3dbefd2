//! Exam model.

use campus_core::calendar::ExamEntry;
use campus_core::exam::ExamDuration;
use campus_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An exam report joined with its course and room.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Exam {
    pub id: DbId,
    pub user_id: DbId,
    pub course_id: DbId,
    pub course_name: String,
    pub module_number: String,
    pub start_time: Timestamp,
    pub duration: i32,
    pub room_id: Option<DbId>,
    pub room_number: Option<String>,
    pub is_verified: bool,
    pub created_at: Timestamp,
}

impl From<Exam> for ExamEntry {
    fn from(row: Exam) -> Self {
        let end_time = row.start_time + chrono::Duration::minutes(i64::from(row.duration));
        ExamEntry {
            id: row.id,
            course_id: row.course_id,
            course_name: row.course_name,
            module_number: row.module_number,
            duration: row.duration,
            room_number: row.room_number,
            is_verified: row.is_verified,
            start_time: row.start_time,
            end_time,
        }
    }
}

/// Request body for reporting an exam.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateExam {
    pub course_id: DbId,
    pub start_time: Timestamp,
    pub duration: ExamDuration,
    pub room_number: Option<String>,
}

/// An exam report ready for insert.
#[derive(Debug, Clone)]
pub struct NewExam {
    pub user_id: DbId,
    pub course_id: DbId,
    pub start_time: Timestamp,
    pub duration: ExamDuration,
    pub room_id: Option<DbId>,
}
