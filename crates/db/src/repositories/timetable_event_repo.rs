//! Repository for the `timetable_events` table.

use campus_core::time_range::TimeRange;
use campus_core::types::DbId;
use sqlx::PgPool;

use crate::models::timetable_event::{NewTimetableEvent, TimetableEvent};

const COLUMNS: &str = "id, tenant_id, zenturie_id, course_id, room_id, uid, summary, description, \
    location, professor, course_type, course_code, color, start_time, end_time, created_at, \
    updated_at";

pub struct TimetableEventRepo;

impl TimetableEventRepo {
    /// Find the event imported for `uid` in a cohort.
    pub async fn find_by_uid(
        pool: &PgPool,
        zenturie_id: DbId,
        uid: &str,
    ) -> Result<Option<TimetableEvent>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM timetable_events WHERE uid = $1 AND zenturie_id = $2");
        sqlx::query_as::<_, TimetableEvent>(&query)
            .bind(uid)
            .bind(zenturie_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn insert(
        pool: &PgPool,
        input: &NewTimetableEvent,
    ) -> Result<TimetableEvent, sqlx::Error> {
        let query = format!(
            "INSERT INTO timetable_events
                (tenant_id, zenturie_id, course_id, room_id, uid, summary, description,
                 location, professor, course_type, course_code, start_time, end_time)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TimetableEvent>(&query)
            .bind(input.tenant_id)
            .bind(input.zenturie_id)
            .bind(input.course_id)
            .bind(input.room_id)
            .bind(&input.uid)
            .bind(&input.summary)
            .bind(&input.description)
            .bind(&input.location)
            .bind(&input.professor)
            .bind(&input.course_type)
            .bind(&input.course_code)
            .bind(input.start_time)
            .bind(input.end_time)
            .fetch_one(pool)
            .await
    }

    /// Overwrite every tracked field of an existing event in one statement.
    pub async fn update_tracked(
        pool: &PgPool,
        id: DbId,
        input: &NewTimetableEvent,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE timetable_events SET
                zenturie_id = $2, course_id = $3, room_id = $4, summary = $5,
                description = $6, location = $7, professor = $8, course_type = $9,
                course_code = $10, start_time = $11, end_time = $12, updated_at = now()
             WHERE id = $1",
        )
        .bind(id)
        .bind(input.zenturie_id)
        .bind(input.course_id)
        .bind(input.room_id)
        .bind(&input.summary)
        .bind(&input.description)
        .bind(&input.location)
        .bind(&input.professor)
        .bind(&input.course_type)
        .bind(&input.course_code)
        .bind(input.start_time)
        .bind(input.end_time)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Events of a cohort overlapping `range`, ordered by start.
    pub async fn list_for_zenturie(
        pool: &PgPool,
        zenturie_id: DbId,
        range: TimeRange,
    ) -> Result<Vec<TimetableEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM timetable_events
             WHERE zenturie_id = $1 AND start_time < $3 AND end_time > $2
             ORDER BY start_time"
        );
        sqlx::query_as::<_, TimetableEvent>(&query)
            .bind(zenturie_id)
            .bind(range.start())
            .bind(range.end())
            .fetch_all(pool)
            .await
    }
}
