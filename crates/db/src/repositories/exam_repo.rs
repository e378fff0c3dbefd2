//! Repository for the `exams` table and crowd verification.

use campus_core::exam::is_verified_count;
use campus_core::time_range::TimeRange;
use campus_core::types::DbId;
use sqlx::PgPool;

use crate::models::exam::{Exam, NewExam};

const SELECT: &str = "SELECT x.id, x.user_id, x.course_id, c.name AS course_name, \
    c.module_number, x.start_time, x.duration, x.room_id, r.room_number, x.is_verified, \
    x.created_at \
    FROM exams x JOIN courses c ON c.id = x.course_id LEFT JOIN rooms r ON r.id = x.room_id";

pub struct ExamRepo;

impl ExamRepo {
    /// Record an exam report and verify its group once enough users agree.
    ///
    /// Runs in one transaction that locks the course row, so concurrent
    /// reports for the same course serialize between the count and the
    /// group update. Returns `None` when the user already reported the same
    /// slot.
    pub async fn create_and_verify(
        pool: &PgPool,
        input: &NewExam,
    ) -> Result<Option<Exam>, sqlx::Error> {
        let duration = input.duration.minutes();
        let mut tx = pool.begin().await?;

        sqlx::query("SELECT id FROM courses WHERE id = $1 FOR UPDATE")
            .bind(input.course_id)
            .fetch_optional(&mut *tx)
            .await?;

        let duplicate: bool = sqlx::query_scalar(
            "SELECT EXISTS (
                 SELECT 1 FROM exams
                 WHERE user_id = $1 AND course_id = $2 AND start_time = $3 AND duration = $4)",
        )
        .bind(input.user_id)
        .bind(input.course_id)
        .bind(input.start_time)
        .bind(duration)
        .fetch_one(&mut *tx)
        .await?;
        if duplicate {
            return Ok(None);
        }

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO exams (user_id, course_id, start_time, duration, room_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(input.user_id)
        .bind(input.course_id)
        .bind(input.start_time)
        .bind(duration)
        .bind(input.room_id)
        .fetch_one(&mut *tx)
        .await?;

        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM exams WHERE course_id = $1 AND start_time = $2 AND duration = $3",
        )
        .bind(input.course_id)
        .bind(input.start_time)
        .bind(duration)
        .fetch_one(&mut *tx)
        .await?;

        if is_verified_count(count) {
            let verified = sqlx::query(
                "UPDATE exams SET is_verified = true
                 WHERE course_id = $1 AND start_time = $2 AND duration = $3 AND NOT is_verified",
            )
            .bind(input.course_id)
            .bind(input.start_time)
            .bind(duration)
            .execute(&mut *tx)
            .await?;
            tracing::info!(
                course_id = input.course_id,
                reports = count,
                newly_verified = verified.rows_affected(),
                "Exam slot verified"
            );
        }

        let query = format!("{SELECT} WHERE x.id = $1");
        let exam = sqlx::query_as::<_, Exam>(&query)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(exam))
    }

    /// All exams reported by a user, ordered by start.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Exam>, sqlx::Error> {
        let query = format!("{SELECT} WHERE x.user_id = $1 ORDER BY x.start_time");
        sqlx::query_as::<_, Exam>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// A user's exams starting within `range`.
    pub async fn list_for_user_between(
        pool: &PgPool,
        user_id: DbId,
        range: TimeRange,
    ) -> Result<Vec<Exam>, sqlx::Error> {
        let query = format!(
            "{SELECT} WHERE x.user_id = $1 AND x.start_time >= $2 AND x.start_time < $3
             ORDER BY x.start_time"
        );
        sqlx::query_as::<_, Exam>(&query)
            .bind(user_id)
            .bind(range.start())
            .bind(range.end())
            .fetch_all(pool)
            .await
    }

    /// Every report for a course, ordered by slot.
    pub async fn list_for_course(pool: &PgPool, course_id: DbId) -> Result<Vec<Exam>, sqlx::Error> {
        let query = format!(
            "{SELECT} WHERE x.course_id = $1 ORDER BY x.start_time, x.duration, x.id"
        );
        sqlx::query_as::<_, Exam>(&query)
            .bind(course_id)
            .fetch_all(pool)
            .await
    }

    /// Delete an exam report owned by `user_id`. Returns `true` if a row was removed.
    pub async fn delete_owned(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM exams WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
