//! Repository for the `custom_hours` table.

use campus_core::time_range::TimeRange;
use campus_core::types::DbId;
use sqlx::PgPool;

use crate::models::custom_hour::{CustomHour, NewCustomHour};

const SELECT: &str = "SELECT c.id, c.user_id, c.title, c.description, c.room_id, \
    r.room_number, c.custom_location, c.start_time, c.end_time, c.created_at \
    FROM custom_hours c LEFT JOIN rooms r ON r.id = c.room_id";

pub struct CustomHourRepo;

impl CustomHourRepo {
    pub async fn create(pool: &PgPool, input: &NewCustomHour) -> Result<CustomHour, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO custom_hours
                (user_id, title, description, room_id, custom_location, start_time, end_time)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id",
        )
        .bind(input.user_id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.room_id)
        .bind(&input.custom_location)
        .bind(input.start_time)
        .bind(input.end_time)
        .fetch_one(pool)
        .await?;

        let query = format!("{SELECT} WHERE c.id = $1");
        sqlx::query_as::<_, CustomHour>(&query)
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// The user's custom hours overlapping `range`, ordered by start.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        range: TimeRange,
    ) -> Result<Vec<CustomHour>, sqlx::Error> {
        let query = format!(
            "{SELECT} WHERE c.user_id = $1 AND c.start_time < $3 AND c.end_time > $2
             ORDER BY c.start_time"
        );
        sqlx::query_as::<_, CustomHour>(&query)
            .bind(user_id)
            .bind(range.start())
            .bind(range.end())
            .fetch_all(pool)
            .await
    }

    /// Delete a custom hour owned by `user_id`. Returns `true` if a row was removed.
    pub async fn delete_owned(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM custom_hours WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
