//! Repository for the `rooms` table, including the free-room search and the
//! occupancy view.

use campus_core::occupancy::{BlockedSlot, TimetableSlot};
use campus_core::time_range::TimeRange;
use campus_core::types::{DbId, Timestamp};
use sqlx::{FromRow, PgPool};

use crate::models::room::{NewRoom, Room};

const COLUMNS: &str = "id, tenant_id, room_number, building, floor, display_name, created_at";

pub struct RoomRepo;

#[derive(FromRow)]
struct TimetableSlotRow {
    summary: String,
    professor: Option<String>,
    start_time: Timestamp,
    end_time: Timestamp,
}

#[derive(FromRow)]
struct BlockedSlotRow {
    start_time: Timestamp,
    end_time: Timestamp,
}

impl RoomRepo {
    /// All rooms of a tenant ordered by number.
    pub async fn list(pool: &PgPool, tenant_id: DbId) -> Result<Vec<Room>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM rooms WHERE tenant_id = $1 ORDER BY room_number");
        sqlx::query_as::<_, Room>(&query)
            .bind(tenant_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_number(
        pool: &PgPool,
        tenant_id: DbId,
        room_number: &str,
    ) -> Result<Option<Room>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM rooms WHERE tenant_id = $1 AND room_number = $2");
        sqlx::query_as::<_, Room>(&query)
            .bind(tenant_id)
            .bind(room_number)
            .fetch_optional(pool)
            .await
    }

    /// Return the room for `input.room_number`, inserting it on first sight.
    pub async fn create_if_missing(pool: &PgPool, input: &NewRoom) -> Result<Room, sqlx::Error> {
        let query = format!(
            "INSERT INTO rooms (tenant_id, room_number, building, floor, display_name)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT ON CONSTRAINT uq_rooms_tenant_number
             DO UPDATE SET room_number = EXCLUDED.room_number
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Room>(&query)
            .bind(input.tenant_id)
            .bind(&input.room_number)
            .bind(&input.building)
            .bind(input.floor)
            .bind(&input.display_name)
            .fetch_one(pool)
            .await
    }

    /// Rooms with no timetable event and no custom hour overlapping `range`.
    ///
    /// Intervals are half-open, so an event ending exactly at the range start
    /// does not block the room. Zero-length events never block.
    pub async fn list_free(
        pool: &PgPool,
        tenant_id: DbId,
        range: TimeRange,
    ) -> Result<Vec<Room>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM rooms r
             WHERE r.tenant_id = $1
               AND NOT EXISTS (
                   SELECT 1 FROM timetable_events e
                   WHERE e.room_id = r.id
                     AND e.start_time < $3 AND e.end_time > $2
                     AND e.start_time < e.end_time)
               AND NOT EXISTS (
                   SELECT 1 FROM custom_hours c
                   WHERE c.room_id = r.id
                     AND c.start_time < $3 AND c.end_time > $2
                     AND c.start_time < c.end_time)
             ORDER BY r.room_number"
        );
        sqlx::query_as::<_, Room>(&query)
            .bind(tenant_id)
            .bind(range.start())
            .bind(range.end())
            .fetch_all(pool)
            .await
    }

    /// Timetable slots and blocked custom-hour slots of a room within `range`.
    ///
    /// The custom-hour query never selects title or description.
    pub async fn occupancy(
        pool: &PgPool,
        room_id: DbId,
        range: TimeRange,
    ) -> Result<(Vec<TimetableSlot>, Vec<BlockedSlot>), sqlx::Error> {
        let timetable = sqlx::query_as::<_, TimetableSlotRow>(
            "SELECT summary, professor, start_time, end_time FROM timetable_events
             WHERE room_id = $1 AND start_time < $3 AND end_time > $2
             ORDER BY start_time",
        )
        .bind(room_id)
        .bind(range.start())
        .bind(range.end())
        .fetch_all(pool)
        .await?;

        let blocked = sqlx::query_as::<_, BlockedSlotRow>(
            "SELECT start_time, end_time FROM custom_hours
             WHERE room_id = $1 AND start_time < $3 AND end_time > $2
             ORDER BY start_time",
        )
        .bind(room_id)
        .bind(range.start())
        .bind(range.end())
        .fetch_all(pool)
        .await?;

        Ok((
            timetable
                .into_iter()
                .map(|r| TimetableSlot::new(r.start_time, r.end_time, &r.summary, r.professor.as_deref()))
                .collect(),
            blocked
                .into_iter()
                .map(|r| BlockedSlot::new(r.start_time, r.end_time))
                .collect(),
        ))
    }
}
