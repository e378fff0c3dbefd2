//! Custom hour model.

use campus_core::calendar::CustomHourEntry;
use campus_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A custom hour joined with its room number.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CustomHour {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub room_id: Option<DbId>,
    pub room_number: Option<String>,
    pub custom_location: Option<String>,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub created_at: Timestamp,
}

impl From<CustomHour> for CustomHourEntry {
    fn from(row: CustomHour) -> Self {
        CustomHourEntry {
            id: row.id,
            title: row.title,
            description: row.description,
            room_number: row.room_number,
            custom_location: row.custom_location,
            start_time: row.start_time,
            end_time: row.end_time,
        }
    }
}

/// Request body for creating a custom hour.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCustomHour {
    pub title: String,
    pub description: Option<String>,
    pub room_number: Option<String>,
    pub custom_location: Option<String>,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
}

/// A validated custom hour ready for insert.
#[derive(Debug, Clone)]
pub struct NewCustomHour {
    pub user_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub room_id: Option<DbId>,
    pub custom_location: Option<String>,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
}
