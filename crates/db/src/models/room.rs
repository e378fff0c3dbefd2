//! Room model.

use campus_core::room::parse_room_number;
use campus_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `rooms` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Room {
    pub id: DbId,
    pub tenant_id: DbId,
    pub room_number: String,
    pub building: Option<String>,
    pub floor: Option<i32>,
    pub display_name: Option<String>,
    pub created_at: Timestamp,
}

/// Input for lazily registering a room seen in a feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRoom {
    pub tenant_id: DbId,
    pub room_number: String,
    pub building: Option<String>,
    pub floor: Option<i32>,
    pub display_name: Option<String>,
}

impl NewRoom {
    /// Derive building and floor from the room number.
    pub fn new(tenant_id: DbId, room_number: &str, display_name: Option<&str>) -> Self {
        let location = parse_room_number(room_number);
        Self {
            tenant_id,
            room_number: room_number.to_string(),
            building: location.building,
            floor: location.floor,
            display_name: display_name.map(str::to_string),
        }
    }
}
