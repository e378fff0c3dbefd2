//! Handlers for the `/rooms` resource.
//!
//! Free-room search and the per-room occupancy view.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use campus_core::error::CoreError;
use campus_core::occupancy::{self, OccupancyEntry};
use campus_core::types::Timestamp;
use campus_db::models::room::Room;
use campus_db::repositories::RoomRepo;
use chrono::Utc;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::TimeRangeParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response body for `GET /rooms/free`.
#[derive(Debug, Serialize)]
pub struct FreeRoomsResponse {
    pub start: Timestamp,
    pub end: Timestamp,
    pub count: usize,
    pub rooms: Vec<Room>,
}

/// Response body for `GET /rooms/{room_number}/occupancy`.
#[derive(Debug, Serialize)]
pub struct OccupancyResponse {
    pub room: Room,
    pub start: Timestamp,
    pub end: Timestamp,
    pub entries: Vec<OccupancyEntry>,
}

/// GET /api/v1/rooms
pub async fn list_rooms(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let rooms = RoomRepo::list(&state.pool, auth.tenant.id).await?;
    Ok(Json(DataResponse { data: rooms }))
}

/// GET /api/v1/rooms/free?start=&end=
///
/// Rooms with no timetable event and no custom hour overlapping the range.
/// Back-to-back bookings do not count as overlap.
pub async fn free_rooms(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<TimeRangeParams>,
) -> AppResult<impl IntoResponse> {
    let range = params.range()?;
    let rooms = RoomRepo::list_free(&state.pool, auth.tenant.id, range).await?;

    Ok(Json(DataResponse {
        data: FreeRoomsResponse {
            start: range.start(),
            end: range.end(),
            count: rooms.len(),
            rooms,
        },
    }))
}

/// GET /api/v1/rooms/{room_number}/occupancy
///
/// The next seven days starting at local midnight. Custom hours appear only
/// as blocked slots without details.
pub async fn room_occupancy(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(room_number): Path<String>,
) -> AppResult<impl IntoResponse> {
    let room = RoomRepo::find_by_number(&state.pool, auth.tenant.id, &room_number)
        .await?
        .ok_or_else(|| CoreError::not_found("Room", &room_number))?;

    let window = occupancy::window(Utc::now());
    let (timetable, blocked) = RoomRepo::occupancy(&state.pool, room.id, window).await?;

    Ok(Json(DataResponse {
        data: OccupancyResponse {
            room,
            start: window.start(),
            end: window.end(),
            entries: occupancy::merge(timetable, blocked),
        },
    }))
}
