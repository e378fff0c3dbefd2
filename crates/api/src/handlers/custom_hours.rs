//! Handlers for the `/custom-hours` resource.
//!
//! Custom hours are private to their owner; every query is scoped to the caller.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use campus_core::custom_hour::{self, Placement};
use campus_core::error::CoreError;
use campus_core::types::DbId;
use campus_db::models::custom_hour::{CreateCustomHour, NewCustomHour};
use campus_db::repositories::{CustomHourRepo, RoomRepo};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::TimeRangeParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/custom-hours?start=&end=
pub async fn list_custom_hours(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<TimeRangeParams>,
) -> AppResult<impl IntoResponse> {
    let range = params.range()?;
    let hours = CustomHourRepo::list_for_user(&state.pool, auth.user.id, range).await?;
    Ok(Json(DataResponse { data: hours }))
}

/// POST /api/v1/custom-hours
///
/// Exactly one of `room_number` (an existing room of the tenant) or
/// `custom_location` must be given.
pub async fn create_custom_hour(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateCustomHour>,
) -> AppResult<impl IntoResponse> {
    let range = custom_hour::validate(&input.title, input.start_time, input.end_time)?;

    let (room_id, custom_location) =
        match Placement::from_parts(input.room_number, input.custom_location)? {
            Placement::Room(number) => {
                let room = RoomRepo::find_by_number(&state.pool, auth.tenant.id, number.trim())
                    .await?
                    .ok_or_else(|| CoreError::not_found("Room", &number))?;
                (Some(room.id), None)
            }
            Placement::Custom(location) => (None, Some(location.trim().to_string())),
        };

    let hour = CustomHourRepo::create(
        &state.pool,
        &NewCustomHour {
            user_id: auth.user.id,
            title: input.title.trim().to_string(),
            description: input.description.filter(|d| !d.trim().is_empty()),
            room_id,
            custom_location,
            start_time: range.start(),
            end_time: range.end(),
        },
    )
    .await?;

    tracing::info!(
        custom_hour_id = hour.id,
        user_id = auth.user.id,
        room_id = ?hour.room_id,
        "Custom hour created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: hour })))
}

/// DELETE /api/v1/custom-hours/{id}
///
/// Only the owner may delete. Other users' entries are reported as missing.
pub async fn delete_custom_hour(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !CustomHourRepo::delete_owned(&state.pool, id, auth.user.id).await? {
        return Err(CoreError::not_found("CustomHour", id).into());
    }

    tracing::info!(custom_hour_id = id, user_id = auth.user.id, "Custom hour deleted");

    Ok(StatusCode::NO_CONTENT)
}
