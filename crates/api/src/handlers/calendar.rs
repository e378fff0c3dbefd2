//! Handlers for the caller's profile and personal calendar.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use campus_core::calendar::{sort_entries, CalendarEntry};
use campus_core::error::CoreError;
use campus_core::time_range::TimeRange;
use campus_db::models::user::User;
use campus_db::repositories::{CustomHourRepo, ExamRepo, TimetableEventRepo, UserRepo};
use campus_db::DbPool;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::TimeRangeParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Collect a user's timetable, custom hours, and exams within `range`,
/// ordered by start time.
///
/// Users without a cohort have no timetable entries.
pub async fn load_calendar(
    pool: &DbPool,
    user: &User,
    range: TimeRange,
) -> Result<Vec<CalendarEntry>, sqlx::Error> {
    let mut entries = Vec::new();

    if let Some(zenturie_id) = user.zenturie_id {
        let events = TimetableEventRepo::list_for_zenturie(pool, zenturie_id, range).await?;
        entries.extend(events.into_iter().map(|e| CalendarEntry::Timetable(e.into())));
    }

    let custom_hours = CustomHourRepo::list_for_user(pool, user.id, range).await?;
    entries.extend(custom_hours.into_iter().map(|c| CalendarEntry::CustomHour(c.into())));

    let exams = ExamRepo::list_for_user_between(pool, user.id, range).await?;
    entries.extend(exams.into_iter().map(|x| CalendarEntry::Exam(x.into())));

    sort_entries(&mut entries);
    Ok(entries)
}

/// GET /api/v1/me
pub async fn get_me(auth: AuthUser) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse { data: auth.user }))
}

/// GET /api/v1/me/calendar?start=&end=
pub async fn get_calendar(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<TimeRangeParams>,
) -> AppResult<impl IntoResponse> {
    let range = params.range()?;
    let entries = load_calendar(&state.pool, &auth.user, range).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// POST /api/v1/me/calendar/token
///
/// Replace the subscription token. The old feed URL stops working.
pub async fn rotate_calendar_token(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::rotate_calendar_token(&state.pool, auth.user.id)
        .await?
        .ok_or_else(|| CoreError::not_found("User", auth.user.id))?;

    tracing::info!(user_id = user.id, "Calendar token rotated");

    Ok(Json(DataResponse { data: user }))
}
