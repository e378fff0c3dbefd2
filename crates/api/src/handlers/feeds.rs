//! The public calendar subscription feed.

use axum::extract::{Path, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use campus_core::error::CoreError;
use campus_core::ical::render_feed;
use campus_core::time_range::TimeRange;
use campus_core::types::Timestamp;
use campus_db::repositories::UserRepo;
use chrono::{Months, Utc};
use uuid::Uuid;

use super::calendar::load_calendar;
use crate::error::AppResult;
use crate::middleware::tenant::load_tenant;
use crate::state::AppState;

/// How far back the feed reaches.
const FEED_PAST_MONTHS: u32 = 48;

/// How far ahead the feed reaches.
const FEED_FUTURE_MONTHS: u32 = 6;

/// The feed window `[now - 4 years, now + 6 months)`.
pub fn feed_window(now: Timestamp) -> Result<TimeRange, CoreError> {
    let start = now
        .checked_sub_months(Months::new(FEED_PAST_MONTHS))
        .ok_or_else(|| CoreError::Internal("feed window start out of range".into()))?;
    let end = now
        .checked_add_months(Months::new(FEED_FUTURE_MONTHS))
        .ok_or_else(|| CoreError::Internal("feed window end out of range".into()))?;
    TimeRange::new(start, end)
}

/// GET /feeds/{token}
///
/// Renders the token owner's calendar as `text/calendar`. Unknown or
/// malformed tokens are 404. A trailing `.ics` is accepted.
pub async fn calendar_feed(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(raw_token): Path<String>,
) -> AppResult<impl IntoResponse> {
    let not_found = || CoreError::not_found("Calendar token", &raw_token);
    let token = Uuid::parse_str(raw_token.trim_end_matches(".ics")).map_err(|_| not_found())?;

    let tenant = load_tenant(&state, &headers).await?;
    let user = UserRepo::find_by_calendar_token(&state.pool, token)
        .await?
        .filter(|u| u.tenant_id == tenant.id)
        .ok_or_else(not_found)?;

    let now = Utc::now();
    let entries = load_calendar(&state.pool, &user, feed_window(now)?).await?;
    let events: Vec<_> = entries
        .iter()
        .map(|e| e.to_feed_event(&tenant.realm_id))
        .collect();

    let body = render_feed(&format!("{} Stundenplan", tenant.name), &events, now);

    tracing::debug!(user_id = user.id, events = events.len(), "Calendar feed rendered");

    Ok((
        [
            (CONTENT_TYPE, "text/calendar; charset=utf-8"),
            (CONTENT_DISPOSITION, "attachment; filename=\"calendar.ics\""),
        ],
        body,
    ))
}
