use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{calendar, zenturien};
use crate::state::AppState;

/// Caller profile routes mounted at `/me`.
///
/// ```text
/// GET  /                -> get_me
/// PUT  /zenturie        -> select_zenturie
/// GET  /calendar        -> get_calendar
/// POST /calendar/token  -> rotate_calendar_token
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(calendar::get_me))
        .route("/zenturie", put(zenturien::select_zenturie))
        .route("/calendar", get(calendar::get_calendar))
        .route("/calendar/token", post(calendar::rotate_calendar_token))
}
