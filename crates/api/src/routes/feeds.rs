use axum::routing::get;
use axum::Router;

use crate::handlers::feeds;
use crate::state::AppState;

/// Public subscription feed, mounted at root level.
///
/// ```text
/// GET /feeds/{token}  -> calendar_feed
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/feeds/{token}", get(feeds::calendar_feed))
}
