use axum::routing::get;
use axum::Router;

use crate::handlers::rooms;
use crate::state::AppState;

/// Room routes mounted at `/rooms`.
///
/// ```text
/// GET /                        -> list_rooms
/// GET /free                    -> free_rooms
/// GET /{room_number}/occupancy -> room_occupancy
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(rooms::list_rooms))
        .route("/free", get(rooms::free_rooms))
        .route("/{room_number}/occupancy", get(rooms::room_occupancy))
}
