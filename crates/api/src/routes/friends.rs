use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::friends;
use crate::state::AppState;

/// Friendship routes mounted at `/friends`.
///
/// ```text
/// GET    /                       -> list_friends
/// DELETE /{user_id}              -> remove_friend
/// GET    /requests               -> list_requests
/// POST   /requests               -> send_request
/// POST   /requests/{id}/accept   -> accept_request
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(friends::list_friends))
        .route("/{user_id}", delete(friends::remove_friend))
        .route(
            "/requests",
            get(friends::list_requests).post(friends::send_request),
        )
        .route("/requests/{id}/accept", post(friends::accept_request))
}
