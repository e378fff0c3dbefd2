use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::custom_hours;
use crate::state::AppState;

/// Custom hour routes mounted at `/custom-hours`.
///
/// ```text
/// GET    /      -> list_custom_hours
/// POST   /      -> create_custom_hour
/// DELETE /{id}  -> delete_custom_hour
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(custom_hours::list_custom_hours).post(custom_hours::create_custom_hour),
        )
        .route("/{id}", delete(custom_hours::delete_custom_hour))
}
