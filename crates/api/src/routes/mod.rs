pub mod admin;
pub mod custom_hours;
pub mod exams;
pub mod feeds;
pub mod friends;
pub mod health;
pub mod me;
pub mod rooms;

use axum::routing::get;
use axum::Router;

use crate::handlers::zenturien;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /me                                   profile (auth)
/// /me/zenturie                          select cohort (PUT)
/// /me/calendar                          personal calendar (GET)
/// /me/calendar/token                    rotate feed token (POST)
///
/// /zenturien                            list cohorts
///
/// /rooms                                list rooms
/// /rooms/free                           free-room search
/// /rooms/{room_number}/occupancy        seven-day occupancy
///
/// /custom-hours                         list, create
/// /custom-hours/{id}                    delete
///
/// /exams                                list own, report
/// /exams/{id}                           delete own report
/// /courses/{id}/exams                   reports for a course
///
/// /friends                              list friends
/// /friends/{user_id}                    remove friend
/// /friends/requests                     list incoming, send
/// /friends/requests/{id}/accept         accept
///
/// /admin/ingest/status                  scheduler status (admin)
/// /admin/ingest/start                   start scheduler (admin)
/// /admin/ingest/stop                    stop scheduler (admin)
/// /admin/tenants                        list (support), create (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/me", me::router())
        .route("/zenturien", get(zenturien::list_zenturien))
        .nest("/rooms", rooms::router())
        .nest("/custom-hours", custom_hours::router())
        .nest("/exams", exams::router())
        .nest("/courses", exams::course_router())
        .nest("/friends", friends::router())
        .nest("/admin", admin::router())
}
