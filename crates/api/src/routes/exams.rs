use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::exams;
use crate::state::AppState;

/// Exam report routes mounted at `/exams`.
///
/// ```text
/// GET    /      -> list_my_exams
/// POST   /      -> create_exam
/// DELETE /{id}  -> delete_exam
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(exams::list_my_exams).post(exams::create_exam))
        .route("/{id}", delete(exams::delete_exam))
}

/// Course routes mounted at `/courses`.
///
/// ```text
/// GET /{id}/exams  -> list_course_exams
/// ```
pub fn course_router() -> Router<AppState> {
    Router::new().route("/{id}/exams", get(exams::list_course_exams))
}
