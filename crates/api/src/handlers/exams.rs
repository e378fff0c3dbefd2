//! Handlers for exam reports.
//!
//! Reports are grouped by `(course, start_time, duration)`. The third report
//! in a group verifies every report of that group.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use campus_core::error::CoreError;
use campus_core::types::DbId;
use campus_db::models::course::Course;
use campus_db::models::exam::{CreateExam, NewExam};
use campus_db::repositories::{CourseRepo, ExamRepo, RoomRepo};
use campus_db::DbPool;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// A course of the caller's tenant, or 404.
async fn tenant_course(pool: &DbPool, tenant_id: DbId, course_id: DbId) -> AppResult<Course> {
    CourseRepo::find_by_id(pool, course_id)
        .await?
        .filter(|c| c.tenant_id == tenant_id)
        .ok_or_else(|| CoreError::not_found("Course", course_id).into())
}

/// POST /api/v1/exams
pub async fn create_exam(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateExam>,
) -> AppResult<impl IntoResponse> {
    let course = tenant_course(&state.pool, auth.tenant.id, input.course_id).await?;

    let room_id = match input.room_number.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
        Some(number) => Some(
            RoomRepo::find_by_number(&state.pool, auth.tenant.id, number)
                .await?
                .ok_or_else(|| CoreError::not_found("Room", number))?
                .id,
        ),
        None => None,
    };

    let exam = ExamRepo::create_and_verify(
        &state.pool,
        &NewExam {
            user_id: auth.user.id,
            course_id: course.id,
            start_time: input.start_time,
            duration: input.duration,
            room_id,
        },
    )
    .await?
    .ok_or_else(|| CoreError::Conflict("You already reported this exam".into()))?;

    tracing::info!(
        exam_id = exam.id,
        course_id = course.id,
        user_id = auth.user.id,
        is_verified = exam.is_verified,
        "Exam reported",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: exam })))
}

/// GET /api/v1/exams
pub async fn list_my_exams(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let exams = ExamRepo::list_for_user(&state.pool, auth.user.id).await?;
    Ok(Json(DataResponse { data: exams }))
}

/// GET /api/v1/courses/{id}/exams
///
/// Every report for the course with its verification state.
pub async fn list_course_exams(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(course_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let course = tenant_course(&state.pool, auth.tenant.id, course_id).await?;
    let exams = ExamRepo::list_for_course(&state.pool, course.id).await?;
    Ok(Json(DataResponse { data: exams }))
}

/// DELETE /api/v1/exams/{id}
pub async fn delete_exam(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !ExamRepo::delete_owned(&state.pool, id, auth.user.id).await? {
        return Err(CoreError::not_found("Exam", id).into());
    }

    tracing::info!(exam_id = id, user_id = auth.user.id, "Exam report deleted");

    Ok(StatusCode::NO_CONTENT)
}
