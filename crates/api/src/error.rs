use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use campus_core::error::CoreError;
use serde_json::json;

use crate::auth::AuthError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce `{ "error", "code" }` JSON bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Core(CoreError::Validation(errors.to_string()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, key } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} '{key}' not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::InvalidTimeRange { .. } => {
                    (StatusCode::BAD_REQUEST, "INVALID_TIME_RANGE", core.to_string())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            AppError::Database(err) => classify_sqlx_error(err),

            AppError::Auth(err) => {
                if err.is_upstream() {
                    tracing::error!(error = %err, "Identity provider unavailable");
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "IDP_UNAVAILABLE",
                        "Identity provider unavailable".to_string(),
                    )
                } else {
                    tracing::debug!(error = %err, "Token rejected");
                    (
                        StatusCode::UNAUTHORIZED,
                        "UNAUTHORIZED",
                        "Invalid or expired token".to_string(),
                    )
                }
            }

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique violations on `uq_*` constraints map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique_violation
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    async fn status_and_body(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn core_errors_map_to_statuses() {
        let now = Utc::now();
        let cases = [
            (CoreError::not_found("Room", "Z999"), StatusCode::NOT_FOUND, "NOT_FOUND"),
            (CoreError::Validation("bad".into()), StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            (
                CoreError::InvalidTimeRange { start: now, end: now },
                StatusCode::BAD_REQUEST,
                "INVALID_TIME_RANGE",
            ),
            (CoreError::Conflict("dup".into()), StatusCode::CONFLICT, "CONFLICT"),
            (CoreError::Unauthorized("no".into()), StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            (CoreError::Forbidden("no".into()), StatusCode::FORBIDDEN, "FORBIDDEN"),
            (
                CoreError::Internal("secret detail".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
            ),
        ];

        for (err, status, code) in cases {
            let (actual_status, body) = status_and_body(AppError::Core(err)).await;
            assert_eq!(actual_status, status);
            assert_eq!(body["code"], code);
        }
    }

    #[tokio::test]
    async fn not_found_message_names_entity() {
        let (_, body) = status_and_body(AppError::Core(CoreError::not_found("Room", "Z999"))).await;
        assert_eq!(body["error"], "Room 'Z999' not found");
    }

    #[tokio::test]
    async fn row_not_found_is_404() {
        let (status, _) = status_and_body(AppError::Database(sqlx::Error::RowNotFound)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn token_errors_are_401() {
        let (status, body) = status_and_body(AppError::Auth(AuthError::MissingKeyId)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn internal_message_is_sanitized() {
        let (_, body) = status_and_body(AppError::InternalError("password=hunter2".into())).await;
        assert_eq!(body["error"], "An internal error occurred");
    }
}
