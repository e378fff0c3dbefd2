//! Handlers for cohort listing and selection.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use campus_core::cohort::{validate_name, year_tag};
use campus_core::error::CoreError;
use campus_db::repositories::{UserRepo, ZenturieRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PUT /me/zenturie`.
#[derive(Debug, Deserialize, Validate)]
pub struct SelectZenturieRequest {
    #[validate(length(min = 1, max = 32))]
    pub name: String,
}

/// GET /api/v1/zenturien
pub async fn list_zenturien(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let zenturien = ZenturieRepo::list(&state.pool, auth.tenant.id).await?;
    Ok(Json(DataResponse { data: zenturien }))
}

/// PUT /api/v1/me/zenturie
///
/// Assign the caller to a cohort. Unknown cohorts are created, which also
/// registers them for ingestion.
pub async fn select_zenturie(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SelectZenturieRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let name = input.name.trim();
    validate_name(name).map_err(CoreError::Validation)?;

    let zenturie =
        ZenturieRepo::create_if_missing(&state.pool, auth.tenant.id, name, &year_tag(name)).await?;
    let user = UserRepo::set_zenturie(&state.pool, auth.user.id, zenturie.id)
        .await?
        .ok_or_else(|| CoreError::not_found("User", auth.user.id))?;

    tracing::info!(
        user_id = user.id,
        zenturie_id = zenturie.id,
        zenturie = %zenturie.name,
        "Zenturie selected",
    );

    Ok(Json(DataResponse { data: user }))
}
