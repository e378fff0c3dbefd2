//! Handlers for the `/admin` resource: ingestion scheduler and tenants.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use campus_core::error::CoreError;
use campus_core::tenant::validate_slug;
use campus_db::models::tenant::CreateTenant;
use campus_db::repositories::TenantRepo;
use serde::Deserialize;
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::rbac::{RequireAdmin, RequireSupport};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /admin/ingest/start`.
#[derive(Debug, Default, Deserialize)]
pub struct StartIngestRequest {
    #[serde(default)]
    pub run_immediately: bool,
}

/// Request body for `POST /admin/tenants`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTenantRequest {
    pub slug: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub realm_id: String,
    #[validate(url)]
    pub identity_provider_url: String,
}

// ---------------------------------------------------------------------------
// Ingestion scheduler
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/ingest/status
pub async fn ingest_status(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let status = state.scheduler.status().await;
    Ok(Json(DataResponse { data: status }))
}

/// POST /api/v1/admin/ingest/start
///
/// 409 if the scheduler is already running.
pub async fn start_ingest(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<StartIngestRequest>,
) -> AppResult<impl IntoResponse> {
    state
        .scheduler
        .start(input.run_immediately)
        .await
        .map_err(|e| CoreError::Conflict(e.to_string()))?;

    tracing::info!(
        user_id = admin.user.id,
        run_immediately = input.run_immediately,
        "Ingestion scheduler started by admin",
    );

    Ok(Json(DataResponse {
        data: state.scheduler.status().await,
    }))
}

/// POST /api/v1/admin/ingest/stop
///
/// Waits for an in-flight run to finish. Stopping an idle scheduler is a no-op.
pub async fn stop_ingest(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    state.scheduler.stop().await;

    tracing::info!(user_id = admin.user.id, "Ingestion scheduler stopped by admin");

    Ok(Json(DataResponse {
        data: state.scheduler.status().await,
    }))
}

// ---------------------------------------------------------------------------
// Tenants
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/tenants
pub async fn list_tenants(
    RequireSupport(_user): RequireSupport,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let tenants = TenantRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: tenants }))
}

/// POST /api/v1/admin/tenants
///
/// A duplicate slug is 409.
pub async fn create_tenant(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateTenantRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    validate_slug(&input.slug)?;

    let tenant = TenantRepo::create(
        &state.pool,
        &CreateTenant {
            slug: input.slug,
            name: input.name.trim().to_string(),
            realm_id: input.realm_id,
            identity_provider_url: input.identity_provider_url.trim_end_matches('/').to_string(),
        },
    )
    .await?;

    tracing::info!(
        tenant_id = tenant.id,
        slug = %tenant.slug,
        user_id = admin.user.id,
        "Tenant created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: tenant })))
}
