use axum::routing::{get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Admin routes mounted at `/admin`.
///
/// ```text
/// GET  /ingest/status  -> ingest_status   (admin)
/// POST /ingest/start   -> start_ingest    (admin)
/// POST /ingest/stop    -> stop_ingest     (admin)
/// GET  /tenants        -> list_tenants    (admin or support)
/// POST /tenants        -> create_tenant   (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ingest/status", get(admin::ingest_status))
        .route("/ingest/start", post(admin::start_ingest))
        .route("/ingest/stop", post(admin::stop_ingest))
        .route(
            "/tenants",
            get(admin::list_tenants).post(admin::create_tenant),
        )
}
