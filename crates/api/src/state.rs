use std::sync::Arc;

use campus_events::{BackgroundTasks, EmailDelivery};
use campus_pipeline::Scheduler;

use crate::auth::JwksCache;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: campus_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Realm signing keys for access-token validation.
    pub jwks: Arc<JwksCache>,
    /// The ingestion scheduler singleton.
    pub scheduler: Arc<Scheduler>,
    /// Fire-and-forget tasks spawned by handlers.
    pub background: BackgroundTasks,
    /// Outbound email; `None` when SMTP is not configured.
    pub email: Option<Arc<EmailDelivery>>,
}
