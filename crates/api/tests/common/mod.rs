//! Shared helpers for API integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use campus_api::auth::JwksCache;
use campus_api::config::ServerConfig;
use campus_api::router::build_app_router;
use campus_api::state::AppState;
use campus_db::models::tenant::{CreateTenant, Tenant};
use campus_db::repositories::TenantRepo;
use campus_events::BackgroundTasks;
use campus_pipeline::{IngestJob, IngestStats, PipelineError, Scheduler};
use chrono::Utc;
use http_body_util::BodyExt;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const REALM: &str = "campus";
const SIGNING_KEY: &[u8] = include_bytes!("../fixtures/jwt_signing_key.pem");
const MODULUS: &str = "tVriaFDuYJmREO9qRPTIfS8kGjqWbC_fPP79nVGW9eEa5pMym0WE3Dq3-YKSmLcmDxWtm-siaHBk3ixTUbK_HoIwUCJuuXVnPHmiTcIe_G1mgmpNJUTYL9-EMMK6jwShA7V-FLZ_duJ6HpI-Xbeqk40CKf7o3-JLgLo0dARYzFWTYFW7Rr5LqLyFMpGQElpvdGcxBHYeQ9T37ytvq_H15rjivAvmWKcFw40HFV-N0wY8u_Am1Ar43Kbl_RluN6H0gb68ivVx1BpCKoBz3S27F6KScstezRDQ9LSmkPEHU-YtK-j6pSIeHFePsjNkjO9eCqjDansdTzzKx7ElVi18vQ";
const KID: &str = "test-key";

/// An ingest job that does nothing.
struct NoopJob;

#[async_trait]
impl IngestJob for NoopJob {
    fn name(&self) -> &str {
        "noop"
    }

    async fn run(&self, _cancel: CancellationToken) -> Result<IngestStats, PipelineError> {
        Ok(IngestStats::default())
    }
}

/// A stopped scheduler around a job that does nothing.
pub fn noop_scheduler() -> Arc<Scheduler> {
    Arc::new(Scheduler::new(Arc::new(NoopJob)))
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig::from_lookup(|key| match key {
        "HOST" => Some("127.0.0.1".to_string()),
        "PORT" => Some("0".to_string()),
        _ => None,
    })
    .unwrap()
}

/// A pool that never connects. Requests that reach the store fail fast.
pub fn unreachable_pool() -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(200))
        .connect_lazy("postgres://postgres@127.0.0.1:1/campus")
        .unwrap()
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        jwks: Arc::new(JwksCache::new(Duration::from_secs(5)).unwrap()),
        scheduler: noop_scheduler(),
        background: BackgroundTasks::default(),
        email: None,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Identity provider
// ---------------------------------------------------------------------------

/// Start a mock identity provider serving the fixture key set.
pub async fn identity_provider() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/realms/{REALM}/protocol/openid-connect/certs")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "keys": [{
                "kid": KID,
                "kty": "RSA",
                "alg": "RS256",
                "use": "sig",
                "n": MODULUS,
                "e": "AQAB",
            }]
        })))
        .mount(&server)
        .await;
    server
}

/// Register the default tenant against the mock identity provider.
pub async fn seed_tenant(pool: &PgPool, idp: &MockServer) -> Tenant {
    TenantRepo::create(
        pool,
        &CreateTenant {
            slug: "default".to_string(),
            name: "Nordakademie".to_string(),
            realm_id: REALM.to_string(),
            identity_provider_url: idp.uri(),
        },
    )
    .await
    .unwrap()
}

/// Sign an access token for `sub` as the mock provider would.
pub fn token(idp: &MockServer, sub: &str, email: &str, roles: &[&str]) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(KID.to_string());
    let claims = json!({
        "sub": sub,
        "email": email,
        "realm_access": { "roles": roles },
        "iss": format!("{}/realms/{REALM}", idp.uri()),
        "exp": Utc::now().timestamp() + 600,
    });
    encode(&header, &claims, &EncodingKey::from_rsa_pem(SIGNING_KEY).unwrap()).unwrap()
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    bearer: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
