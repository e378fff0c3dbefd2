use std::net::{IpAddr, SocketAddr};
use std::process::ExitCode;
use std::sync::Arc;

use campus_events::background::SHUTDOWN_GRACE;
use campus_events::{BackgroundTasks, EmailConfig, EmailDelivery};
use campus_pipeline::fetcher::DEFAULT_TIMEOUT;
use campus_pipeline::{FeedFetcher, IngestPipeline, PgStore, Scheduler};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use campus_api::auth::jwks::JWKS_FETCH_TIMEOUT;
use campus_api::auth::JwksCache;
use campus_api::config::{ConfigError, ServerConfig};
use campus_api::router::build_app_router;
use campus_api::server::bind_then_schedule;
use campus_api::state::AppState;

/// Fatal startup and serve failures. Each one ends the process with a
/// non-zero exit code.
#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("invalid HOST address '{0}'")]
    Host(String),

    #[error("failed to initialize {0}")]
    Client(String),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Server terminated");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: ServerConfig) -> Result<(), StartupError> {
    tracing::info!(
        host = %config.host,
        port = config.port,
        environment = ?config.environment,
        "Loaded server configuration"
    );

    // --- Database ---
    let pool = campus_db::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    campus_db::health_check(&pool).await?;
    tracing::info!("Database health check passed");

    campus_db::run_migrations(&pool).await?;
    tracing::info!("Database migrations applied");

    // --- Ingestion scheduler ---
    let fetcher = FeedFetcher::new(&config.ics_base_url, DEFAULT_TIMEOUT)
        .map_err(|e| StartupError::Client(format!("feed fetcher: {e}")))?;
    let store = Arc::new(PgStore::new(pool.clone()));
    let pipeline = Arc::new(IngestPipeline::new(store, fetcher));
    let scheduler = Arc::new(Scheduler::new(pipeline));

    // --- Identity provider keys ---
    let jwks = JwksCache::new(JWKS_FETCH_TIMEOUT)
        .map_err(|e| StartupError::Client(format!("key set client: {e}")))?;

    // --- Email ---
    let email = EmailConfig::from_env().map(|cfg| {
        tracing::info!(smtp_host = %cfg.smtp_host, "Email delivery enabled");
        Arc::new(EmailDelivery::new(cfg))
    });
    if email.is_none() {
        tracing::info!("SMTP_HOST not set, email delivery disabled");
    }

    let background = BackgroundTasks::default();

    // --- App state ---
    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        jwks: Arc::new(jwks),
        scheduler: Arc::clone(&scheduler),
        background: background.clone(),
        email,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let ip: IpAddr = config
        .host
        .parse()
        .map_err(|_| StartupError::Host(config.host.clone()))?;
    let addr = SocketAddr::new(ip, config.port);
    tracing::info!(%addr, "Starting server");

    let listener = bind_then_schedule(addr, &scheduler, config.ingest_run_immediately).await?;
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    // The scheduler goes first so no run is using the pool when it closes.
    scheduler.stop().await;

    if !background.shutdown(SHUTDOWN_GRACE).await {
        tracing::warn!("Background tasks still running after grace period");
    }

    pool.close().await;
    tracing::info!("Graceful shutdown complete");

    served.map_err(StartupError::from)
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
