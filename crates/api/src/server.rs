//! Listener setup for the server binary.

use std::net::SocketAddr;

use campus_pipeline::Scheduler;
use tokio::net::TcpListener;

/// Bind the HTTP listener, then start the ingestion scheduler.
///
/// When the bind fails the scheduler is left stopped, so a process that is
/// about to exit never begins an ingestion run. A scheduler that refuses to
/// start is logged and does not fail the bind.
pub async fn bind_then_schedule(
    addr: SocketAddr,
    scheduler: &Scheduler,
    run_immediately: bool,
) -> std::io::Result<TcpListener> {
    let listener = TcpListener::bind(addr).await?;

    if let Err(e) = scheduler.start(run_immediately).await {
        tracing::warn!(error = %e, "Scheduler not started");
    }

    Ok(listener)
}
