//! Bounded executor for fire-and-forget tasks.
//!
//! Tasks spawned here never report back to the caller. Failures are logged.
//! At most `max_concurrency` tasks run at once; the rest wait for a permit
//! and are dropped if shutdown begins first.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// Default number of tasks allowed to run concurrently.
pub const DEFAULT_MAX_CONCURRENCY: usize = 16;

/// How long shutdown waits for running tasks.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct BackgroundTasks {
    tracker: TaskTracker,
    cancel: CancellationToken,
    permits: Arc<Semaphore>,
}

impl BackgroundTasks {
    pub fn new(max_concurrency: usize) -> Self {
        Self {
            tracker: TaskTracker::new(),
            cancel: CancellationToken::new(),
            permits: Arc::new(Semaphore::new(max_concurrency.max(1))),
        }
    }

    /// Submit a task. Returns immediately.
    pub fn spawn<F, E>(&self, name: &'static str, task: F)
    where
        F: Future<Output = Result<(), E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        if self.cancel.is_cancelled() {
            tracing::warn!(task = name, "Background executor shut down, task dropped");
            return;
        }

        let cancel = self.cancel.clone();
        let permits = Arc::clone(&self.permits);
        self.tracker.spawn(async move {
            let permit = tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::warn!(task = name, "Shutdown before task started, dropped");
                    return;
                }
                permit = permits.acquire_owned() => permit,
            };
            let Ok(_permit) = permit else {
                return;
            };

            if let Err(e) = task.await {
                tracing::error!(task = name, error = %e, "Background task failed");
            }
        });
    }

    /// Tasks currently queued or running.
    pub fn len(&self) -> usize {
        self.tracker.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracker.is_empty()
    }

    /// Stop accepting work, drop queued tasks, and wait up to `grace` for
    /// running ones. Returns `false` if the grace period elapsed first.
    pub async fn shutdown(&self, grace: Duration) -> bool {
        self.cancel.cancel();
        self.tracker.close();
        match tokio::time::timeout(grace, self.tracker.wait()).await {
            Ok(()) => true,
            Err(_) => {
                tracing::warn!(
                    remaining = self.tracker.len(),
                    "Background tasks still running after shutdown grace period"
                );
                false
            }
        }
    }
}

impl Default for BackgroundTasks {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONCURRENCY)
    }
}
