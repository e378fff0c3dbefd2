//! Process-wide scheduler for the ingestion job.
//!
//! The job fires on minutes 0 and 30 of every hour (UTC). At most one run is
//! in flight at a time: a tick that finds a run still active is skipped.

use std::sync::Arc;
use std::time::Duration;

use campus_core::schedule::{next_run, next_run_after};
use campus_core::types::Timestamp;
use chrono::Utc;
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::pipeline::IngestJob;

#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("Scheduler is already running")]
    AlreadyRunning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchedulerStatus {
    pub running: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_run: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_name: Option<String>,
}

struct Running {
    cancel: CancellationToken,
    timer: JoinHandle<()>,
    runs: TaskTracker,
}

/// Owns the timer task and serializes job runs.
pub struct Scheduler {
    job: Arc<dyn IngestJob>,
    state: Mutex<Option<Running>>,
    run_lock: Arc<Mutex<()>>,
}

impl Scheduler {
    pub fn new(job: Arc<dyn IngestJob>) -> Self {
        Self {
            job,
            state: Mutex::new(None),
            run_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Start the timer. With `run_immediately`, a first run is dispatched
    /// right away alongside the schedule.
    pub async fn start(&self, run_immediately: bool) -> Result<(), SchedulerError> {
        let mut state = self.state.lock().await;
        if state.is_some() {
            return Err(SchedulerError::AlreadyRunning);
        }

        let cancel = CancellationToken::new();
        let runs = TaskTracker::new();

        if run_immediately {
            runs.spawn(run_once(
                Arc::clone(&self.job),
                Arc::clone(&self.run_lock),
                cancel.clone(),
            ));
        }

        let timer = tokio::spawn(timer_loop(
            Arc::clone(&self.job),
            Arc::clone(&self.run_lock),
            cancel.clone(),
            runs.clone(),
        ));

        *state = Some(Running {
            cancel,
            timer,
            runs,
        });
        tracing::info!(job = self.job.name(), run_immediately, "Scheduler started");
        Ok(())
    }

    /// Stop the timer and wait for an in-flight run to finish.
    ///
    /// Stopping a scheduler that is not running is a no-op.
    pub async fn stop(&self) {
        let mut state = self.state.lock().await;
        let Some(running) = state.take() else {
            return;
        };

        running.cancel.cancel();
        if let Err(e) = running.timer.await {
            tracing::error!(error = %e, "Scheduler timer task failed");
        }
        running.runs.close();
        running.runs.wait().await;
        tracing::info!(job = self.job.name(), "Scheduler stopped");
    }

    pub async fn status(&self) -> SchedulerStatus {
        let state = self.state.lock().await;
        match state.as_ref() {
            Some(_) => SchedulerStatus {
                running: true,
                next_run: Some(next_run(Utc::now())),
                job_name: Some(self.job.name().to_string()),
            },
            None => SchedulerStatus {
                running: false,
                next_run: None,
                job_name: None,
            },
        }
    }
}

async fn timer_loop(
    job: Arc<dyn IngestJob>,
    run_lock: Arc<Mutex<()>>,
    cancel: CancellationToken,
    runs: TaskTracker,
) {
    loop {
        let now = Utc::now();
        let wait = (next_run_after(now) - now).to_std().unwrap_or(Duration::ZERO);

        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(wait) => {
                runs.spawn(run_once(Arc::clone(&job), Arc::clone(&run_lock), cancel.clone()));
            }
        }
    }
}

/// Run the job unless another run holds the lock. Errors are logged only.
async fn run_once(job: Arc<dyn IngestJob>, run_lock: Arc<Mutex<()>>, cancel: CancellationToken) {
    let Ok(_guard) = run_lock.try_lock_owned() else {
        tracing::info!(job = job.name(), "Previous run still active, skipping tick");
        return;
    };

    match job.run(cancel).await {
        Ok(stats) => {
            tracing::debug!(job = job.name(), ?stats, "Scheduled run completed");
        }
        Err(e) => {
            tracing::error!(job = job.name(), error = %e, "Scheduled run failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use tokio::sync::Notify;

    use super::*;
    use crate::pipeline::PipelineError;
    use crate::stats::IngestStats;

    /// Counts runs and optionally holds each run open for a while.
    struct CountingJob {
        runs: AtomicUsize,
        finished: AtomicUsize,
        started: Notify,
        hold: Duration,
        fail: bool,
    }

    impl CountingJob {
        fn new(hold: Duration, fail: bool) -> Arc<Self> {
            Arc::new(Self {
                runs: AtomicUsize::new(0),
                finished: AtomicUsize::new(0),
                started: Notify::new(),
                hold,
                fail,
            })
        }
    }

    #[async_trait]
    impl IngestJob for CountingJob {
        fn name(&self) -> &str {
            "counting"
        }

        async fn run(&self, _cancel: CancellationToken) -> Result<IngestStats, PipelineError> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            self.started.notify_one();
            tokio::time::sleep(self.hold).await;
            self.finished.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(PipelineError::Cancelled)
            } else {
                Ok(IngestStats::default())
            }
        }
    }

    #[tokio::test]
    async fn start_twice_is_rejected() {
        let scheduler = Scheduler::new(CountingJob::new(Duration::ZERO, false));

        scheduler.start(false).await.unwrap();
        assert_matches!(
            scheduler.start(false).await,
            Err(SchedulerError::AlreadyRunning)
        );

        scheduler.stop().await;
        scheduler.start(false).await.unwrap();
        scheduler.stop().await;
    }

    #[tokio::test]
    async fn status_reports_next_slot() {
        let scheduler = Scheduler::new(CountingJob::new(Duration::ZERO, false));
        assert_eq!(
            scheduler.status().await,
            SchedulerStatus {
                running: false,
                next_run: None,
                job_name: None
            }
        );

        let before = Utc::now();
        scheduler.start(false).await.unwrap();
        let status = scheduler.status().await;
        assert!(status.running);
        assert_eq!(status.job_name.as_deref(), Some("counting"));
        let next = status.next_run.unwrap();
        assert!(campus_core::schedule::is_slot(next));
        assert!(next >= before);
        scheduler.stop().await;
    }

    #[tokio::test]
    async fn immediate_run_and_stop_waits_for_it() {
        let job = CountingJob::new(Duration::from_millis(100), false);
        let scheduler = Scheduler::new(job.clone());

        scheduler.start(true).await.unwrap();
        job.started.notified().await;
        scheduler.stop().await;

        assert_eq!(job.runs.load(Ordering::SeqCst), 1);
        assert_eq!(job.finished.load(Ordering::SeqCst), 1);
        assert!(!scheduler.status().await.running);
    }

    #[tokio::test]
    async fn busy_tick_is_skipped() {
        let job = CountingJob::new(Duration::ZERO, false);
        let lock = Arc::new(Mutex::new(()));

        let guard = lock.clone().lock_owned().await;
        run_once(job.clone(), lock.clone(), CancellationToken::new()).await;
        assert_eq!(job.runs.load(Ordering::SeqCst), 0);

        drop(guard);
        run_once(job.clone(), lock, CancellationToken::new()).await;
        assert_eq!(job.runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_run_is_swallowed() {
        let job = CountingJob::new(Duration::ZERO, true);
        let lock = Arc::new(Mutex::new(()));

        run_once(job.clone(), lock.clone(), CancellationToken::new()).await;
        run_once(job.clone(), lock, CancellationToken::new()).await;
        assert_eq!(job.finished.load(Ordering::SeqCst), 2);
    }
}
