//! One ingestion run: every active tenant, every cohort, every semester.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use campus_core::ical::parse_calendar;
use tokio_util::sync::CancellationToken;

use crate::fetcher::{FeedFetcher, FetchError, SEMESTERS};
use crate::reconciler::Reconciler;
use crate::stats::IngestStats;
use crate::store::{StoreError, TimetableStore};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Ingestion cancelled")]
    Cancelled,
}

/// A unit of work the scheduler can run.
#[async_trait]
pub trait IngestJob: Send + Sync + 'static {
    fn name(&self) -> &str;

    async fn run(&self, cancel: CancellationToken) -> Result<IngestStats, PipelineError>;
}

/// Fetches, parses, and reconciles all feeds.
pub struct IngestPipeline {
    store: Arc<dyn TimetableStore>,
    fetcher: FeedFetcher,
    reconciler: Reconciler,
}

impl IngestPipeline {
    pub const JOB_NAME: &'static str = "timetable-ingest";

    pub fn new(store: Arc<dyn TimetableStore>, fetcher: FeedFetcher) -> Self {
        let reconciler = Reconciler::new(Arc::clone(&store));
        Self {
            store,
            fetcher,
            reconciler,
        }
    }

    async fn ingest_cohort(
        &self,
        tenant_id: i64,
        cohort: &str,
        cancel: &CancellationToken,
    ) -> Result<IngestStats, PipelineError> {
        let mut stats = IngestStats::default();

        for semester in SEMESTERS {
            let body = match self.fetcher.fetch(cohort, semester, cancel).await {
                Ok(Some(body)) => body,
                Ok(None) => continue,
                Err(FetchError::Cancelled) => return Err(PipelineError::Cancelled),
                Err(e) => {
                    tracing::warn!(tenant_id, cohort, semester, error = %e, "Feed download failed");
                    continue;
                }
            };
            stats.files_downloaded += 1;

            let events = parse_calendar(&body);
            if events.is_empty() {
                tracing::warn!(tenant_id, cohort, semester, "Feed contained no events");
                continue;
            }

            let feed_stats = self.reconciler.reconcile_feed(tenant_id, cohort, &events).await;
            tracing::debug!(
                tenant_id,
                cohort,
                semester,
                created = feed_stats.events_created,
                updated = feed_stats.events_updated,
                unchanged = feed_stats.events_unchanged,
                errors = feed_stats.errors,
                "Feed reconciled"
            );
            stats += feed_stats;
        }

        Ok(stats)
    }
}

#[async_trait]
impl IngestJob for IngestPipeline {
    fn name(&self) -> &str {
        Self::JOB_NAME
    }

    async fn run(&self, cancel: CancellationToken) -> Result<IngestStats, PipelineError> {
        let started = Instant::now();
        let mut stats = IngestStats::default();

        for tenant in self.store.active_tenants().await? {
            let cohorts = match self.store.cohorts(tenant.id).await {
                Ok(cohorts) => cohorts,
                Err(e) => {
                    tracing::error!(tenant = %tenant.slug, error = %e, "Failed to list cohorts");
                    stats.record_error();
                    continue;
                }
            };

            for cohort in cohorts {
                if cancel.is_cancelled() {
                    return Err(PipelineError::Cancelled);
                }
                stats += self.ingest_cohort(tenant.id, &cohort.name, &cancel).await?;
            }
        }

        tracing::info!(
            files_downloaded = stats.files_downloaded,
            events_created = stats.events_created,
            events_updated = stats.events_updated,
            events_unchanged = stats.events_unchanged,
            errors = stats.errors,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Timetable ingestion finished"
        );
        Ok(stats)
    }
}
