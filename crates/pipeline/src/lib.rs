//! Timetable ingestion: feed fetching, reconciliation against the store,
//! and the half-hourly scheduler that drives both.

pub mod fetcher;
pub mod pipeline;
pub mod reconciler;
pub mod scheduler;
pub mod stats;
pub mod store;

pub use fetcher::{FeedFetcher, FetchError};
pub use pipeline::{IngestJob, IngestPipeline, PipelineError};
pub use reconciler::Reconciler;
pub use scheduler::{Scheduler, SchedulerError, SchedulerStatus};
pub use stats::IngestStats;
pub use store::{PgStore, StoreError, TimetableStore};
