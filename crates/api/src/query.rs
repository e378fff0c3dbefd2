//! Shared query parameter types for API handlers.

use campus_core::error::CoreError;
use campus_core::time_range::TimeRange;
use campus_core::types::Timestamp;
use serde::Deserialize;

use crate::error::AppError;

/// `?start=&end=` as RFC 3339 timestamps.
#[derive(Debug, Deserialize)]
pub struct TimeRangeParams {
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
}

impl TimeRangeParams {
    /// Both bounds are required and `start` must be before `end`.
    pub fn range(&self) -> Result<TimeRange, AppError> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Ok(TimeRange::new(start, end)?),
            _ => Err(AppError::Core(CoreError::Validation(
                "Query parameters 'start' and 'end' are required".into(),
            ))),
        }
    }
}
