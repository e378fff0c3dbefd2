//! Exam durations and crowd verification.

use serde::{Deserialize, Serialize};

/// Number of independent reports after which an exam slot is verified.
pub const VERIFICATION_THRESHOLD: i64 = 3;

/// Allowed exam lengths in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum ExamDuration {
    Min30,
    Min45,
    Min60,
    Min90,
    Min120,
}

impl ExamDuration {
    pub const ALL: [ExamDuration; 5] = [
        ExamDuration::Min30,
        ExamDuration::Min45,
        ExamDuration::Min60,
        ExamDuration::Min90,
        ExamDuration::Min120,
    ];

    pub fn minutes(self) -> i32 {
        match self {
            ExamDuration::Min30 => 30,
            ExamDuration::Min45 => 45,
            ExamDuration::Min60 => 60,
            ExamDuration::Min90 => 90,
            ExamDuration::Min120 => 120,
        }
    }
}

impl TryFrom<i32> for ExamDuration {
    type Error = String;

    fn try_from(minutes: i32) -> Result<Self, Self::Error> {
        ExamDuration::ALL
            .into_iter()
            .find(|d| d.minutes() == minutes)
            .ok_or_else(|| {
                format!("Exam duration must be one of 30, 45, 60, 90, 120 minutes, got {minutes}")
            })
    }
}

impl From<ExamDuration> for i32 {
    fn from(duration: ExamDuration) -> Self {
        duration.minutes()
    }
}

/// Whether a group with `report_count` matching rows is verified.
pub fn is_verified_count(report_count: i64) -> bool {
    report_count >= VERIFICATION_THRESHOLD
}
