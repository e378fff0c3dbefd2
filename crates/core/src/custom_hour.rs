//! Rules for user-authored calendar entries ("custom hours").

use crate::error::CoreError;
use crate::time_range::TimeRange;
use crate::types::Timestamp;

/// Maximum title length in characters.
pub const MAX_TITLE_LEN: usize = 200;

/// Where a custom hour takes place: a known room or free text, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    Room(String),
    Custom(String),
}

impl Placement {
    /// Build a placement from the two optional request fields.
    pub fn from_parts(
        room_number: Option<String>,
        custom_location: Option<String>,
    ) -> Result<Self, CoreError> {
        let room_number = room_number.filter(|s| !s.trim().is_empty());
        let custom_location = custom_location.filter(|s| !s.trim().is_empty());
        match (room_number, custom_location) {
            (Some(room), None) => Ok(Placement::Room(room)),
            (None, Some(location)) => Ok(Placement::Custom(location)),
            _ => Err(CoreError::Validation(
                "Exactly one of room_number or custom_location must be set".to_string(),
            )),
        }
    }
}

/// Validate title and time range of a new custom hour.
pub fn validate(title: &str, start: Timestamp, end: Timestamp) -> Result<TimeRange, CoreError> {
    let len = title.trim().chars().count();
    if len == 0 || len > MAX_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "Title must be between 1 and {MAX_TITLE_LEN} characters"
        )));
    }
    TimeRange::new(start, end)
}
