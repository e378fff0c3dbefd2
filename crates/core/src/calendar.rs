//! A user's personal calendar: imported timetable, custom hours, and exams.

use serde::Serialize;

use crate::ical::FeedEvent;
use crate::types::{DbId, Timestamp};

/// An imported timetable event as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimetableEntry {
    pub id: DbId,
    pub uid: String,
    pub summary: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub professor: Option<String>,
    pub course_type: Option<String>,
    pub course_code: Option<String>,
    pub color: Option<String>,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
}

/// One of the user's own custom hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomHourEntry {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub room_number: Option<String>,
    pub custom_location: Option<String>,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
}

/// An exam reported by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExamEntry {
    pub id: DbId,
    pub course_id: DbId,
    pub course_name: String,
    pub module_number: String,
    pub duration: i32,
    pub room_number: Option<String>,
    pub is_verified: bool,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
}

/// A calendar entry, serialized flat with an `event_type` discriminator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum CalendarEntry {
    Timetable(TimetableEntry),
    CustomHour(CustomHourEntry),
    Exam(ExamEntry),
}

impl CalendarEntry {
    pub fn start_time(&self) -> Timestamp {
        match self {
            CalendarEntry::Timetable(e) => e.start_time,
            CalendarEntry::CustomHour(e) => e.start_time,
            CalendarEntry::Exam(e) => e.start_time,
        }
    }

    /// Convert to a subscription-feed event.
    ///
    /// Timetable entries keep their imported UID; custom hours and exams get
    /// `custom-{id}@{realm}` and `exam-{id}@{realm}`.
    pub fn to_feed_event(&self, realm: &str) -> FeedEvent {
        match self {
            CalendarEntry::Timetable(e) => FeedEvent {
                uid: e.uid.clone(),
                start: e.start_time,
                end: e.end_time,
                summary: e.summary.clone(),
                description: e.description.clone(),
                location: e.location.clone(),
            },
            CalendarEntry::CustomHour(e) => FeedEvent {
                uid: format!("custom-{}@{realm}", e.id),
                start: e.start_time,
                end: e.end_time,
                summary: e.title.clone(),
                description: e.description.clone(),
                location: e.room_number.clone().or_else(|| e.custom_location.clone()),
            },
            CalendarEntry::Exam(e) => FeedEvent {
                uid: format!("exam-{}@{realm}", e.id),
                start: e.start_time,
                end: e.end_time,
                summary: format!("Klausur: {}", e.course_name),
                description: Some(format!(
                    "{} ({} min){}",
                    e.module_number,
                    e.duration,
                    if e.is_verified { ", verifiziert" } else { "" }
                )),
                location: e.room_number.clone(),
            },
        }
    }
}

/// Order entries by start time.
pub fn sort_entries(entries: &mut [CalendarEntry]) {
    entries.sort_by_key(CalendarEntry::start_time);
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn exam() -> ExamEntry {
        let start = Utc.with_ymd_and_hms(2025, 2, 14, 9, 0, 0).unwrap();
        ExamEntry {
            id: 7,
            course_id: 3,
            course_name: "Algorithmen".to_string(),
            module_number: "I231".to_string(),
            duration: 90,
            room_number: None,
            is_verified: true,
            start_time: start,
            end_time: start + Duration::minutes(90),
        }
    }

    fn custom_hour() -> CustomHourEntry {
        CustomHourEntry {
            id: 12,
            title: "Lerngruppe".to_string(),
            description: None,
            room_number: None,
            custom_location: Some("Bibliothek".to_string()),
            start_time: Utc.with_ymd_and_hms(2025, 2, 13, 16, 0, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2025, 2, 13, 18, 0, 0).unwrap(),
        }
    }

    #[test]
    fn serializes_with_event_type() {
        let json = serde_json::to_value(CalendarEntry::Exam(exam())).unwrap();
        assert_eq!(json["event_type"], "exam");
        assert_eq!(json["duration"], 90);
        assert_eq!(json["is_verified"], true);

        let json = serde_json::to_value(CalendarEntry::CustomHour(custom_hour())).unwrap();
        assert_eq!(json["event_type"], "custom_hour");
        assert_eq!(json["title"], "Lerngruppe");
    }

    #[test]
    fn synthesized_uids() {
        assert_eq!(
            CalendarEntry::Exam(exam()).to_feed_event("campus").uid,
            "exam-7@campus"
        );
        let custom = CalendarEntry::CustomHour(custom_hour()).to_feed_event("campus");
        assert_eq!(custom.uid, "custom-12@campus");
        assert_eq!(custom.location.as_deref(), Some("Bibliothek"));
    }

    #[test]
    fn sorting() {
        let mut entries = vec![
            CalendarEntry::Exam(exam()),
            CalendarEntry::CustomHour(custom_hour()),
        ];
        sort_entries(&mut entries);
        assert!(matches!(entries[0], CalendarEntry::CustomHour(_)));
    }
}
