//! `VEVENT` segmentation and typed property handling.

use super::description::{self, DescriptionFields};
use super::lexer;
use super::location::{self, LocationFields};
use super::text;
use super::time;
use crate::types::Timestamp;

/// Course types that never create a course row (electives and meta events).
pub const COURSELESS_TYPES: [&str; 2] = ["WP", "Z"];

/// Properties the parser understands. Everything else is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    Begin,
    End,
    Uid,
    Summary,
    DtStamp,
    Transp,
    Sequence,
    Priority,
    Class,
    Categories,
    DtStart,
    DtEnd,
    Location,
    Description,
    Unknown,
}

impl Property {
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "BEGIN" => Property::Begin,
            "END" => Property::End,
            "UID" => Property::Uid,
            "SUMMARY" => Property::Summary,
            "DTSTAMP" => Property::DtStamp,
            "TRANSP" => Property::Transp,
            "SEQUENCE" => Property::Sequence,
            "PRIORITY" => Property::Priority,
            "CLASS" => Property::Class,
            "CATEGORIES" => Property::Categories,
            "DTSTART" => Property::DtStart,
            "DTEND" => Property::DtEnd,
            "LOCATION" => Property::Location,
            "DESCRIPTION" => Property::Description,
            _ => Property::Unknown,
        }
    }
}

/// One event extracted from a feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEvent {
    pub uid: String,
    pub summary: String,
    pub dtstamp: Option<Timestamp>,
    pub transp: Option<String>,
    pub sequence: Option<i32>,
    pub priority: Option<i32>,
    pub class: Option<String>,
    pub categories: Vec<String>,
    pub start: Timestamp,
    pub end: Timestamp,
    /// The `LOCATION` text as published.
    pub location: Option<String>,
    pub room_number: Option<String>,
    pub room_name: Option<String>,
    /// The `DESCRIPTION` text, unescaped and flattened to one line.
    pub description: Option<String>,
    pub course_type: Option<String>,
    pub module_number: Option<String>,
    pub course_name: Option<String>,
    pub professor: Option<String>,
    pub break_info: Option<String>,
    pub annotation: Option<String>,
}

impl ParsedEvent {
    /// Whether this event should be linked to a course row.
    ///
    /// Requires a course type outside [`COURSELESS_TYPES`] and a module number.
    pub fn course_key(&self) -> Option<&str> {
        let course_type = self.course_type.as_deref()?;
        if COURSELESS_TYPES.contains(&course_type) {
            return None;
        }
        self.module_number.as_deref()
    }

    /// Check the invariants every stored event must satisfy.
    pub fn validate(&self) -> Result<(), String> {
        if self.uid.trim().is_empty() {
            return Err("event has no UID".to_string());
        }
        if self.start == time::zero() || self.end == time::zero() {
            return Err(format!(
                "event {} has a missing or unparseable start or end",
                self.uid
            ));
        }
        if self.start >= self.end {
            return Err(format!(
                "event {} starts at {} which is not before its end {}",
                self.uid, self.start, self.end
            ));
        }
        Ok(())
    }
}

/// Accumulates properties of one `VEVENT`.
#[derive(Debug, Default)]
struct EventBuilder {
    uid: Option<String>,
    summary: Option<String>,
    dtstamp: Option<Timestamp>,
    transp: Option<String>,
    sequence: Option<i32>,
    priority: Option<i32>,
    class: Option<String>,
    categories: Vec<String>,
    start: Option<Timestamp>,
    end: Option<Timestamp>,
    location: Option<String>,
    location_fields: LocationFields,
    description: Option<String>,
    description_fields: DescriptionFields,
}

impl EventBuilder {
    fn apply(&mut self, property: Property, raw: &str) {
        match property {
            Property::Uid => self.uid = non_empty(raw.trim().to_string()),
            Property::Summary => self.summary = Some(text::inbound(raw)),
            Property::DtStamp => self.dtstamp = Some(time::parse_or_zero(raw, "DTSTAMP")),
            Property::Transp => self.transp = non_empty(text::inbound(raw)),
            Property::Sequence => self.sequence = parse_int(raw, "SEQUENCE"),
            Property::Priority => self.priority = parse_int(raw, "PRIORITY"),
            Property::Class => self.class = non_empty(text::inbound(raw)),
            Property::Categories => {
                self.categories = split_list(raw);
            }
            Property::DtStart => self.start = Some(time::parse_or_zero(raw, "DTSTART")),
            Property::DtEnd => self.end = Some(time::parse_or_zero(raw, "DTEND")),
            Property::Location => {
                let value = text::inbound(raw);
                self.location_fields = location::parse_location(&value);
                self.location = non_empty(value);
            }
            Property::Description => {
                let value = text::inbound(raw);
                self.description_fields = match description::parse_description(&value) {
                    Some(fields) => fields,
                    None => {
                        if !value.trim().is_empty() {
                            tracing::warn!(
                                uid = self.uid.as_deref().unwrap_or(""),
                                "Description does not match the expected layout"
                            );
                        }
                        DescriptionFields::default()
                    }
                };
                self.description = non_empty(value);
            }
            Property::Begin | Property::End | Property::Unknown => {}
        }
    }

    fn build(self) -> ParsedEvent {
        let uid = self.uid.unwrap_or_default();
        let start = self.start.unwrap_or_else(|| {
            tracing::warn!(uid = %uid, "Event has no DTSTART, using zero timestamp");
            time::zero()
        });
        let end = self.end.unwrap_or_else(|| {
            tracing::warn!(uid = %uid, "Event has no DTEND, using zero timestamp");
            time::zero()
        });
        let course = self.description_fields.course.unwrap_or_default();

        ParsedEvent {
            uid,
            summary: self.summary.unwrap_or_default(),
            dtstamp: self.dtstamp,
            transp: self.transp,
            sequence: self.sequence,
            priority: self.priority,
            class: self.class,
            categories: self.categories,
            start,
            end,
            location: self.location,
            room_number: self.location_fields.room_number,
            room_name: self.location_fields.room_name,
            description: self.description,
            course_type: course.course_type,
            module_number: course.module_number,
            course_name: course.name,
            professor: self.description_fields.professor,
            break_info: self.description_fields.break_info,
            annotation: self.description_fields.annotation,
        }
    }
}

/// Parse every `VEVENT` in a calendar document, in source order.
///
/// Lines outside events and components nested inside an event (such as
/// `VALARM`) are ignored. An event left open at end of input is dropped.
pub fn parse_calendar(input: &str) -> Vec<ParsedEvent> {
    let mut events = Vec::new();
    let mut current: Option<EventBuilder> = None;
    let mut nested_depth = 0usize;

    for line in lexer::unfold(input) {
        let Some((name, value)) = lexer::split_property(&line) else {
            continue;
        };
        let property = Property::from_name(name);
        let is_vevent = value.trim().eq_ignore_ascii_case("VEVENT");

        match (property, current.is_some()) {
            (Property::Begin, false) if is_vevent => {
                current = Some(EventBuilder::default());
                nested_depth = 0;
            }
            (Property::Begin, true) => nested_depth += 1,
            (Property::End, true) if nested_depth > 0 => nested_depth -= 1,
            (Property::End, true) if is_vevent => {
                if let Some(builder) = current.take() {
                    events.push(builder.build());
                }
            }
            (_, true) if nested_depth == 0 => {
                if let Some(builder) = current.as_mut() {
                    builder.apply(property, value);
                }
            }
            _ => {}
        }
    }

    if current.is_some() {
        tracing::warn!("Calendar ended inside an unterminated VEVENT");
    }

    events
}

fn non_empty(s: String) -> Option<String> {
    (!s.trim().is_empty()).then_some(s)
}

fn parse_int(raw: &str, property: &str) -> Option<i32> {
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(property, value = raw, error = %e, "Unparseable integer property");
            None
        }
    }
}

/// Split a comma-separated list value, honouring `\,` escapes.
fn split_list(raw: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                current.push('\\');
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            ',' => items.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }
    items.push(current);

    items
        .into_iter()
        .map(|item| text::inbound(item.trim()))
        .filter(|item| !item.is_empty())
        .collect()
}
