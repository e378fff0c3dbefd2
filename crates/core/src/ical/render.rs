//! The outbound subscription feed.

use super::text::escape;
use super::time::format_utc;
use crate::types::Timestamp;

/// Maximum octets per output line before folding (RFC 5545 §3.1).
const MAX_LINE_OCTETS: usize = 75;

pub const PRODID: &str = "-//Campus//Timetable Subscription//DE";

/// One `VEVENT` of a rendered feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEvent {
    pub uid: String,
    pub start: Timestamp,
    pub end: Timestamp,
    pub summary: String,
    pub description: Option<String>,
    pub location: Option<String>,
}

/// Render a complete `VCALENDAR` document with CRLF line endings.
///
/// `now` is used for every `DTSTAMP`.
pub fn render_feed(calendar_name: &str, events: &[FeedEvent], now: Timestamp) -> String {
    let mut out = String::new();
    let stamp = format_utc(now);

    push_line(&mut out, "BEGIN:VCALENDAR");
    push_line(&mut out, "VERSION:2.0");
    push_line(&mut out, &format!("PRODID:{PRODID}"));
    push_line(&mut out, "CALSCALE:GREGORIAN");
    push_line(&mut out, "METHOD:PUBLISH");
    push_line(&mut out, &format!("X-WR-CALNAME:{}", escape(calendar_name)));
    push_line(&mut out, "X-WR-TIMEZONE:Europe/Berlin");

    for event in events {
        push_line(&mut out, "BEGIN:VEVENT");
        push_line(&mut out, &format!("UID:{}", event.uid));
        push_line(&mut out, &format!("DTSTAMP:{stamp}"));
        push_line(&mut out, &format!("DTSTART:{}", format_utc(event.start)));
        push_line(&mut out, &format!("DTEND:{}", format_utc(event.end)));
        push_line(&mut out, &format!("SUMMARY:{}", escape(&event.summary)));
        if let Some(description) = event.description.as_deref().filter(|d| !d.is_empty()) {
            push_line(&mut out, &format!("DESCRIPTION:{}", escape(description)));
        }
        if let Some(location) = event.location.as_deref().filter(|l| !l.is_empty()) {
            push_line(&mut out, &format!("LOCATION:{}", escape(location)));
        }
        push_line(&mut out, "END:VEVENT");
    }

    push_line(&mut out, "END:VCALENDAR");
    out
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(&fold(line));
    out.push_str("\r\n");
}

/// Fold a content line into chunks of at most 75 octets.
///
/// Continuation chunks start with a single space, which counts towards the
/// limit. Splits never fall inside a UTF-8 sequence.
pub fn fold(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }

    let mut out = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3);
    let mut rest = line;
    let mut limit = MAX_LINE_OCTETS;

    while rest.len() > limit {
        let mut cut = limit;
        while !rest.is_char_boundary(cut) {
            cut -= 1;
        }
        out.push_str(&rest[..cut]);
        out.push_str("\r\n ");
        rest = &rest[cut..];
        limit = MAX_LINE_OCTETS - 1;
    }
    out.push_str(rest);
    out
}
