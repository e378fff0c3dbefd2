//! Room extraction from `LOCATION` values.

use std::sync::LazyLock;

use regex::Regex;

static ROOM_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z]\d+").expect("valid regex"));

/// Values up to this many characters are taken as a bare room number.
const BARE_ROOM_MAX_CHARS: usize = 4;

/// Room information carried by a `LOCATION` value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationFields {
    pub room_number: Option<String>,
    /// The full location text when it is more than a bare room number.
    pub room_name: Option<String>,
}

/// Extract the room number (and display name) from a location value.
///
/// Short values (up to four characters) are the room number verbatim.
/// Longer values contribute the first `[A-Z]\d+` match as the room number
/// and their full text as the display name.
pub fn parse_location(value: &str) -> LocationFields {
    let value = value.trim();
    if value.is_empty() {
        return LocationFields::default();
    }

    if value.chars().count() <= BARE_ROOM_MAX_CHARS {
        return LocationFields {
            room_number: Some(value.to_string()),
            room_name: None,
        };
    }

    match ROOM_NUMBER_RE.find(value) {
        Some(m) => LocationFields {
            room_number: Some(m.as_str().to_string()),
            room_name: Some(value.to_string()),
        },
        None => LocationFields::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_room_number() {
        let loc = parse_location("A104");
        assert_eq!(loc.room_number.as_deref(), Some("A104"));
        assert_eq!(loc.room_name, None);
    }

    #[test]
    fn long_location_extracts_first_match() {
        let loc = parse_location("Hörsaal B201 (Hauptgebäude), C305");
        assert_eq!(loc.room_number.as_deref(), Some("B201"));
        assert_eq!(
            loc.room_name.as_deref(),
            Some("Hörsaal B201 (Hauptgebäude), C305")
        );
    }

    #[test]
    fn long_location_without_room() {
        assert_eq!(parse_location("Online via Zoom"), LocationFields::default());
    }

    #[test]
    fn empty_location() {
        assert_eq!(parse_location("  "), LocationFields::default());
    }
}
