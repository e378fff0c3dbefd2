//! Room-number conventions.
//!
//! Room numbers look like `A104` or `B2.05`: the first letter names the
//! building and the first digit after it names the floor.

/// Building and floor derived from a room number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomLocation {
    /// First alphabetic character of the room number.
    pub building: Option<String>,
    /// First digit following the building letter.
    pub floor: Option<i32>,
}

/// Split a room number into building and floor.
///
/// ```
/// use campus_core::room::parse_room_number;
///
/// let loc = parse_room_number("A104");
/// assert_eq!(loc.building.as_deref(), Some("A"));
/// assert_eq!(loc.floor, Some(1));
/// ```
pub fn parse_room_number(room_number: &str) -> RoomLocation {
    let mut chars = room_number.chars();
    let building = chars.by_ref().find(|c| c.is_alphabetic());
    let floor = building.and_then(|_| {
        chars
            .find(|c| c.is_ascii_digit())
            .and_then(|c| c.to_digit(10))
            .map(|d| d as i32)
    });

    RoomLocation {
        building: building.map(|c| c.to_string()),
        floor,
    }
}
