//! Row models and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` struct matching a row
//! (or a joined read view) and, where rows are written, an input struct.

pub mod course;
pub mod custom_hour;
pub mod exam;
pub mod friendship;
pub mod room;
pub mod tenant;
pub mod timetable_event;
pub mod user;
pub mod zenturie;
