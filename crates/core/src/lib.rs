//! Domain logic for the campus scheduling backend.
//!
//! This crate has no internal dependencies so it can be shared by the
//! database layer, the ingestion pipeline, and the HTTP API alike.

pub mod calendar;
pub mod change;
pub mod cohort;
pub mod custom_hour;
pub mod error;
pub mod exam;
pub mod ical;
pub mod occupancy;
pub mod roles;
pub mod room;
pub mod schedule;
pub mod tenant;
pub mod time_range;
pub mod types;
