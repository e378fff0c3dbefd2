//! The line-oriented calendar format (an iCalendar subset).
//!
//! - [`lexer`] -- line unfolding and property splitting.
//! - [`text`] -- TEXT value escaping.
//! - [`time`] -- DATE / DATE-TIME values.
//! - [`location`] -- room extraction from `LOCATION`.
//! - [`description`] -- structured fields embedded in `DESCRIPTION`.
//! - [`event`] -- `VEVENT` segmentation and the typed event builder.
//! - [`render`] -- the outbound subscription feed.

pub mod description;
pub mod event;
pub mod lexer;
pub mod location;
pub mod render;
pub mod text;
pub mod time;

pub use event::{parse_calendar, ParsedEvent};
pub use render::{render_feed, FeedEvent};
