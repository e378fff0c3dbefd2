//! Fire-and-forget work that must not hold up a request.
//!
//! - [`BackgroundTasks`] bounded executor tied to the server lifecycle.
//! - [`EmailDelivery`] SMTP notifications (friend requests).

pub mod background;
pub mod email;

pub use background::BackgroundTasks;
pub use email::{EmailConfig, EmailDelivery, EmailError, Notification};
