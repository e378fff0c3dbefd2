//! Friendship model.

use campus_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `friendships` table. Pending while `accepted_at` is null.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Friendship {
    pub id: DbId,
    pub requester_id: DbId,
    pub addressee_id: DbId,
    pub accepted_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// A pending request as seen by its addressee.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct IncomingRequest {
    pub id: DbId,
    pub requester_id: DbId,
    pub requester_email: String,
    pub created_at: Timestamp,
}

/// An accepted friend of the current user.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Friend {
    pub user_id: DbId,
    pub email: String,
    pub since: Timestamp,
}
