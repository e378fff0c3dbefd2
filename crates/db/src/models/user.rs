//! User model.

use campus_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub tenant_id: DbId,
    pub external_id: String,
    pub email: String,
    pub roles: Vec<String>,
    pub zenturie_id: Option<DbId>,
    pub calendar_token: Uuid,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Identity claims used to upsert a user on each authenticated request.
#[derive(Debug, Clone)]
pub struct UpsertUser {
    pub tenant_id: DbId,
    pub external_id: String,
    pub email: String,
    pub roles: Vec<String>,
}
