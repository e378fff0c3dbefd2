//! Course model.

use campus_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `courses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Course {
    pub id: DbId,
    pub tenant_id: DbId,
    pub module_number: String,
    pub name: String,
    pub year: String,
    pub created_at: Timestamp,
}
