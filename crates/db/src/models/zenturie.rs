//! Cohort ("zenturie") model.

use campus_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `zenturien` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Zenturie {
    pub id: DbId,
    pub tenant_id: DbId,
    pub name: String,
    pub year: String,
    pub created_at: Timestamp,
}
