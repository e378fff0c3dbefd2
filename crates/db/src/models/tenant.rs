//! Tenant model.

use campus_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `tenants` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tenant {
    pub id: DbId,
    pub slug: String,
    pub name: String,
    pub realm_id: String,
    pub identity_provider_url: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering a tenant.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTenant {
    pub slug: String,
    pub name: String,
    pub realm_id: String,
    pub identity_provider_url: String,
}
