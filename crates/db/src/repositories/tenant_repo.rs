//! Repository for the `tenants` table.

use campus_core::types::DbId;
use sqlx::PgPool;

use crate::models::tenant::{CreateTenant, Tenant};

const COLUMNS: &str =
    "id, slug, name, realm_id, identity_provider_url, is_active, created_at, updated_at";

pub struct TenantRepo;

impl TenantRepo {
    /// Insert a tenant. A duplicate slug fails on `uq_tenants_slug`.
    pub async fn create(pool: &PgPool, input: &CreateTenant) -> Result<Tenant, sqlx::Error> {
        let query = format!(
            "INSERT INTO tenants (slug, name, realm_id, identity_provider_url)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tenant>(&query)
            .bind(&input.slug)
            .bind(&input.name)
            .bind(&input.realm_id)
            .bind(&input.identity_provider_url)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Tenant>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tenants WHERE id = $1");
        sqlx::query_as::<_, Tenant>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an active tenant by slug.
    pub async fn find_active_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<Tenant>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tenants WHERE slug = $1 AND is_active");
        sqlx::query_as::<_, Tenant>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// All tenants, including inactive ones, oldest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Tenant>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tenants ORDER BY id");
        sqlx::query_as::<_, Tenant>(&query).fetch_all(pool).await
    }

    /// All active tenants, oldest first.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<Tenant>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tenants WHERE is_active ORDER BY id");
        sqlx::query_as::<_, Tenant>(&query).fetch_all(pool).await
    }
}
