//! Repository for the `zenturien` table.

use campus_core::types::DbId;
use sqlx::PgPool;

use crate::models::zenturie::Zenturie;

const COLUMNS: &str = "id, tenant_id, name, year, created_at";

pub struct ZenturieRepo;

impl ZenturieRepo {
    /// All cohorts of a tenant ordered by name.
    pub async fn list(pool: &PgPool, tenant_id: DbId) -> Result<Vec<Zenturie>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM zenturien WHERE tenant_id = $1 ORDER BY name");
        sqlx::query_as::<_, Zenturie>(&query)
            .bind(tenant_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Zenturie>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM zenturien WHERE id = $1");
        sqlx::query_as::<_, Zenturie>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_name(
        pool: &PgPool,
        tenant_id: DbId,
        name: &str,
    ) -> Result<Option<Zenturie>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM zenturien WHERE tenant_id = $1 AND name = $2");
        sqlx::query_as::<_, Zenturie>(&query)
            .bind(tenant_id)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Return the cohort named `name`, inserting it with `year` on first sight.
    ///
    /// An existing row keeps its year.
    pub async fn create_if_missing(
        pool: &PgPool,
        tenant_id: DbId,
        name: &str,
        year: &str,
    ) -> Result<Zenturie, sqlx::Error> {
        let query = format!(
            "INSERT INTO zenturien (tenant_id, name, year)
             VALUES ($1, $2, $3)
             ON CONFLICT ON CONSTRAINT uq_zenturien_tenant_name
             DO UPDATE SET name = EXCLUDED.name
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Zenturie>(&query)
            .bind(tenant_id)
            .bind(name)
            .bind(year)
            .fetch_one(pool)
            .await
    }
}
