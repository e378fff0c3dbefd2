//! Repository for the `users` table.

use campus_core::types::DbId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::user::{UpsertUser, User};

const COLUMNS: &str = "id, tenant_id, external_id, email, roles, zenturie_id, calendar_token, \
    created_at, updated_at";

pub struct UserRepo;

impl UserRepo {
    /// Insert or refresh a user keyed by `(tenant_id, external_id)`.
    ///
    /// Email and roles follow the latest token; the calendar token is only
    /// generated on first insert.
    pub async fn upsert(pool: &PgPool, input: &UpsertUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (tenant_id, external_id, email, roles, calendar_token)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT ON CONSTRAINT uq_users_tenant_external
             DO UPDATE SET email = EXCLUDED.email, roles = EXCLUDED.roles, updated_at = now()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(input.tenant_id)
            .bind(&input.external_id)
            .bind(&input.email)
            .bind(&input.roles)
            .bind(Uuid::new_v4())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Case-insensitive email lookup within a tenant.
    pub async fn find_by_email(
        pool: &PgPool,
        tenant_id: DbId,
        email: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users WHERE tenant_id = $1 AND lower(email) = lower($2)
             ORDER BY id LIMIT 1"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(tenant_id)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_calendar_token(
        pool: &PgPool,
        token: Uuid,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE calendar_token = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(token)
            .fetch_optional(pool)
            .await
    }

    /// Replace the calendar token, invalidating existing subscriptions.
    pub async fn rotate_calendar_token(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET calendar_token = $2, updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(Uuid::new_v4())
            .fetch_optional(pool)
            .await
    }

    pub async fn set_zenturie(
        pool: &PgPool,
        id: DbId,
        zenturie_id: DbId,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET zenturie_id = $2, updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(zenturie_id)
            .fetch_optional(pool)
            .await
    }
}
