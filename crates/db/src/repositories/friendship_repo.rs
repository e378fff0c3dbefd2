//! Repository for the `friendships` table.

use campus_core::types::DbId;
use sqlx::PgPool;

use crate::models::friendship::{Friend, Friendship, IncomingRequest};

const COLUMNS: &str = "id, requester_id, addressee_id, accepted_at, created_at";

pub struct FriendshipRepo;

impl FriendshipRepo {
    /// Whether any edge exists between two users, in either direction.
    pub async fn exists_between(pool: &PgPool, a: DbId, b: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (
                 SELECT 1 FROM friendships
                 WHERE (requester_id = $1 AND addressee_id = $2)
                    OR (requester_id = $2 AND addressee_id = $1))",
        )
        .bind(a)
        .bind(b)
        .fetch_one(pool)
        .await
    }

    pub async fn create_request(
        pool: &PgPool,
        requester_id: DbId,
        addressee_id: DbId,
    ) -> Result<Friendship, sqlx::Error> {
        let query = format!(
            "INSERT INTO friendships (requester_id, addressee_id)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Friendship>(&query)
            .bind(requester_id)
            .bind(addressee_id)
            .fetch_one(pool)
            .await
    }

    /// Pending requests addressed to `user_id`, newest first.
    pub async fn list_incoming(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<IncomingRequest>, sqlx::Error> {
        sqlx::query_as::<_, IncomingRequest>(
            "SELECT f.id, f.requester_id, u.email AS requester_email, f.created_at
             FROM friendships f JOIN users u ON u.id = f.requester_id
             WHERE f.addressee_id = $1 AND f.accepted_at IS NULL
             ORDER BY f.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Accept a pending request addressed to `addressee_id`.
    ///
    /// Returns `None` if no such pending request exists.
    pub async fn accept(
        pool: &PgPool,
        id: DbId,
        addressee_id: DbId,
    ) -> Result<Option<Friendship>, sqlx::Error> {
        let query = format!(
            "UPDATE friendships SET accepted_at = now()
             WHERE id = $1 AND addressee_id = $2 AND accepted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Friendship>(&query)
            .bind(id)
            .bind(addressee_id)
            .fetch_optional(pool)
            .await
    }

    /// Accepted friends of `user_id` ordered by email.
    pub async fn list_friends(pool: &PgPool, user_id: DbId) -> Result<Vec<Friend>, sqlx::Error> {
        sqlx::query_as::<_, Friend>(
            "SELECT u.id AS user_id, u.email, f.accepted_at AS since
             FROM friendships f
             JOIN users u ON u.id = CASE WHEN f.requester_id = $1
                                         THEN f.addressee_id ELSE f.requester_id END
             WHERE (f.requester_id = $1 OR f.addressee_id = $1)
               AND f.accepted_at IS NOT NULL
             ORDER BY u.email",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Remove the edge between two users in either direction.
    pub async fn delete_between(pool: &PgPool, a: DbId, b: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM friendships
             WHERE (requester_id = $1 AND addressee_id = $2)
                OR (requester_id = $2 AND addressee_id = $1)",
        )
        .bind(a)
        .bind(b)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
