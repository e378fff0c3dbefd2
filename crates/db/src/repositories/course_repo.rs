//! Repository for the `courses` table.

use campus_core::types::DbId;
use sqlx::PgPool;

use crate::models::course::Course;

const COLUMNS: &str = "id, tenant_id, module_number, name, year, created_at";

pub struct CourseRepo;

impl CourseRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Course>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM courses WHERE id = $1");
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_module_number(
        pool: &PgPool,
        tenant_id: DbId,
        module_number: &str,
    ) -> Result<Option<Course>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM courses WHERE tenant_id = $1 AND module_number = $2");
        sqlx::query_as::<_, Course>(&query)
            .bind(tenant_id)
            .bind(module_number)
            .fetch_optional(pool)
            .await
    }

    /// Return the course for `module_number`, inserting it on first sight.
    ///
    /// An existing row keeps its name and year.
    pub async fn create_if_missing(
        pool: &PgPool,
        tenant_id: DbId,
        module_number: &str,
        name: &str,
        year: &str,
    ) -> Result<Course, sqlx::Error> {
        let query = format!(
            "INSERT INTO courses (tenant_id, module_number, name, year)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT ON CONSTRAINT uq_courses_tenant_module
             DO UPDATE SET module_number = EXCLUDED.module_number
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(tenant_id)
            .bind(module_number)
            .bind(name)
            .bind(year)
            .fetch_one(pool)
            .await
    }
}
