//! The storage seam used by the reconciler.
//!
//! [`PgStore`] forwards to the `campus-db` repositories. Tests substitute an
//! in-memory implementation.

use async_trait::async_trait;
use campus_core::types::DbId;
use campus_db::models::room::NewRoom;
use campus_db::models::timetable_event::{NewTimetableEvent, TimetableEvent};
use campus_db::repositories::{
    CourseRepo, RoomRepo, TenantRepo, TimetableEventRepo, ZenturieRepo,
};
use campus_db::DbPool;

pub type StoreError = sqlx::Error;

/// A tenant to ingest for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantRef {
    pub id: DbId,
    pub slug: String,
}

/// A cohort registered for ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CohortRef {
    pub id: DbId,
    pub name: String,
}

#[async_trait]
pub trait TimetableStore: Send + Sync {
    async fn active_tenants(&self) -> Result<Vec<TenantRef>, StoreError>;

    async fn cohorts(&self, tenant_id: DbId) -> Result<Vec<CohortRef>, StoreError>;

    /// Id of the cohort named `name`, created with `year` when missing.
    async fn ensure_zenturie(
        &self,
        tenant_id: DbId,
        name: &str,
        year: &str,
    ) -> Result<DbId, StoreError>;

    /// Id of the course for `module_number`, created when missing.
    async fn ensure_course(
        &self,
        tenant_id: DbId,
        module_number: &str,
        name: &str,
        year: &str,
    ) -> Result<DbId, StoreError>;

    /// Id of the room, created when missing.
    async fn ensure_room(&self, room: &NewRoom) -> Result<DbId, StoreError>;

    async fn find_event(
        &self,
        zenturie_id: DbId,
        uid: &str,
    ) -> Result<Option<TimetableEvent>, StoreError>;

    async fn insert_event(&self, event: &NewTimetableEvent) -> Result<(), StoreError>;

    async fn update_event(&self, id: DbId, event: &NewTimetableEvent) -> Result<(), StoreError>;
}

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TimetableStore for PgStore {
    async fn active_tenants(&self) -> Result<Vec<TenantRef>, StoreError> {
        Ok(TenantRepo::list_active(&self.pool)
            .await?
            .into_iter()
            .map(|t| TenantRef {
                id: t.id,
                slug: t.slug,
            })
            .collect())
    }

    async fn cohorts(&self, tenant_id: DbId) -> Result<Vec<CohortRef>, StoreError> {
        Ok(ZenturieRepo::list(&self.pool, tenant_id)
            .await?
            .into_iter()
            .map(|z| CohortRef {
                id: z.id,
                name: z.name,
            })
            .collect())
    }

    async fn ensure_zenturie(
        &self,
        tenant_id: DbId,
        name: &str,
        year: &str,
    ) -> Result<DbId, StoreError> {
        if let Some(existing) = ZenturieRepo::find_by_name(&self.pool, tenant_id, name).await? {
            return Ok(existing.id);
        }
        Ok(ZenturieRepo::create_if_missing(&self.pool, tenant_id, name, year)
            .await?
            .id)
    }

    async fn ensure_course(
        &self,
        tenant_id: DbId,
        module_number: &str,
        name: &str,
        year: &str,
    ) -> Result<DbId, StoreError> {
        if let Some(existing) =
            CourseRepo::find_by_module_number(&self.pool, tenant_id, module_number).await?
        {
            return Ok(existing.id);
        }
        Ok(
            CourseRepo::create_if_missing(&self.pool, tenant_id, module_number, name, year)
                .await?
                .id,
        )
    }

    async fn ensure_room(&self, room: &NewRoom) -> Result<DbId, StoreError> {
        if let Some(existing) =
            RoomRepo::find_by_number(&self.pool, room.tenant_id, &room.room_number).await?
        {
            return Ok(existing.id);
        }
        Ok(RoomRepo::create_if_missing(&self.pool, room).await?.id)
    }

    async fn find_event(
        &self,
        zenturie_id: DbId,
        uid: &str,
    ) -> Result<Option<TimetableEvent>, StoreError> {
        TimetableEventRepo::find_by_uid(&self.pool, zenturie_id, uid).await
    }

    async fn insert_event(&self, event: &NewTimetableEvent) -> Result<(), StoreError> {
        TimetableEventRepo::insert(&self.pool, event).await?;
        Ok(())
    }

    async fn update_event(&self, id: DbId, event: &NewTimetableEvent) -> Result<(), StoreError> {
        TimetableEventRepo::update_tracked(&self.pool, id, event).await?;
        Ok(())
    }
}
