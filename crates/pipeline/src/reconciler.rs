//! Reconciles parsed feed events against stored timetable rows.

use std::sync::Arc;

use campus_core::change::ChangeKind;
use campus_core::cohort::year_tag;
use campus_core::ical::ParsedEvent;
use campus_core::types::DbId;
use campus_db::models::room::NewRoom;
use campus_db::models::timetable_event::NewTimetableEvent;

use crate::stats::IngestStats;
use crate::store::{StoreError, TimetableStore};

/// Writes parsed events into the store, rewriting rows only when a tracked
/// field changed.
#[derive(Clone)]
pub struct Reconciler {
    store: Arc<dyn TimetableStore>,
}

impl Reconciler {
    pub fn new(store: Arc<dyn TimetableStore>) -> Self {
        Self { store }
    }

    /// Reconcile all events of one feed for a cohort, in source order.
    ///
    /// Per-event failures are logged and counted; they never abort the batch.
    pub async fn reconcile_feed(
        &self,
        tenant_id: DbId,
        cohort: &str,
        events: &[ParsedEvent],
    ) -> IngestStats {
        let mut stats = IngestStats::default();
        let year = year_tag(cohort);

        let zenturie_id = match self.store.ensure_zenturie(tenant_id, cohort, &year).await {
            Ok(id) => id,
            Err(e) => {
                tracing::error!(tenant_id, cohort, error = %e, "Failed to resolve cohort");
                stats.errors += events.len() as u64;
                return stats;
            }
        };

        for event in events {
            if let Err(reason) = event.validate() {
                tracing::warn!(tenant_id, cohort, uid = %event.uid, reason = %reason, "Skipping invalid event");
                stats.record_error();
                continue;
            }

            match self.reconcile_event(tenant_id, zenturie_id, &year, event).await {
                Ok(kind) => stats.record(kind),
                Err(e) => {
                    tracing::error!(tenant_id, cohort, uid = %event.uid, error = %e, "Failed to store event");
                    stats.record_error();
                }
            }
        }

        stats
    }

    async fn reconcile_event(
        &self,
        tenant_id: DbId,
        zenturie_id: DbId,
        year: &str,
        event: &ParsedEvent,
    ) -> Result<ChangeKind, StoreError> {
        let course_id = match event.course_key() {
            Some(module_number) => {
                let name = event.course_name.as_deref().unwrap_or(&event.summary);
                Some(
                    self.store
                        .ensure_course(tenant_id, module_number, name, year)
                        .await?,
                )
            }
            None => None,
        };

        let room_id = match event.room_number.as_deref() {
            Some(number) => {
                let room = NewRoom::new(tenant_id, number, event.room_name.as_deref());
                Some(self.store.ensure_room(&room).await?)
            }
            None => None,
        };

        let candidate = NewTimetableEvent {
            tenant_id,
            zenturie_id,
            course_id,
            room_id,
            uid: event.uid.clone(),
            summary: event.summary.clone(),
            description: event.description.clone(),
            location: event.location.clone(),
            professor: event.professor.clone(),
            course_type: event.course_type.clone(),
            course_code: event.module_number.clone(),
            start_time: event.start,
            end_time: event.end,
        };

        match self.store.find_event(zenturie_id, &event.uid).await? {
            None => {
                self.store.insert_event(&candidate).await?;
                Ok(ChangeKind::Created)
            }
            Some(existing) if existing.tracked().differs_from(&candidate.tracked()) => {
                self.store.update_event(existing.id, &candidate).await?;
                Ok(ChangeKind::Updated)
            }
            Some(_) => Ok(ChangeKind::Unchanged),
        }
    }
}
