//! End-to-end ingestion against an HTTP double and an in-memory store.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use campus_core::types::DbId;
use campus_db::models::room::NewRoom;
use campus_db::models::timetable_event::{NewTimetableEvent, TimetableEvent};
use campus_pipeline::fetcher::DEFAULT_TIMEOUT;
use campus_pipeline::store::{CohortRef, StoreError, TenantRef};
use campus_pipeline::{FeedFetcher, IngestJob, IngestPipeline, IngestStats, TimetableStore};
use chrono::Utc;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

#[derive(Default)]
struct State {
    next_id: DbId,
    cohorts: Vec<(DbId, DbId, String, String)>,
    courses: Vec<(DbId, DbId, String, String)>,
    rooms: Vec<(DbId, NewRoom)>,
    events: Vec<TimetableEvent>,
    writes: usize,
}

impl State {
    fn id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    fn with_cohort(name: &str) -> Arc<Self> {
        let store = Arc::new(Self::default());
        {
            let mut s = store.state.lock().unwrap();
            let id = s.id();
            s.cohorts.push((id, 1, name.to_string(), String::new()));
        }
        store
    }

    fn events(&self) -> Vec<TimetableEvent> {
        self.state.lock().unwrap().events.clone()
    }

    fn writes(&self) -> usize {
        self.state.lock().unwrap().writes
    }
}

#[async_trait]
impl TimetableStore for MemoryStore {
    async fn active_tenants(&self) -> Result<Vec<TenantRef>, StoreError> {
        Ok(vec![TenantRef {
            id: 1,
            slug: "default".to_string(),
        }])
    }

    async fn cohorts(&self, tenant_id: DbId) -> Result<Vec<CohortRef>, StoreError> {
        let s = self.state.lock().unwrap();
        Ok(s.cohorts
            .iter()
            .filter(|c| c.1 == tenant_id)
            .map(|c| CohortRef {
                id: c.0,
                name: c.2.clone(),
            })
            .collect())
    }

    async fn ensure_zenturie(
        &self,
        tenant_id: DbId,
        name: &str,
        year: &str,
    ) -> Result<DbId, StoreError> {
        let mut s = self.state.lock().unwrap();
        if let Some(c) = s.cohorts.iter().find(|c| c.1 == tenant_id && c.2 == name) {
            return Ok(c.0);
        }
        let id = s.id();
        s.cohorts
            .push((id, tenant_id, name.to_string(), year.to_string()));
        Ok(id)
    }

    async fn ensure_course(
        &self,
        tenant_id: DbId,
        module_number: &str,
        name: &str,
        _year: &str,
    ) -> Result<DbId, StoreError> {
        let mut s = self.state.lock().unwrap();
        if let Some(c) = s
            .courses
            .iter()
            .find(|c| c.1 == tenant_id && c.2 == module_number)
        {
            return Ok(c.0);
        }
        let id = s.id();
        s.courses
            .push((id, tenant_id, module_number.to_string(), name.to_string()));
        Ok(id)
    }

    async fn ensure_room(&self, room: &NewRoom) -> Result<DbId, StoreError> {
        let mut s = self.state.lock().unwrap();
        if let Some((id, _)) = s
            .rooms
            .iter()
            .find(|(_, r)| r.tenant_id == room.tenant_id && r.room_number == room.room_number)
        {
            return Ok(*id);
        }
        let id = s.id();
        s.rooms.push((id, room.clone()));
        Ok(id)
    }

    async fn find_event(
        &self,
        zenturie_id: DbId,
        uid: &str,
    ) -> Result<Option<TimetableEvent>, StoreError> {
        let s = self.state.lock().unwrap();
        Ok(s.events
            .iter()
            .find(|e| e.zenturie_id == zenturie_id && e.uid == uid)
            .cloned())
    }

    async fn insert_event(&self, event: &NewTimetableEvent) -> Result<(), StoreError> {
        let mut s = self.state.lock().unwrap();
        let id = s.id();
        let now = Utc::now();
        s.events.push(TimetableEvent {
            id,
            tenant_id: event.tenant_id,
            zenturie_id: event.zenturie_id,
            course_id: event.course_id,
            room_id: event.room_id,
            uid: event.uid.clone(),
            summary: event.summary.clone(),
            description: event.description.clone(),
            location: event.location.clone(),
            professor: event.professor.clone(),
            course_type: event.course_type.clone(),
            course_code: event.course_code.clone(),
            color: None,
            start_time: event.start_time,
            end_time: event.end_time,
            created_at: now,
            updated_at: now,
        });
        s.writes += 1;
        Ok(())
    }

    async fn update_event(&self, id: DbId, event: &NewTimetableEvent) -> Result<(), StoreError> {
        let mut s = self.state.lock().unwrap();
        let row = s
            .events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(sqlx::Error::RowNotFound)?;
        row.zenturie_id = event.zenturie_id;
        row.course_id = event.course_id;
        row.room_id = event.room_id;
        row.summary = event.summary.clone();
        row.description = event.description.clone();
        row.location = event.location.clone();
        row.professor = event.professor.clone();
        row.course_type = event.course_type.clone();
        row.course_code = event.course_code.clone();
        row.start_time = event.start_time;
        row.end_time = event.end_time;
        row.updated_at = Utc::now();
        s.writes += 1;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn calendar(events: &[&str]) -> String {
    let mut out = String::from("BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//Test//EN\r\n");
    for event in events {
        out.push_str("BEGIN:VEVENT\r\n");
        out.push_str(event);
        out.push_str("END:VEVENT\r\n");
    }
    out.push_str("END:VCALENDAR\r\n");
    out
}

const ALGORITHMEN: &str = "UID:evt-1\r\n\
DTSTART:20250120T080000Z\r\n\
DTEND:20250120T093000Z\r\n\
SUMMARY:V I231 Algorithmen\r\n\
LOCATION:A104\r\n\
DESCRIPTION:Veranstaltung: V I231 Algorithmen Dozent: Prof. Müller Pause: 15 Raum: A104 Anmerkung: -\r\n";

async fn serve(server: &MockServer, feed_path: &str, body: impl Into<Vec<u8>>, mime: &str) {
    Mock::given(method("GET"))
        .and(path(feed_path))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.into(), mime))
        .mount(server)
        .await;
}

async fn run(server: &MockServer, store: Arc<MemoryStore>) -> IngestStats {
    let fetcher = FeedFetcher::new(&server.uri(), DEFAULT_TIMEOUT).unwrap();
    let pipeline = IngestPipeline::new(store, fetcher);
    pipeline.run(CancellationToken::new()).await.unwrap()
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ingest_then_idempotent() {
    let server = MockServer::start().await;
    serve(&server, "/I24c_1.ics", calendar(&[ALGORITHMEN]), "text/calendar").await;
    let store = MemoryStore::with_cohort("I24c");

    let first = run(&server, store.clone()).await;
    assert_eq!(first.files_downloaded, 1);
    assert_eq!(first.events_created, 1);
    assert_eq!(first.errors, 0);

    let second = run(&server, store.clone()).await;
    assert_eq!(second.events_created, 0);
    assert_eq!(second.events_updated, 0);
    assert_eq!(second.events_unchanged, 1);
    assert_eq!(store.writes(), 1);

    let events = store.events();
    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(event.course_code.as_deref(), Some("I231"));
    assert_eq!(event.professor.as_deref(), Some("Prof. Müller"));

    let s = store.state.lock().unwrap();
    let course = s.courses.iter().find(|c| Some(c.0) == event.course_id).unwrap();
    assert_eq!(course.2, "I231");
    assert_eq!(course.3, "Algorithmen");
    let (_, room) = s.rooms.iter().find(|(id, _)| Some(*id) == event.room_id).unwrap();
    assert_eq!(room.room_number, "A104");
    assert_eq!(room.building.as_deref(), Some("A"));
    assert_eq!(room.floor, Some(1));
}

#[tokio::test]
async fn empty_description_equals_missing_description() {
    let server = MockServer::start().await;
    let with_empty = "UID:evt-2\r\nDTSTART:20250121T080000Z\r\nDTEND:20250121T093000Z\r\n\
SUMMARY:Tutorium\r\nDESCRIPTION:\r\n";
    let without = "UID:evt-2\r\nDTSTART:20250121T080000Z\r\nDTEND:20250121T093000Z\r\n\
SUMMARY:Tutorium\r\n";
    serve(&server, "/I24c_1.ics", calendar(&[with_empty]), "text/calendar").await;
    let store = MemoryStore::with_cohort("I24c");

    assert_eq!(run(&server, store.clone()).await.events_created, 1);

    server.reset().await;
    serve(&server, "/I24c_1.ics", calendar(&[without]), "text/calendar").await;
    let second = run(&server, store.clone()).await;
    assert_eq!(second.events_unchanged, 1);
    assert_eq!(second.events_updated, 0);
}

#[tokio::test]
async fn changed_end_time_updates_row() {
    let server = MockServer::start().await;
    serve(&server, "/I24c_1.ics", calendar(&[ALGORITHMEN]), "text/calendar").await;
    let store = MemoryStore::with_cohort("I24c");
    run(&server, store.clone()).await;

    server.reset().await;
    let moved = ALGORITHMEN.replace("DTEND:20250120T093000Z", "DTEND:20250120T100000Z");
    serve(&server, "/I24c_1.ics", calendar(&[&moved]), "text/calendar").await;
    let second = run(&server, store.clone()).await;

    assert_eq!(second.events_updated, 1);
    assert_eq!(store.events().len(), 1);
    assert_eq!(
        store.events()[0].end_time.to_rfc3339(),
        "2025-01-20T10:00:00+00:00"
    );
}

#[tokio::test]
async fn unparseable_description_is_not_fatal() {
    let server = MockServer::start().await;
    let event = "UID:evt-3\r\nDTSTART:20250122T080000Z\r\nDTEND:20250122T093000Z\r\n\
SUMMARY:Sprechstunde\r\nDESCRIPTION:Bitte vorher anmelden\r\n";
    serve(&server, "/I24c_1.ics", calendar(&[event]), "text/calendar").await;
    let store = MemoryStore::with_cohort("I24c");

    let stats = run(&server, store.clone()).await;
    assert_eq!(stats.events_created, 1);
    assert_eq!(stats.errors, 0);

    let events = store.events();
    assert_eq!(events[0].professor, None);
    assert_eq!(events[0].course_id, None);
    assert_eq!(events[0].description.as_deref(), Some("Bitte vorher anmelden"));
}

#[tokio::test]
async fn electives_stay_courseless() {
    let server = MockServer::start().await;
    let event = "UID:evt-4\r\nDTSTART:20250123T080000Z\r\nDTEND:20250123T093000Z\r\n\
SUMMARY:WP Projektmanagement\r\n\
DESCRIPTION:Veranstaltung: WP W101 Projektmanagement Dozent: Dr. Schmidt Pause: 0 Raum: B201 Anmerkung: -\r\n";
    serve(&server, "/I24c_1.ics", calendar(&[event]), "text/calendar").await;
    let store = MemoryStore::with_cohort("I24c");

    run(&server, store.clone()).await;
    let events = store.events();
    assert_eq!(events[0].course_id, None);
    assert_eq!(events[0].course_type.as_deref(), Some("WP"));
    assert!(store.state.lock().unwrap().courses.is_empty());
}

#[tokio::test]
async fn inverted_times_count_as_errors() {
    let server = MockServer::start().await;
    let inverted = "UID:evt-5\r\nDTSTART:20250124T100000Z\r\nDTEND:20250124T080000Z\r\n\
SUMMARY:Kaputt\r\n";
    let fine = "UID:evt-6\r\nDTSTART:20250124T100000Z\r\nDTEND:20250124T110000Z\r\n\
SUMMARY:Heil\r\n";
    serve(&server, "/I24c_2.ics", calendar(&[inverted, fine]), "text/calendar").await;
    let store = MemoryStore::with_cohort("I24c");

    let stats = run(&server, store.clone()).await;
    assert_eq!(stats.errors, 1);
    assert_eq!(stats.events_created, 1);
    assert_eq!(store.events()[0].uid, "evt-6");
}

#[tokio::test]
async fn unparseable_start_is_an_error_and_dst_gap_start_is_stored() {
    let server = MockServer::start().await;
    let broken = "UID:evt-7\r\nDTSTART:kein-datum\r\nDTEND:20250330T040000\r\n\
SUMMARY:Ohne Beginn\r\nLOCATION:A104\r\n";
    let gap = "UID:evt-8\r\nDTSTART:20250330T023000\r\nDTEND:20250330T040000\r\n\
SUMMARY:Umstellung\r\nLOCATION:A104\r\n";
    serve(&server, "/I24c_3.ics", calendar(&[broken, gap]), "text/calendar").await;
    let store = MemoryStore::with_cohort("I24c");

    let stats = run(&server, store.clone()).await;
    assert_eq!(stats.errors, 1);
    assert_eq!(stats.events_created, 1);

    let events = store.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].uid, "evt-8");
    assert_eq!(events[0].start_time.to_rfc3339(), "2025-03-30T01:30:00+00:00");
    assert_eq!(events[0].end_time.to_rfc3339(), "2025-03-30T02:00:00+00:00");
}

#[tokio::test]
async fn missing_semesters_and_empty_feeds_are_skipped() {
    let server = MockServer::start().await;
    serve(&server, "/I24c_3.ics", calendar(&[]), "text/calendar").await;
    serve(&server, "/I24c_7.ics", calendar(&[ALGORITHMEN]), "text/calendar").await;
    let store = MemoryStore::with_cohort("I24c");

    let stats = run(&server, store.clone()).await;
    assert_eq!(stats.files_downloaded, 2);
    assert_eq!(stats.events_created, 1);
}

#[tokio::test]
async fn encoding_does_not_change_classification() {
    let text = calendar(&[ALGORITHMEN]);
    let latin1: Vec<u8> = text
        .chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap())
        .collect();

    let utf8_server = MockServer::start().await;
    serve(&utf8_server, "/I24c_1.ics", text.clone(), "text/calendar; charset=utf-8").await;
    let latin1_server = MockServer::start().await;
    serve(
        &latin1_server,
        "/I24c_1.ics",
        latin1,
        "text/calendar; charset=ISO-8859-1",
    )
    .await;

    let utf8_store = MemoryStore::with_cohort("I24c");
    let latin1_store = MemoryStore::with_cohort("I24c");

    let a = run(&utf8_server, utf8_store.clone()).await;
    let b = run(&latin1_server, latin1_store.clone()).await;
    assert_eq!(a, b);

    let (a, b) = (&utf8_store.events()[0], &latin1_store.events()[0]);
    assert_eq!(a.professor, b.professor);
    assert_eq!(a.description, b.description);

    // Re-running one feed against the other's store is a no-op.
    let cross = run(&latin1_server, utf8_store).await;
    assert_eq!(cross.events_unchanged, 1);
}
