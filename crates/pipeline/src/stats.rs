//! Counters reported by one ingestion run.

use std::ops::AddAssign;

use campus_core::change::ChangeKind;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    pub files_downloaded: u64,
    pub events_created: u64,
    pub events_updated: u64,
    pub events_unchanged: u64,
    pub errors: u64,
}

impl IngestStats {
    pub fn record(&mut self, kind: ChangeKind) {
        match kind {
            ChangeKind::Created => self.events_created += 1,
            ChangeKind::Updated => self.events_updated += 1,
            ChangeKind::Unchanged => self.events_unchanged += 1,
        }
    }

    pub fn record_error(&mut self) {
        self.errors += 1;
    }
}

impl AddAssign for IngestStats {
    fn add_assign(&mut self, other: Self) {
        self.files_downloaded += other.files_downloaded;
        self.events_created += other.events_created;
        self.events_updated += other.events_updated;
        self.events_unchanged += other.events_unchanged;
        self.errors += other.errors;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_and_merge() {
        let mut a = IngestStats::default();
        a.record(ChangeKind::Created);
        a.record(ChangeKind::Unchanged);
        a.record_error();

        let mut b = IngestStats {
            files_downloaded: 2,
            ..Default::default()
        };
        b.record(ChangeKind::Updated);
        b += a;

        assert_eq!(
            b,
            IngestStats {
                files_downloaded: 2,
                events_created: 1,
                events_updated: 1,
                events_unchanged: 1,
                errors: 1,
            }
        );
    }
}
