/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// The institution's wall-clock timezone. Floating calendar times and
/// day boundaries are interpreted here; everything is persisted in UTC.
pub const INSTITUTION_TZ: chrono_tz::Tz = chrono_tz::Europe::Berlin;
