/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Status catalog ids are SMALLSERIAL/SMALLINT.
pub type StatusId = i16;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
