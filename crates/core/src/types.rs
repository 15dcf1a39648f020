/// All application-owned primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Users are owned by Supabase Auth and identified by their `sub` UUID.
pub type UserId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
