//! Database schema and types

use chrono::{DateTime, Utc};

/// SQL schema for initialization
pub const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS form_records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    payload BLOB NOT NULL,
    owner_channel_id TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_form_records_owner ON form_records(owner_channel_id);
";

/// A persisted form record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRecord {
    pub id: i64,
    /// Encoded answer set, see `crate::codec`
    pub payload: Vec<u8>,
    /// Private channel the answers were collected through
    pub owner_channel_id: String,
    pub created_at: DateTime<Utc>,
}
