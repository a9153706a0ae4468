//! Database module for gobot
//!
//! Provides persistence for completed form records.

mod schema;

pub use schema::*;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Record not found: {0}")]
    RecordNotFound(i64),
}

pub type DbResult<T> = Result<T, DbError>;

/// Thread-safe database handle
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    #[allow(dead_code)] // Used in tests
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn run_migrations(&self) -> DbResult<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    // ==================== Record Operations ====================

    /// Store an encoded answer set, returning the generated record id
    pub fn insert_record(&self, payload: &[u8], owner_channel_id: &str) -> DbResult<i64> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO form_records (payload, owner_channel_id, created_at) VALUES (?1, ?2, ?3)",
            params![payload, owner_channel_id, Utc::now().to_rfc3339()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Get record by ID
    pub fn get_record(&self, id: i64) -> DbResult<FormRecord> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, payload, owner_channel_id, created_at FROM form_records WHERE id = ?1",
        )?;

        stmt.query_row(params![id], |row| {
            Ok(FormRecord {
                id: row.get(0)?,
                payload: row.get(1)?,
                owner_channel_id: row.get(2)?,
                created_at: parse_datetime(&row.get::<_, String>(3)?),
            })
        })
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => DbError::RecordNotFound(id),
            other => DbError::Sqlite(other),
        })
    }

    /// Number of stored records
    #[allow(dead_code)] // Used in tests
    pub fn count_records(&self) -> DbResult<i64> {
        let count = self
            .conn()
            .query_row("SELECT COUNT(*) FROM form_records", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get_record() {
        let db = Database::open_in_memory().unwrap();

        let id = db.insert_record(br#"{"favorite_food":"Pizza"}"#, "dm-1").unwrap();
        let record = db.get_record(id).unwrap();

        assert_eq!(record.id, id);
        assert_eq!(record.payload, br#"{"favorite_food":"Pizza"}"#.to_vec());
        assert_eq!(record.owner_channel_id, "dm-1");
    }

    #[test]
    fn test_record_ids_are_generated_in_order() {
        let db = Database::open_in_memory().unwrap();

        let first = db.insert_record(b"a", "dm-1").unwrap();
        let second = db.insert_record(b"b", "dm-2").unwrap();

        assert!(second > first);
        assert_eq!(db.count_records().unwrap(), 2);
    }

    #[test]
    fn test_missing_record() {
        let db = Database::open_in_memory().unwrap();

        let result = db.get_record(42);
        assert!(matches!(result, Err(DbError::RecordNotFound(42))));
    }

    #[test]
    fn test_records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gobot.db");

        let id = {
            let db = Database::open(&path).unwrap();
            db.insert_record(b"payload", "dm-9").unwrap()
        };

        let db = Database::open(&path).unwrap();
        assert_eq!(db.get_record(id).unwrap().owner_channel_id, "dm-9");
    }
}
