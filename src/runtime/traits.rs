//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the engine with mock implementations.

use crate::gateway::Embed;
use crate::state_machine::FormSession;
use async_trait::async_trait;
use std::sync::Arc;

/// Live form sessions keyed by private channel id.
///
/// Guarantees are per key only. Callers that read, transition and write back
/// a session must hold the channel's lock (see `ChannelLocks`) across the
/// whole sequence.
pub trait SessionStore: Send + Sync {
    /// Insert a fresh session unless one already exists for `channel_id`
    fn create(&self, channel_id: &str, origin_channel_id: &str) -> bool;

    /// Current session, `None` when no form is active in this channel
    fn get(&self, channel_id: &str) -> Option<FormSession>;

    /// Replace the progress of an existing session. Never creates one and
    /// never changes its origin channel.
    fn update(&self, channel_id: &str, session: FormSession) -> bool;

    /// Drop the session; removing a missing session is a no-op
    fn remove(&self, channel_id: &str);
}

/// Durable storage for completed forms
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Store an encoded answer set, returning the generated record id
    async fn insert(&self, payload: &[u8], owner_channel_id: &str) -> Result<i64, String>;

    /// Load a record by id, `None` if it does not exist
    async fn get_by_id(&self, record_id: i64) -> Result<Option<StoredRecord>, String>;
}

/// Raw record as handed back by a `RecordStore`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    pub payload: Vec<u8>,
    pub owner_channel_id: String,
}

/// Outbound side of the chat gateway
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn send_text(&self, channel_id: &str, text: &str) -> Result<(), String>;

    async fn send_embed(&self, channel_id: &str, embed: &Embed) -> Result<(), String>;

    /// Open (or reuse) the one-to-one channel with a user, returning its id
    async fn open_private_channel(&self, user_id: &str) -> Result<String, String>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    fn create(&self, channel_id: &str, origin_channel_id: &str) -> bool {
        (**self).create(channel_id, origin_channel_id)
    }

    fn get(&self, channel_id: &str) -> Option<FormSession> {
        (**self).get(channel_id)
    }

    fn update(&self, channel_id: &str, session: FormSession) -> bool {
        (**self).update(channel_id, session)
    }

    fn remove(&self, channel_id: &str) {
        (**self).remove(channel_id);
    }
}

#[async_trait]
impl<T: RecordStore + ?Sized> RecordStore for Arc<T> {
    async fn insert(&self, payload: &[u8], owner_channel_id: &str) -> Result<i64, String> {
        (**self).insert(payload, owner_channel_id).await
    }

    async fn get_by_id(&self, record_id: i64) -> Result<Option<StoredRecord>, String> {
        (**self).get_by_id(record_id).await
    }
}

#[async_trait]
impl<T: Gateway + ?Sized> Gateway for Arc<T> {
    async fn send_text(&self, channel_id: &str, text: &str) -> Result<(), String> {
        (**self).send_text(channel_id, text).await
    }

    async fn send_embed(&self, channel_id: &str, embed: &Embed) -> Result<(), String> {
        (**self).send_embed(channel_id, embed).await
    }

    async fn open_private_channel(&self, user_id: &str) -> Result<String, String> {
        (**self).open_private_channel(user_id).await
    }
}

// ============================================================================
// Production Adapters
// ============================================================================

use crate::db::{Database, DbError};

/// Adapter to use Database as a `RecordStore`
#[derive(Clone)]
pub struct DatabaseStorage {
    db: Database,
}

impl DatabaseStorage {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecordStore for DatabaseStorage {
    async fn insert(&self, payload: &[u8], owner_channel_id: &str) -> Result<i64, String> {
        self.db
            .insert_record(payload, owner_channel_id)
            .map_err(|e| e.to_string())
    }

    async fn get_by_id(&self, record_id: i64) -> Result<Option<StoredRecord>, String> {
        match self.db.get_record(record_id) {
            Ok(record) => Ok(Some(StoredRecord {
                payload: record.payload,
                owner_channel_id: record.owner_channel_id,
            })),
            Err(DbError::RecordNotFound(_)) => Ok(None),
            Err(e) => Err(e.to_string()),
        }
    }
}
