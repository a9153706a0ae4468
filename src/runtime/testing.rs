//! Mock implementations for testing
//!
//! These mocks enable engine and router tests without a real gateway or
//! database.

use super::traits::*;
use crate::gateway::Embed;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

// ============================================================================
// Mock Gateway
// ============================================================================

/// Something the bot sent through the gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text { channel_id: String, text: String },
    Embed { channel_id: String, embed: Embed },
}

/// Gateway that records every outbound message
pub struct MockGateway {
    sent: Mutex<Vec<Sent>>,
    refuse_private_channels: AtomicBool,
    fail_sends: AtomicBool,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            refuse_private_channels: AtomicBool::new(false),
            fail_sends: AtomicBool::new(false),
        }
    }

    /// Make `open_private_channel` fail, e.g. a user with DMs closed
    pub fn refuse_private_channels(&self) {
        self.refuse_private_channels.store(true, Ordering::SeqCst);
    }

    /// Make every send fail (nothing is recorded)
    pub fn fail_sends(&self) {
        self.fail_sends.store(true, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn texts_to(&self, channel: &str) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Text { channel_id, text } if channel_id == channel => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn embeds_to(&self, channel: &str) -> Vec<Embed> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Embed { channel_id, embed } if channel_id == channel => Some(embed),
                _ => None,
            })
            .collect()
    }

    fn record(&self, sent: Sent) -> Result<(), String> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err("mock gateway send failure".to_string());
        }
        self.sent.lock().unwrap().push(sent);
        Ok(())
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Gateway for MockGateway {
    async fn send_text(&self, channel_id: &str, text: &str) -> Result<(), String> {
        self.record(Sent::Text {
            channel_id: channel_id.to_string(),
            text: text.to_string(),
        })
    }

    async fn send_embed(&self, channel_id: &str, embed: &Embed) -> Result<(), String> {
        self.record(Sent::Embed {
            channel_id: channel_id.to_string(),
            embed: embed.clone(),
        })
    }

    async fn open_private_channel(&self, user_id: &str) -> Result<String, String> {
        if self.refuse_private_channels.load(Ordering::SeqCst) {
            return Err(format!("cannot message user {user_id}"));
        }
        Ok(format!("dm-{user_id}"))
    }
}

// ============================================================================
// Mock Record Store
// ============================================================================

/// In-memory record store with failure injection
pub struct MockRecordStore {
    records: Mutex<HashMap<i64, StoredRecord>>,
    next_id: AtomicI64,
    fail_next_insert: AtomicBool,
    fail_reads: AtomicBool,
    insert_delay_ms: AtomicU64,
}

impl MockRecordStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            next_id: AtomicI64::new(1),
            fail_next_insert: AtomicBool::new(false),
            fail_reads: AtomicBool::new(false),
            insert_delay_ms: AtomicU64::new(0),
        }
    }

    /// The next insert returns an error, later ones succeed
    pub fn fail_next_insert(&self) {
        self.fail_next_insert.store(true, Ordering::SeqCst);
    }

    /// Every insert sleeps before storing, so concurrent callers overlap
    pub fn slow_inserts(&self, delay: Duration) {
        let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self.insert_delay_ms.store(millis, Ordering::SeqCst);
    }

    pub fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    /// Place a raw payload under a fixed id
    pub fn seed(&self, record_id: i64, payload: &[u8], owner_channel_id: &str) {
        self.records.lock().unwrap().insert(
            record_id,
            StoredRecord {
                payload: payload.to_vec(),
                owner_channel_id: owner_channel_id.to_string(),
            },
        );
    }

    pub fn stored(&self, record_id: i64) -> Option<StoredRecord> {
        self.records.lock().unwrap().get(&record_id).cloned()
    }

    pub fn count(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

impl Default for MockRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MockRecordStore {
    async fn insert(&self, payload: &[u8], owner_channel_id: &str) -> Result<i64, String> {
        if self.fail_next_insert.swap(false, Ordering::SeqCst) {
            return Err("mock insert failure".to_string());
        }
        let delay_ms = self.insert_delay_ms.load(Ordering::SeqCst);
        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }
        let record_id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.seed(record_id, payload, owner_channel_id);
        Ok(record_id)
    }

    async fn get_by_id(&self, record_id: i64) -> Result<Option<StoredRecord>, String> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err("mock read failure".to_string());
        }
        Ok(self.stored(record_id))
    }
}
