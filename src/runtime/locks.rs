//! Per-channel mutual exclusion

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// One async mutex per channel id.
///
/// Holding the guard serializes every read-transition-write sequence on that
/// channel; other channels are unaffected. Entries nobody holds or waits on
/// are pruned on the next acquire.
#[derive(Default)]
pub struct ChannelLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl ChannelLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, channel_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            // Strong count 1 means only the map references the mutex
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(channel_id.to_string()).or_default())
        };
        lock.lock_owned().await
    }

    /// Number of channels with a live lock entry
    #[allow(dead_code)] // Used in tests
    pub fn tracked(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
