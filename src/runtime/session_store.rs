//! In-memory session store with optional expiry

use super::traits::SessionStore;
use crate::state_machine::{FormContext, FormSession};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

struct Entry {
    session: FormSession,
    touched_at: Instant,
}

/// Mutex-guarded map of live sessions.
///
/// With a TTL set, a session untouched for longer than the TTL is invisible
/// to `get`/`update`, no longer blocks `create`, and is evicted the next time
/// the map is written.
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<String, Entry>>,
    ttl: Option<Duration>,
}

impl MemorySessionStore {
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Number of live (unexpired) sessions
    #[allow(dead_code)] // Used in tests
    pub fn len(&self) -> usize {
        self.lock()
            .values()
            .filter(|entry| !self.is_expired(entry))
            .count()
    }

    #[allow(dead_code)] // Pairs with len()
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_expired(&self, entry: &Entry) -> bool {
        self.ttl
            .is_some_and(|ttl| entry.touched_at.elapsed() >= ttl)
    }

    fn evict_expired(&self, sessions: &mut HashMap<String, Entry>) {
        if self.ttl.is_none() {
            return;
        }
        let before = sessions.len();
        sessions.retain(|_, entry| !self.is_expired(entry));
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::info!(evicted, "Evicted expired form sessions");
        }
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new(None)
    }
}

impl SessionStore for MemorySessionStore {
    fn create(&self, channel_id: &str, origin_channel_id: &str) -> bool {
        let mut sessions = self.lock();
        self.evict_expired(&mut sessions);
        if sessions.contains_key(channel_id) {
            return false;
        }
        sessions.insert(
            channel_id.to_string(),
            Entry {
                session: FormSession::new(FormContext::new(channel_id, origin_channel_id)),
                touched_at: Instant::now(),
            },
        );
        true
    }

    fn get(&self, channel_id: &str) -> Option<FormSession> {
        self.lock()
            .get(channel_id)
            .filter(|entry| !self.is_expired(entry))
            .map(|entry| entry.session.clone())
    }

    fn update(&self, channel_id: &str, session: FormSession) -> bool {
        let mut sessions = self.lock();
        self.evict_expired(&mut sessions);
        let Some(entry) = sessions.get_mut(channel_id) else {
            return false;
        };
        if session.context != entry.session.context {
            tracing::warn!(
                channel_id = %channel_id,
                "Ignoring attempt to change a session's channels"
            );
        }
        entry.session.state = session.state;
        entry.touched_at = Instant::now();
        true
    }

    fn remove(&self, channel_id: &str) {
        self.lock().remove(channel_id);
    }
}
