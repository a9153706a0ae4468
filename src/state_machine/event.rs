//! Events that can occur in a form session

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    Reply {
        text: String,
    },

    // Persistence events
    RecordPersisted {
        record_id: i64,
    },
    PersistFailed {
        message: String,
    },
}

impl Event {
    pub fn reply(text: impl Into<String>) -> Self {
        Event::Reply { text: text.into() }
    }
}
