//! Effects produced by state transitions

use crate::state_machine::state::FormAnswers;

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send a plain text message to a channel
    SendText { channel_id: String, text: String },

    /// Write the new state back to the session store
    SaveSession,

    /// Encode the answers and write them through the record store
    PersistRecord { answers: FormAnswers },

    /// Deliver the completion summary embed
    SendSummary {
        channel_id: String,
        answers: FormAnswers,
        record_id: i64,
    },

    /// Drop the session from the store
    RemoveSession,
}

impl Effect {
    pub fn send_text(channel_id: impl Into<String>, text: impl Into<String>) -> Self {
        Effect::SendText {
            channel_id: channel_id.into(),
            text: text.into(),
        }
    }
}
