//! Form session state types

use serde::{Deserialize, Serialize};

// ============================================================================
// Answers
// ============================================================================

/// The completed answer set of one form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormAnswers {
    #[serde(alias = "FavFood")]
    pub favorite_food: String,
    #[serde(alias = "FavGane")]
    pub favorite_game: String,
}

impl FormAnswers {
    pub fn new(favorite_food: impl Into<String>, favorite_game: impl Into<String>) -> Self {
        Self {
            favorite_food: favorite_food.into(),
            favorite_game: favorite_game.into(),
        }
    }
}

// ============================================================================
// Form State
// ============================================================================

/// Position of a session within its turn sequence.
///
/// Only the two awaiting stages are ever written to the session store.
/// `Committing` exists while the record write is in flight and `Completed`
/// is the terminal stage reached right before the session is removed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormState {
    /// Session just created, both slots unset
    #[default]
    AwaitingFirstAnswer,

    /// First slot filled (possibly with an empty string)
    AwaitingSecondAnswer { favorite_food: String },

    /// Both slots filled, record write in flight
    Committing { answers: FormAnswers },

    /// Record written; the session is about to be removed
    Completed {
        answers: FormAnswers,
        record_id: i64,
    },
}

impl FormState {
    /// The externally visible stage, if this state may live in the store
    pub fn stage(&self) -> Option<FormStage> {
        match self {
            FormState::AwaitingFirstAnswer => Some(FormStage::AwaitingFirstAnswer),
            FormState::AwaitingSecondAnswer { .. } => Some(FormStage::AwaitingSecondAnswer),
            FormState::Committing { .. } | FormState::Completed { .. } => None,
        }
    }

    #[allow(dead_code)] // Used in tests
    pub fn is_terminal(&self) -> bool {
        matches!(self, FormState::Completed { .. })
    }
}

/// Stage tag for stored sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStage {
    AwaitingFirstAnswer,
    AwaitingSecondAnswer,
}

// ============================================================================
// Session
// ============================================================================

/// Immutable identity of a form session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormContext {
    /// Private channel where turns are exchanged
    pub channel_id: String,
    /// Channel that receives the completion summary
    pub origin_channel_id: String,
}

impl FormContext {
    pub fn new(channel_id: impl Into<String>, origin_channel_id: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            origin_channel_id: origin_channel_id.into(),
        }
    }
}

/// An in-progress form for one private channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSession {
    pub context: FormContext,
    pub state: FormState,
}

impl FormSession {
    pub fn new(context: FormContext) -> Self {
        Self {
            context,
            state: FormState::default(),
        }
    }

    #[allow(dead_code)] // Used in tests
    pub fn origin_channel_id(&self) -> &str {
        &self.context.origin_channel_id
    }

    #[allow(dead_code)] // Used in tests
    pub fn stage(&self) -> Option<FormStage> {
        self.state.stage()
    }
}
