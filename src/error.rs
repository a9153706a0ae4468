//! Bot error types

use crate::codec::DecodeError;
use crate::state_machine::TransitionError;
use thiserror::Error;

/// Errors surfaced while handling a message.
///
/// None of these is fatal: the router logs every error and reports the
/// user-facing ones back to the channel the message came from.
#[derive(Debug, Error)]
pub enum BotError {
    /// Malformed command arguments
    #[error("{0}")]
    Validation(String),

    /// No record with this id
    #[error("Record {0} not found")]
    Lookup(i64),

    /// Stored payload does not have the expected shape
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Record store read or write failed
    #[error("Persistence failure: {0}")]
    Persistence(String),

    /// A form is already running in the target private channel
    #[error("A form is already in progress")]
    FormInProgress,

    /// The chat gateway refused an operation
    #[error("Gateway failure: {0}")]
    Gateway(String),

    #[error(transparent)]
    Transition(#[from] TransitionError),
}

impl BotError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Text shown to the user, if this error is reported back to the channel
    pub fn user_message(&self) -> Option<String> {
        match self {
            BotError::Validation(message) => Some(message.clone()),
            BotError::Lookup(id) => Some(format!("No answer found with ID {id}.")),
            BotError::Decode(_) | BotError::Persistence(_) => {
                Some("Something went wrong while loading that answer.".to_string())
            }
            BotError::FormInProgress => Some("We're still waiting... 😅".to_string()),
            BotError::Gateway(_) | BotError::Transition(_) => None,
        }
    }

    /// Whether this error points at a problem on our side rather than bad input
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            BotError::Decode(_)
                | BotError::Persistence(_)
                | BotError::Gateway(_)
                | BotError::Transition(_)
        )
    }
}
