//! Pure state transition function
//!
//! Given the same state, context and event this always produces the same
//! result. All I/O is described by the returned effects and carried out by
//! the runtime.

use super::{Effect, Event, FormAnswers, FormContext, FormState};
use thiserror::Error;

pub const GREETING: &str = "Hey there! Here are some questions";
pub const FOOD_PROMPT: &str = "What is your favorite food?";
pub const GAME_PROMPT: &str = "Great! What is your favorite game now?";
pub const SAVE_FAILED: &str =
    "Sorry, I couldn't save your answers. Send your favorite game again to retry.";

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: FormState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: FormState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Answers are already being saved")]
    CommitInProgress,
    #[error("Form is already complete")]
    AlreadyCompleted,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Effects of opening a fresh session: greet and ask the first question
pub fn begin(context: &FormContext) -> TransitionResult {
    TransitionResult::new(FormState::AwaitingFirstAnswer)
        .with_effect(Effect::send_text(&context.channel_id, GREETING))
        .with_effect(Effect::send_text(&context.channel_id, FOOD_PROMPT))
}

pub fn transition(
    state: &FormState,
    context: &FormContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // ============================================================
        // Answers
        // ============================================================

        // Content is taken verbatim, including the empty string
        (FormState::AwaitingFirstAnswer, Event::Reply { text }) => Ok(TransitionResult::new(
            FormState::AwaitingSecondAnswer {
                favorite_food: text,
            },
        )
        .with_effect(Effect::SaveSession)
        .with_effect(Effect::send_text(&context.channel_id, GAME_PROMPT))),

        (FormState::AwaitingSecondAnswer { favorite_food }, Event::Reply { text }) => {
            let answers = FormAnswers::new(favorite_food.clone(), text);
            Ok(
                TransitionResult::new(FormState::Committing {
                    answers: answers.clone(),
                })
                .with_effect(Effect::PersistRecord { answers }),
            )
        }

        (FormState::Committing { .. }, Event::Reply { .. }) => {
            Err(TransitionError::CommitInProgress)
        }

        // ============================================================
        // Persistence outcome
        // ============================================================

        (FormState::Committing { answers }, Event::RecordPersisted { record_id }) => {
            Ok(TransitionResult::new(FormState::Completed {
                answers: answers.clone(),
                record_id,
            })
            .with_effect(Effect::SendSummary {
                channel_id: context.origin_channel_id.clone(),
                answers: answers.clone(),
                record_id,
            })
            .with_effect(Effect::RemoveSession))
        }

        // The stored session was never advanced past AwaitingSecondAnswer, so
        // no SaveSession here: the next reply simply retries the second answer.
        (FormState::Committing { answers }, Event::PersistFailed { .. }) => Ok(
            TransitionResult::new(FormState::AwaitingSecondAnswer {
                favorite_food: answers.favorite_food.clone(),
            })
            .with_effect(Effect::send_text(&context.channel_id, SAVE_FAILED)),
        ),

        // ============================================================
        // Invalid Transitions
        // ============================================================
        (FormState::Completed { .. }, _) => Err(TransitionError::AlreadyCompleted),

        (state, event) => Err(TransitionError::InvalidTransition(format!(
            "No transition from {state:?} with event {event:?}"
        ))),
    }
}
