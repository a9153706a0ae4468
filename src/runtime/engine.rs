//! Form conversation engine

use super::locks::ChannelLocks;
use super::traits::{Gateway, RecordStore, SessionStore};

use crate::codec;
use crate::error::BotError;
use crate::gateway::Embed;
use crate::state_machine::{
    begin, transition, Effect, Event, FormContext, FormSession, FormStage, FormState,
    TransitionError,
};
use std::sync::Arc;

/// What a form turn did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// No form is active in this channel; the message was ignored
    NoSession,
    /// Answer accepted, session now waits at this stage
    Advanced(FormStage),
    /// Record written and summary delivered; session removed
    Completed { record_id: i64 },
    /// Record write failed; session kept at `AwaitingSecondAnswer`
    SaveFailed,
}

/// Drives form sessions: opens them, feeds turns through the pure
/// transition function and executes the resulting effects.
pub struct FormEngine<S, R, G>
where
    S: SessionStore,
    R: RecordStore,
    G: Gateway,
{
    sessions: S,
    records: R,
    gateway: Arc<G>,
    locks: ChannelLocks,
}

impl<S, R, G> FormEngine<S, R, G>
where
    S: SessionStore,
    R: RecordStore,
    G: Gateway,
{
    pub fn new(sessions: S, records: R, gateway: Arc<G>) -> Self {
        Self {
            sessions,
            records,
            gateway,
            locks: ChannelLocks::new(),
        }
    }

    #[allow(dead_code)] // Used in tests
    pub fn sessions(&self) -> &S {
        &self.sessions
    }

    /// Start a form for `user_id`, reporting completion to `origin_channel_id`.
    ///
    /// Returns the private channel the form runs in.
    pub async fn start(&self, user_id: &str, origin_channel_id: &str) -> Result<String, BotError> {
        let channel_id = self
            .gateway
            .open_private_channel(user_id)
            .await
            .map_err(BotError::Gateway)?;

        let _guard = self.locks.acquire(&channel_id).await;
        if !self.sessions.create(&channel_id, origin_channel_id) {
            tracing::info!(channel_id = %channel_id, "Form already in progress");
            return Err(BotError::FormInProgress);
        }

        tracing::info!(
            channel_id = %channel_id,
            origin_channel_id = %origin_channel_id,
            "Form started"
        );

        let context = FormContext::new(channel_id.clone(), origin_channel_id);
        let result = begin(&context);
        for effect in result.effects {
            self.execute_effect(&context, &result.new_state, effect).await;
        }

        Ok(channel_id)
    }

    /// Feed one message from a private channel into its form, if any
    pub async fn handle_turn(&self, channel_id: &str, text: &str) -> Result<TurnOutcome, BotError> {
        let _guard = self.locks.acquire(channel_id).await;

        let Some(session) = self.sessions.get(channel_id) else {
            tracing::debug!(channel_id = %channel_id, "No active form, ignoring message");
            return Ok(TurnOutcome::NoSession);
        };
        let FormSession { context, mut state } = session;

        let mut save_failed = false;
        let mut events = vec![Event::reply(text)];

        // Effects may generate follow-up events (persistence outcome)
        while let Some(event) = events.pop() {
            if let Event::PersistFailed { message } = &event {
                tracing::info!(
                    channel_id = %channel_id,
                    error = %message,
                    "Returning form to second question"
                );
                save_failed = true;
            }

            let result = transition(&state, &context, event)?;
            state = result.new_state;

            for effect in result.effects {
                if let Some(generated) = self.execute_effect(&context, &state, effect).await {
                    events.push(generated);
                }
            }
        }

        match state {
            FormState::Completed { record_id, .. } => Ok(TurnOutcome::Completed { record_id }),
            FormState::AwaitingSecondAnswer { .. } if save_failed => Ok(TurnOutcome::SaveFailed),
            FormState::AwaitingSecondAnswer { .. } => {
                Ok(TurnOutcome::Advanced(FormStage::AwaitingSecondAnswer))
            }
            // A reply always leaves the first stage, and every commit ends in
            // a persisted or failed event
            FormState::AwaitingFirstAnswer | FormState::Committing { .. } => {
                Err(BotError::Transition(TransitionError::InvalidTransition(
                    format!("turn ended in {state:?}"),
                )))
            }
        }
    }

    async fn execute_effect(
        &self,
        context: &FormContext,
        state: &FormState,
        effect: Effect,
    ) -> Option<Event> {
        match effect {
            Effect::SendText { channel_id, text } => {
                if let Err(e) = self.gateway.send_text(&channel_id, &text).await {
                    tracing::warn!(channel_id = %channel_id, error = %e, "Failed to send message");
                }
                None
            }

            Effect::SaveSession => {
                if state.stage().is_none() {
                    tracing::warn!(channel_id = %context.channel_id, state = ?state, "Refusing to store transient state");
                    return None;
                }
                let session = FormSession {
                    context: context.clone(),
                    state: state.clone(),
                };
                if !self.sessions.update(&context.channel_id, session) {
                    tracing::warn!(channel_id = %context.channel_id, "Session vanished before save");
                }
                None
            }

            Effect::PersistRecord { answers } => {
                let payload = match codec::encode(&answers) {
                    Ok(p) => p,
                    Err(e) => {
                        tracing::error!(channel_id = %context.channel_id, error = %e, "Failed to encode answers");
                        return Some(Event::PersistFailed {
                            message: e.to_string(),
                        });
                    }
                };

                match self.records.insert(&payload, &context.channel_id).await {
                    Ok(record_id) => {
                        tracing::info!(
                            channel_id = %context.channel_id,
                            record_id,
                            "Form record persisted"
                        );
                        Some(Event::RecordPersisted { record_id })
                    }
                    Err(e) => {
                        tracing::error!(
                            channel_id = %context.channel_id,
                            error = %e,
                            "Failed to persist form record, keeping session for retry"
                        );
                        Some(Event::PersistFailed { message: e })
                    }
                }
            }

            Effect::SendSummary {
                channel_id,
                answers,
                record_id,
            } => {
                let embed = Embed::form_summary(&answers, record_id);
                if let Err(e) = self.gateway.send_embed(&channel_id, &embed).await {
                    tracing::warn!(
                        channel_id = %channel_id,
                        record_id,
                        error = %e,
                        "Failed to deliver form summary"
                    );
                }
                None
            }

            Effect::RemoveSession => {
                self.sessions.remove(&context.channel_id);
                tracing::info!(channel_id = %context.channel_id, "Form completed");
                None
            }
        }
    }
}
