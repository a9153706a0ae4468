//! Command router
//!
//! Every inbound message lands here. Messages in private channels are form
//! turns; everything else is matched against the command vocabulary.

use crate::codec;
use crate::commands;
use crate::error::BotError;
use crate::gateway::discord::DiscordGateway;
use crate::gateway::{Embed, InboundMessage};
use crate::runtime::{
    DatabaseStorage, FormEngine, Gateway, MemorySessionStore, RecordStore, SessionStore,
};
use std::sync::Arc;

pub const DEFAULT_PREFIX: &str = "!gobot";

pub type ProductionRouter = CommandRouter<MemorySessionStore, DatabaseStorage, DiscordGateway>;

/// Subcommands understood after the prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    Hello,
    Proverbs,
    /// Start a form
    Prompt,
    /// Redisplay a stored record
    Answer { id: Option<&'a str> },
}

/// Where a message goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    /// Private channel: a form turn
    Turn,
    Command(Command<'a>),
    /// The prefix alone
    MissingSubcommand,
    /// Prefix followed by a token outside the vocabulary
    Unknown(&'a str),
    /// Not addressed to the bot
    Ignore,
}

pub fn classify<'a>(message: &'a InboundMessage, prefix: &str) -> Route<'a> {
    if message.is_private {
        return Route::Turn;
    }
    parse_command(&message.content, prefix)
}

/// Tokenize on single spaces and read the tokens with bounds checks
pub fn parse_command<'a>(content: &'a str, prefix: &str) -> Route<'a> {
    let mut tokens = content.split(' ');
    if tokens.next() != Some(prefix) {
        return Route::Ignore;
    }

    match tokens.next() {
        None => Route::MissingSubcommand,
        Some("hello") => Route::Command(Command::Hello),
        Some("proverbs") => Route::Command(Command::Proverbs),
        Some("prompt") => Route::Command(Command::Prompt),
        Some("answer") => Route::Command(Command::Answer {
            id: tokens.next().filter(|t| !t.is_empty()),
        }),
        Some(other) => Route::Unknown(other),
    }
}

pub struct CommandRouter<S, R, G>
where
    S: SessionStore,
    R: RecordStore,
    G: Gateway,
{
    prefix: String,
    engine: Arc<FormEngine<S, R, G>>,
    records: R,
    gateway: Arc<G>,
}

impl<S, R, G> CommandRouter<S, R, G>
where
    S: SessionStore,
    R: RecordStore,
    G: Gateway,
{
    pub fn new(
        prefix: impl Into<String>,
        engine: Arc<FormEngine<S, R, G>>,
        records: R,
        gateway: Arc<G>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            engine,
            records,
            gateway,
        }
    }

    /// Handle one inbound message. Errors are logged and, when meant for the
    /// user, reported back to the message's channel.
    pub async fn dispatch(&self, message: &InboundMessage) {
        tracing::debug!(
            author = %message.author_name,
            channel_id = %message.channel_id,
            content = %message.content,
            "Message received"
        );

        let result = match classify(message, &self.prefix) {
            Route::Turn => self
                .engine
                .handle_turn(&message.channel_id, &message.content)
                .await
                .map(|_| ()),
            Route::Command(command) => self.run_command(command, message).await,
            Route::MissingSubcommand => {
                tracing::debug!(channel_id = %message.channel_id, "Prefix without subcommand");
                Ok(())
            }
            Route::Unknown(token) => {
                tracing::debug!(channel_id = %message.channel_id, subcommand = %token, "Unknown subcommand");
                Ok(())
            }
            Route::Ignore => Ok(()),
        };

        if let Err(e) = result {
            self.report(message, &e).await;
        }
    }

    async fn run_command(
        &self,
        command: Command<'_>,
        message: &InboundMessage,
    ) -> Result<(), BotError> {
        match command {
            Command::Hello => self
                .gateway
                .send_text(&message.channel_id, &commands::greeting(&message.author_name))
                .await
                .map_err(BotError::Gateway),
            Command::Proverbs => {
                let embed = commands::random_proverb_embed();
                self.gateway
                    .send_embed(&message.channel_id, &embed)
                    .await
                    .map_err(BotError::Gateway)
            }
            Command::Prompt => self
                .engine
                .start(&message.author_id, &message.channel_id)
                .await
                .map(|_| ()),
            Command::Answer { id } => self.show_answer(id, &message.channel_id).await,
        }
    }

    async fn show_answer(&self, raw_id: Option<&str>, channel_id: &str) -> Result<(), BotError> {
        let record_id = commands::parse_record_id(raw_id, &self.prefix)?;
        let record = self
            .records
            .get_by_id(record_id)
            .await
            .map_err(BotError::Persistence)?
            .ok_or(BotError::Lookup(record_id))?;
        let answers = codec::decode(&record.payload)?;

        self.gateway
            .send_embed(channel_id, &Embed::form_summary(&answers, record_id))
            .await
            .map_err(BotError::Gateway)
    }

    async fn report(&self, message: &InboundMessage, error: &BotError) {
        if error.is_internal() {
            tracing::error!(
                channel_id = %message.channel_id,
                content = %message.content,
                error = %error,
                "Failed to handle message"
            );
        } else {
            tracing::info!(
                channel_id = %message.channel_id,
                error = %error,
                "Rejected message"
            );
        }

        if let Some(text) = error.user_message() {
            if let Err(e) = self.gateway.send_text(&message.channel_id, &text).await {
                tracing::warn!(channel_id = %message.channel_id, error = %e, "Failed to report error");
            }
        }
    }
}
