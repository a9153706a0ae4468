//! Discord adapter using serenity

use super::{Embed, InboundMessage};
use crate::router::ProductionRouter;
use crate::runtime::Gateway;
use async_trait::async_trait;
use serenity::all::{
    ChannelId, Context, CreateEmbed, CreateEmbedAuthor, CreateMessage, EventHandler,
    GatewayIntents, Http, Message, Ready, UserId,
};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Discord rejects embed fields with empty values
const EMPTY_FIELD: &str = "\u{200B}";

/// Outbound Discord calls over the REST API
pub struct DiscordGateway {
    http: Arc<Http>,
}

impl DiscordGateway {
    pub fn new(token: &str) -> Self {
        Self {
            http: Arc::new(Http::new(token)),
        }
    }
}

fn parse_snowflake(raw: &str) -> Result<u64, String> {
    raw.parse::<u64>()
        .ok()
        .filter(|id| *id != 0)
        .ok_or_else(|| format!("invalid discord id: {raw:?}"))
}

fn to_create_embed(embed: &Embed) -> CreateEmbed {
    let mut builder = CreateEmbed::new().title(&embed.title);

    if let Some(description) = &embed.description {
        builder = builder.description(description);
    }

    if let Some(author) = &embed.author {
        let mut author_builder = CreateEmbedAuthor::new(&author.name);
        if let Some(icon_url) = &author.icon_url {
            author_builder = author_builder.icon_url(icon_url);
        }
        if let Some(url) = &author.url {
            author_builder = author_builder.url(url);
        }
        builder = builder.author(author_builder);
    }

    for field in &embed.fields {
        let value = if field.value.is_empty() {
            EMPTY_FIELD
        } else {
            field.value.as_str()
        };
        builder = builder.field(&field.name, value, false);
    }

    builder
}

#[async_trait]
impl Gateway for DiscordGateway {
    async fn send_text(&self, channel_id: &str, text: &str) -> Result<(), String> {
        let channel = ChannelId::new(parse_snowflake(channel_id)?);
        channel
            .say(&*self.http, text)
            .await
            .map(|_| ())
            .map_err(|e| format!("failed to send discord message: {e}"))
    }

    async fn send_embed(&self, channel_id: &str, embed: &Embed) -> Result<(), String> {
        let channel = ChannelId::new(parse_snowflake(channel_id)?);
        let message = CreateMessage::new().embed(to_create_embed(embed));
        channel
            .send_message(&*self.http, message)
            .await
            .map(|_| ())
            .map_err(|e| format!("failed to send discord embed: {e}"))
    }

    async fn open_private_channel(&self, user_id: &str) -> Result<String, String> {
        let user = UserId::new(parse_snowflake(user_id)?);
        let channel = user
            .create_dm_channel(&*self.http)
            .await
            .map_err(|e| format!("failed to open direct message channel: {e}"))?;
        Ok(channel.id.to_string())
    }
}

// -- Serenity EventHandler --

struct Handler {
    router: Arc<ProductionRouter>,
    bot_user_id: RwLock<Option<UserId>>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        tracing::info!(bot_name = %ready.user.name, guild_count = ready.guilds.len(), "Discord connected");
        *self.bot_user_id.write().await = Some(ready.user.id);
    }

    async fn message(&self, _ctx: Context, message: Message) {
        // Never answer ourselves
        if self
            .bot_user_id
            .read()
            .await
            .is_some_and(|id| message.author.id == id)
        {
            return;
        }

        let inbound = InboundMessage {
            content: message.content,
            author_id: message.author.id.to_string(),
            author_name: message.author.name,
            channel_id: message.channel_id.to_string(),
            is_private: message.guild_id.is_none(),
        };
        self.router.dispatch(&inbound).await;
    }
}

/// Connect to the Discord gateway and deliver messages to `router` until
/// the process receives Ctrl-C.
pub async fn run(token: &str, router: Arc<ProductionRouter>) -> Result<(), serenity::Error> {
    let intents = GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let handler = Handler {
        router,
        bot_user_id: RwLock::new(None),
    };

    let mut client = serenity::Client::builder(token, intents)
        .event_handler(handler)
        .await?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "Failed to listen for shutdown signal");
            return;
        }
        tracing::info!("Shutting down");
        shard_manager.shutdown_all().await;
    });

    client.start().await
}
