//! gobot - Discord bot that runs a two-question form over direct messages
//!
//! Commands arrive in guild channels; the form itself runs in the user's
//! private channel and the completed answers are stored in SQLite.

mod codec;
mod commands;
mod config;
mod db;
mod error;
mod gateway;
mod router;
mod runtime;
mod state_machine;

use config::BotConfig;
use db::Database;
use gateway::discord::{self, DiscordGateway};
use router::CommandRouter;
use runtime::{DatabaseStorage, MemorySessionStore, ProductionEngine};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gobot=info,serenity=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = BotConfig::from_env()?;

    // Ensure database directory exists
    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    tracing::info!(path = %config.db_path.display(), "Opening database");
    let db = Database::open(&config.db_path)?;
    let storage = DatabaseStorage::new(db);

    let gateway = Arc::new(DiscordGateway::new(&config.discord_token));
    let engine: Arc<ProductionEngine> = Arc::new(ProductionEngine::new(
        MemorySessionStore::new(config.session_ttl),
        storage.clone(),
        Arc::clone(&gateway),
    ));
    let router = Arc::new(CommandRouter::new(
        config.command_prefix.clone(),
        engine,
        storage,
        gateway,
    ));

    tracing::info!(
        prefix = %config.command_prefix,
        session_ttl_secs = config.session_ttl.map(|ttl| ttl.as_secs()),
        "gobot starting"
    );
    discord::run(&config.discord_token, router).await?;

    Ok(())
}
