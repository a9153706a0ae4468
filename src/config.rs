//! Bot configuration from the environment

use crate::router::DEFAULT_PREFIX;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_SESSION_TTL_SECS: u64 = 1800;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("DISCORD_BOT_TOKEN is not set")]
    MissingToken,

    #[error("{name} must be a whole number of seconds, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotConfig {
    pub discord_token: String,
    pub db_path: PathBuf,
    pub command_prefix: String,
    /// Idle sessions older than this are dropped; `None` keeps them forever
    pub session_ttl: Option<Duration>,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let discord_token = lookup("DISCORD_BOT_TOKEN")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingToken)?;

        let db_path = lookup("GOBOT_DB_PATH").map_or_else(
            || {
                let home = lookup("HOME").unwrap_or_else(|| "/tmp".to_string());
                PathBuf::from(home).join(".gobot").join("gobot.db")
            },
            PathBuf::from,
        );

        let command_prefix = lookup("GOBOT_COMMAND_PREFIX")
            .filter(|p| !p.is_empty() && !p.contains(' '))
            .unwrap_or_else(|| DEFAULT_PREFIX.to_string());

        let ttl_secs = match lookup("GOBOT_SESSION_TTL_SECS") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidNumber {
                    name: "GOBOT_SESSION_TTL_SECS",
                    value,
                })?,
            None => DEFAULT_SESSION_TTL_SECS,
        };
        let session_ttl = (ttl_secs > 0).then(|| Duration::from_secs(ttl_secs));

        Ok(Self {
            discord_token,
            db_path,
            command_prefix,
            session_ttl,
        })
    }
}
