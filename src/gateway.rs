//! Chat gateway types
//!
//! Platform-neutral shapes for inbound messages and outbound embeds. The
//! Discord adapter converts to and from serenity's models.

pub mod discord;

use crate::state_machine::FormAnswers;

/// A message received from the gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub content: String,
    pub author_id: String,
    pub author_name: String,
    pub channel_id: String,
    /// One-to-one channel with no guild; form turns happen here
    pub is_private: bool,
}

/// Rich message: title, optional author block and named fields
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Embed {
    pub title: String,
    pub description: Option<String>,
    pub author: Option<EmbedAuthor>,
    pub fields: Vec<EmbedField>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedAuthor {
    pub name: String,
    pub icon_url: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
}

impl EmbedField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl Embed {
    /// Summary of a completed form, used on completion and by `answer <id>`
    pub fn form_summary(answers: &FormAnswers, record_id: i64) -> Self {
        Self {
            title: "New response!".to_string(),
            fields: vec![
                EmbedField::new("Favorite Food", &answers.favorite_food),
                EmbedField::new("Favorite Game", &answers.favorite_game),
                EmbedField::new("Record ID", record_id.to_string()),
            ],
            ..Self::default()
        }
    }

    /// Look up a field value by name
    #[allow(dead_code)] // Used in tests
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }
}
