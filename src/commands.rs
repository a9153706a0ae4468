//! Stateless command helpers: greeting, proverbs and record id parsing

use crate::error::BotError;
use crate::gateway::{Embed, EmbedAuthor};
use rand::seq::SliceRandom;

pub const PROVERBS: &[&str] = &[
    "Actions speak louder than words.",
    "The pen is mightier than the sword.",
    "When in Rome, do as the Romans do.",
    "The squeaky wheel gets the grease.",
    "When the going gets tough, the tough get going.",
    "Fortune favors the bold.",
    "People who live in glass houses should not throw stones.",
    "Better late than never.",
    "Two wrongs don't make a right.",
    "The early bird catches the worm.",
    "Where there's smoke, there's fire.",
    "Hope for the best, but prepare for the worst.",
    "Better safe than sorry.",
    "Keep your friends close and your enemies closer.",
    "A picture is worth a thousand words.",
    "Beauty is in the eye of the beholder.",
    "Necessity is the mother of invention.",
    "Discretion is the greater part of valor.",
    "Rome wasn't built in a day.",
];

pub fn greeting(username: &str) -> String {
    format!("Hi there :wave: {username}")
}

pub fn proverb_embed(proverb: &str) -> Embed {
    Embed {
        title: "Random Proverb".to_string(),
        description: Some(proverb.to_string()),
        author: Some(EmbedAuthor {
            name: "Rob Pike".to_string(),
            icon_url: Some("https://avatars.githubusercontent.com/u/343043?v=4".to_string()),
            url: Some("https://go-proverbs.github.io/".to_string()),
        }),
        fields: Vec::new(),
    }
}

pub fn random_proverb_embed() -> Embed {
    let proverb = PROVERBS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or_default();
    proverb_embed(proverb)
}

/// Parse the `<id>` argument of the answer command
pub fn parse_record_id(raw: Option<&str>, prefix: &str) -> Result<i64, BotError> {
    let Some(raw) = raw else {
        return Err(BotError::validation(format!(
            "an ID must be provided. Example: {prefix} answer 1"
        )));
    };
    raw.parse::<i64>().map_err(|_| {
        BotError::validation(format!(
            "`{raw}` is not a valid ID. Example: {prefix} answer 1"
        ))
    })
}
