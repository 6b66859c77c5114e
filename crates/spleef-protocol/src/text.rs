//! Chat text, sounds, and the outbound messages a player receives.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A text style flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Formatting {
    Gold,
    Red,
    DarkPurple,
    Bold,
}

/// A styled chat component.
///
/// Kept deliberately flat: one literal string plus a list of formatting
/// flags. That is all the round ever sends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Text {
    pub content: String,
    pub formatting: Vec<Formatting>,
}

impl Text {
    /// Unstyled text.
    pub fn literal(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            formatting: Vec::new(),
        }
    }

    /// Adds formatting flags, returning the styled text.
    pub fn formatted(mut self, flags: &[Formatting]) -> Self {
        self.formatting.extend_from_slice(flags);
        self
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.content)
    }
}

/// Sounds the round plays to every connected player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sound {
    /// Played when the round is decided.
    Victory,
    /// Played when a participant is eliminated.
    Elimination,
}

impl Sound {
    /// The namespaced sound event id.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Victory => "minecraft:entity.villager.yes",
            Self::Elimination => "minecraft:entity.experience_orb.pickup",
        }
    }
}

/// One message delivered to a single player's client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Outbound {
    /// A line in the chat window.
    Chat(Text),
    /// A transient line above the hotbar.
    ActionBar(Text),
    Sound(Sound),
}
