//! Conversation model
//!
//! An ordered, append-only sequence of turns. Every append produces a new
//! snapshot; earlier snapshots are never modified.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Greeting the assistant opens every conversation with
pub const GREETING: &str = "Hello! I am your AI Assistant. How can I help you today?";

/// Who authored a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Immutable conversation snapshot
///
/// Cloning is cheap: snapshots share their turns. There is no way to build an
/// empty conversation, so every snapshot holds at least the greeting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    turns: Arc<[Turn]>,
}

impl Conversation {
    /// Fresh conversation holding only the assistant greeting
    pub fn seed() -> Self {
        Self {
            turns: Arc::from(vec![Turn::assistant(GREETING)]),
        }
    }

    /// New snapshot with `turn` appended
    #[must_use]
    pub fn append(&self, turn: Turn) -> Self {
        self.append_all(std::iter::once(turn))
    }

    /// New snapshot with every turn appended, in order, as a single update
    #[must_use]
    pub fn append_all(&self, turns: impl IntoIterator<Item = Turn>) -> Self {
        let mut next = self.turns.to_vec();
        next.extend(turns);
        Self {
            turns: Arc::from(next),
        }
    }

    /// Ordered turns; this is the context sent to the assistant
    pub fn history(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn last(&self) -> &Turn {
        // Never empty: seed() is the only constructor
        &self.turns[self.turns.len() - 1]
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::seed()
    }
}
