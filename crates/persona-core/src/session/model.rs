//! Session domain model.

use super::message::Message;
use super::welcome::welcome_text;
use crate::document::Document;
use crate::id::IdGenerator;
use serde::{Deserialize, Serialize};

/// Title given to sessions created from the admin view.
pub const DEFAULT_SESSION_TITLE: &str = "New Chat Session";

/// Title used when a rename leaves nothing but whitespace.
pub const UNTITLED_SESSION_TITLE: &str = "Untitled Chat";

/// One persisted conversation thread.
///
/// `messages` is in append order and is never reordered. `delay_seconds` is
/// the cooldown enforced after each completed bot reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Unique session identifier
    pub id: String,
    /// Human-readable title, trimmed and non-empty
    pub title: String,
    pub messages: Vec<Message>,
    /// Creation time in Unix milliseconds
    pub created_at: i64,
    #[serde(default)]
    pub delay_seconds: u32,
}

impl Session {
    /// Creates a session seeded with a single bot welcome message.
    pub fn create(
        title: &str,
        documents: &[Document],
        ids: &dyn IdGenerator,
        now_ms: i64,
    ) -> Self {
        let welcome = Message::bot(ids.message_id(), welcome_text(documents), now_ms);
        Self {
            id: ids.session_id(),
            title: normalize_title(title),
            messages: vec![welcome],
            created_at: now_ms,
            delay_seconds: 0,
        }
    }

    /// Replaces the message with the same id in place.
    ///
    /// Returns `false` when no message carries that id.
    pub fn replace_message(&mut self, message: Message) -> bool {
        match self.messages.iter_mut().find(|m| m.id == message.id) {
            Some(slot) => {
                *slot = message;
                true
            }
            None => false,
        }
    }

    pub fn message(&self, message_id: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == message_id)
    }
}

/// Trims a title, falling back to [`UNTITLED_SESSION_TITLE`] when empty.
pub fn normalize_title(title: &str) -> String {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        UNTITLED_SESSION_TITLE.to_string()
    } else {
        trimmed.to_string()
    }
}
