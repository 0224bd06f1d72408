//! Conversation message types.

use serde::{Deserialize, Serialize};
use strum::Display;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// A single message in a session.
///
/// A bot message may be pending (`is_loading == true`, empty text) while its
/// answer is generated. It is then replaced in place, keeping the same `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub text: String,
    pub sender: Sender,
    /// Creation time in Unix milliseconds.
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_loading: bool,
}

impl Message {
    pub fn user(id: impl Into<String>, text: impl Into<String>, timestamp: i64) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            sender: Sender::User,
            timestamp,
            is_loading: false,
        }
    }

    pub fn bot(id: impl Into<String>, text: impl Into<String>, timestamp: i64) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            sender: Sender::Bot,
            timestamp,
            is_loading: false,
        }
    }

    /// A placeholder bot message shown while an answer is being generated.
    pub fn pending_bot(id: impl Into<String>, timestamp: i64) -> Self {
        Self {
            is_loading: true,
            ..Self::bot(id, String::new(), timestamp)
        }
    }
}
