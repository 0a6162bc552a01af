//! Inbound chat message types.
//!
//! Every message the bot receives is logged, whether or not it is routed to an
//! agent. Columns such as `extracted_link`, `summary` and the indexing markers
//! are filled in later by the pipeline and the background indexer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of content carried by a message.
///
/// Maps to the `message_type` column of the `messages` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Photo,
    Video,
    Document,
    Voice,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageKind::Text => write!(f, "text"),
            MessageKind::Photo => write!(f, "photo"),
            MessageKind::Video => write!(f, "video"),
            MessageKind::Document => write!(f, "document"),
            MessageKind::Voice => write!(f, "voice"),
        }
    }
}

impl FromStr for MessageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(MessageKind::Text),
            "photo" => Ok(MessageKind::Photo),
            "video" => Ok(MessageKind::Video),
            "document" => Ok(MessageKind::Document),
            "voice" => Ok(MessageKind::Voice),
            other => Err(format!("invalid message kind: '{other}'")),
        }
    }
}

/// Marker written to `messages.indexed_by` once the indexer has resolved a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexedBy {
    /// The URL was new to the topic and has been registered.
    AutoUrl,
    /// The URL was already registered in the topic.
    Duplicate,
    /// The extracted link could not be normalized.
    InvalidUrl,
}

impl fmt::Display for IndexedBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexedBy::AutoUrl => write!(f, "auto_url"),
            IndexedBy::Duplicate => write!(f, "duplicate"),
            IndexedBy::InvalidUrl => write!(f, "invalid_url"),
        }
    }
}

/// A message as received from the chat transport, before it is stored.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub chat_id: i64,
    pub thread_id: Option<i64>,
    pub topic_name: String,
    /// Telegram's message id (unique per chat, not globally).
    pub telegram_message_id: i64,
    pub user_id: Option<i64>,
    pub username: Option<String>,
    pub kind: MessageKind,
    /// Message text or media caption.
    pub text: Option<String>,
    pub file_id: Option<String>,
    pub file_unique_id: Option<String>,
    pub message_link: String,
    pub created_at: DateTime<Utc>,
}

/// A message whose link has a cached summary but has not been indexed yet.
#[derive(Debug, Clone)]
pub struct PendingIndex {
    /// Row id of the stored message.
    pub message_id: i64,
    pub topic_name: String,
    pub url: String,
    pub username: Option<String>,
    pub created_at: DateTime<Utc>,
    pub summary: String,
}
