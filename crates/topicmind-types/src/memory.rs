//! Conversation memory types.
//!
//! Agent memory is scoped per `(topic, user, chat)` and holds a bounded,
//! ordered window of recent user/assistant exchanges.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one isolated conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationKey {
    pub topic: String,
    pub user_id: i64,
    pub chat_id: i64,
}

impl ConversationKey {
    pub fn new(topic: impl Into<String>, user_id: i64, chat_id: i64) -> Self {
        Self {
            topic: topic.into(),
            user_id,
            chat_id,
        }
    }
}

impl fmt::Display for ConversationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_user_{}_chat_{}",
            self.topic.to_lowercase().replace(' ', "_"),
            self.user_id,
            self.chat_id
        )
    }
}

/// One user message and the agent's final reply to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exchange {
    pub user: String,
    pub assistant: String,
    pub at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversation_key_display() {
        let key = ConversationKey::new("AI Engineering", 5, -100);
        assert_eq!(key.to_string(), "ai_engineering_user_5_chat_-100");
    }

    #[test]
    fn test_conversation_keys_isolated_by_topic() {
        let a = ConversationKey::new("Health", 1, 1);
        let b = ConversationKey::new("Wealth", 1, 1);
        assert_ne!(a, b);
    }
}
