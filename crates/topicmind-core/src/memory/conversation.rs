//! Bounded conversation history backed by `DashMap`.
//!
//! Histories are cloned on read so no `DashMap` guard is ever held across
//! an `.await` point.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;

use topicmind_types::llm::Message;
use topicmind_types::memory::{ConversationKey, Exchange};

/// Concurrent map from conversation key to its most recent exchanges.
///
/// Cloning produces a shared view of the same underlying data.
#[derive(Debug, Clone)]
pub struct ConversationMemory {
    limit: usize,
    inner: Arc<DashMap<ConversationKey, VecDeque<Exchange>>>,
}

impl ConversationMemory {
    /// Create an empty memory keeping at most `limit` exchanges per
    /// conversation.
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            inner: Arc::new(DashMap::new()),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Snapshot of a conversation's exchanges, oldest first.
    pub fn history(&self, key: &ConversationKey) -> Vec<Exchange> {
        self.inner
            .get(key)
            .map(|r| r.value().iter().cloned().collect())
            .unwrap_or_default()
    }

    /// The history flattened into alternating user/assistant messages.
    pub fn history_messages(&self, key: &ConversationKey) -> Vec<Message> {
        self.history(key)
            .into_iter()
            .flat_map(|ex| [Message::user(ex.user), Message::assistant(ex.assistant)])
            .collect()
    }

    /// Append an exchange, dropping the oldest ones beyond the limit.
    pub fn record(&self, key: ConversationKey, user: String, assistant: String) {
        if self.limit == 0 {
            return;
        }
        let mut entry = self.inner.entry(key).or_default();
        entry.push_back(Exchange {
            user,
            assistant,
            at: Utc::now(),
        });
        while entry.len() > self.limit {
            entry.pop_front();
        }
    }

    /// Forget a conversation. Returns `true` if it existed.
    pub fn clear(&self, key: &ConversationKey) -> bool {
        self.inner.remove(key).is_some()
    }

    /// Number of tracked conversations.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
