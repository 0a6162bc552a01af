//! Topic service.
//!
//! Maps `(chat_id, thread_id)` to a topic name and handles the naming
//! commands and forum service events. Replies are returned as text; the
//! transport decides where to send them.

use std::collections::BTreeSet;

use chrono::Utc;

use topicmind_types::error::RepositoryError;
use topicmind_types::topic::{
    GENERAL_TOPIC_NAME, TopicRecord, is_placeholder_name, placeholder_name,
};

use crate::repository::message::MessageRepository;
use crate::repository::topic::TopicRepository;

pub const UNNAMED_TOPIC_NOTICE: &str = "⚠️ This topic hasn't been named yet.\n\n\
To set a name, use:\n/name_topic <your topic name>\n\n\
Example:\n/name_topic AI Engineering\n\n\
You only need to do this once per topic.";

pub const NOT_IN_THREAD_NOTICE: &str =
    "⚠️ This command only works in forum topics, not in the general chat.";

pub const NAME_TOPIC_USAGE: &str =
    "Usage: /name_topic <topic_name>\n\nExample: /name_topic AI Engineering";

const FIX_UNKNOWN_STEPS: &str = "To fix this:\n\
1. Go to each topic in Telegram\n\
2. Edit the topic name (you can keep the same name)\n\
3. Save it - this will trigger an update for the bot";

/// Result of resolving the topic of an inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicResolution {
    pub name: String,
    /// The thread had never been seen before; the caller should post
    /// [`UNNAMED_TOPIC_NOTICE`].
    pub first_seen: bool,
}

pub struct TopicService<T: TopicRepository, M: MessageRepository> {
    topics: T,
    messages: M,
}

impl<T: TopicRepository, M: MessageRepository> TopicService<T, M> {
    pub fn new(topics: T, messages: M) -> Self {
        Self { topics, messages }
    }

    /// Resolve the topic name for a message.
    ///
    /// Messages outside a thread belong to `General`. An unknown thread gets
    /// a `Topic_<id>` placeholder, stored so the notice is only posted once.
    pub async fn resolve(
        &self,
        chat_id: i64,
        thread_id: Option<i64>,
    ) -> Result<TopicResolution, RepositoryError> {
        let Some(thread_id) = thread_id else {
            return Ok(TopicResolution {
                name: GENERAL_TOPIC_NAME.to_string(),
                first_seen: false,
            });
        };

        if let Some(name) = self.topics.get_name(chat_id, thread_id).await? {
            return Ok(TopicResolution {
                name,
                first_seen: false,
            });
        }

        let name = placeholder_name(thread_id);
        let first_seen = self
            .topics
            .insert_if_absent(&TopicRecord {
                chat_id,
                thread_id,
                topic_name: name.clone(),
                updated_at: Utc::now(),
            })
            .await?;
        if first_seen {
            tracing::info!(chat_id, thread_id, "new unnamed topic");
        }
        Ok(TopicResolution { name, first_seen })
    }

    /// `/name_topic <name>`.
    pub async fn name_topic(
        &self,
        chat_id: i64,
        thread_id: Option<i64>,
        args: &str,
    ) -> Result<String, RepositoryError> {
        let Some(thread_id) = thread_id else {
            return Ok(NOT_IN_THREAD_NOTICE.to_string());
        };
        let name = args.trim();
        if name.is_empty() {
            return Ok(NAME_TOPIC_USAGE.to_string());
        }

        self.save(chat_id, thread_id, name).await?;
        Ok(format!("✅ Topic set to: '{name}'"))
    }

    /// A forum topic was created.
    pub async fn on_topic_created(
        &self,
        chat_id: i64,
        thread_id: i64,
        name: &str,
    ) -> Result<String, RepositoryError> {
        self.save(chat_id, thread_id, name).await?;
        Ok(format!(
            "✅ Topic '{name}' registered!\n\nUse /name_topic to change the name if needed."
        ))
    }

    /// A forum topic was edited. Edits that leave the name alone (icon
    /// changes) produce no reply.
    pub async fn on_topic_edited(
        &self,
        chat_id: i64,
        thread_id: i64,
        name: Option<&str>,
    ) -> Result<Option<String>, RepositoryError> {
        let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) else {
            return Ok(None);
        };
        self.save(chat_id, thread_id, name).await?;
        Ok(Some(format!("✅ Topic renamed to '{name}'")))
    }

    /// `/check_topics`: report threads that have messages but no real name.
    pub async fn check_topics(&self, chat_id: i64) -> Result<String, RepositoryError> {
        let records = self.topics.list_for_chat(chat_id).await?;
        let known: Vec<&TopicRecord> = records
            .iter()
            .filter(|r| !is_placeholder_name(&r.topic_name))
            .collect();
        let known_ids: BTreeSet<i64> = known.iter().map(|r| r.thread_id).collect();

        let mut unknown: BTreeSet<i64> = self
            .messages
            .thread_ids(chat_id)
            .await?
            .into_iter()
            .collect();
        unknown.extend(
            records
                .iter()
                .filter(|r| is_placeholder_name(&r.topic_name))
                .map(|r| r.thread_id),
        );
        unknown.retain(|id| !known_ids.contains(id));

        if unknown.is_empty() {
            return Ok(format!(
                "✅ All topics are properly initialized!\n\nKnown topics: {}",
                known.len()
            ));
        }

        let ids: Vec<String> = unknown.iter().map(i64::to_string).collect();
        let mut out = format!(
            "⚠️ Found {} unknown topic(s):\n\nThread IDs: {}\n\n{FIX_UNKNOWN_STEPS}\n\nKnown topics ({}):\n",
            unknown.len(),
            ids.join(", "),
            known.len()
        );
        for record in known {
            out.push_str(&format!(
                "  • Thread {}: {}\n",
                record.thread_id, record.topic_name
            ));
        }
        Ok(out)
    }

    async fn save(&self, chat_id: i64, thread_id: i64, name: &str) -> Result<(), RepositoryError> {
        self.topics
            .upsert(&TopicRecord {
                chat_id,
                thread_id,
                topic_name: name.to_string(),
                updated_at: Utc::now(),
            })
            .await?;
        tracing::info!(chat_id, thread_id, topic = name, "topic named");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryStore;

    fn service(store: &InMemoryStore) -> TopicService<InMemoryStore, InMemoryStore> {
        TopicService::new(store.clone(), store.clone())
    }

    #[tokio::test]
    async fn no_thread_is_general() {
        let store = InMemoryStore::default();
        let resolved = service(&store).resolve(-100, None).await.unwrap();
        assert_eq!(resolved.name, "General");
        assert!(!resolved.first_seen);
    }

    #[tokio::test]
    async fn unknown_thread_gets_placeholder_once() {
        let store = InMemoryStore::default();
        let topics = service(&store);

        let first = topics.resolve(-100, Some(5)).await.unwrap();
        assert_eq!(first.name, "Topic_5");
        assert!(first.first_seen);

        let second = topics.resolve(-100, Some(5)).await.unwrap();
        assert_eq!(second.name, "Topic_5");
        assert!(!second.first_seen);
    }

    #[tokio::test]
    async fn name_topic_sets_and_resolves() {
        let store = InMemoryStore::default();
        let topics = service(&store);

        let reply = topics.name_topic(-100, Some(5), "  Ideas ").await.unwrap();
        assert_eq!(reply, "✅ Topic set to: 'Ideas'");
        assert_eq!(topics.resolve(-100, Some(5)).await.unwrap().name, "Ideas");
        // Other chats are unaffected.
        assert_eq!(topics.resolve(-200, Some(5)).await.unwrap().name, "Topic_5");
    }

    #[tokio::test]
    async fn name_topic_rejects_general_chat_and_empty_args() {
        let store = InMemoryStore::default();
        let topics = service(&store);
        assert_eq!(
            topics.name_topic(-100, None, "Ideas").await.unwrap(),
            NOT_IN_THREAD_NOTICE
        );
        assert_eq!(topics.name_topic(-100, Some(3), "  ").await.unwrap(), NAME_TOPIC_USAGE);
    }

    #[tokio::test]
    async fn forum_events_store_names() {
        let store = InMemoryStore::default();
        let topics = service(&store);

        let created = topics.on_topic_created(-100, 9, "Career").await.unwrap();
        assert!(created.starts_with("✅ Topic 'Career' registered!"));

        let edited = topics.on_topic_edited(-100, 9, Some("Wealth")).await.unwrap();
        assert_eq!(edited.as_deref(), Some("✅ Topic renamed to 'Wealth'"));
        assert_eq!(topics.resolve(-100, Some(9)).await.unwrap().name, "Wealth");

        assert!(topics.on_topic_edited(-100, 9, None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn check_topics_all_known() {
        let store = InMemoryStore::default();
        let topics = service(&store);
        topics.on_topic_created(-100, 2, "Ideas").await.unwrap();

        let report = topics.check_topics(-100).await.unwrap();
        assert_eq!(report, "✅ All topics are properly initialized!\n\nKnown topics: 1");
    }

    #[tokio::test]
    async fn check_topics_lists_unknown_threads() {
        let store = InMemoryStore::default();
        store.add_thread(-100, 7);
        let topics = service(&store);
        topics.on_topic_created(-100, 2, "Ideas").await.unwrap();
        topics.resolve(-100, Some(4)).await.unwrap();

        let report = topics.check_topics(-100).await.unwrap();
        assert!(report.starts_with("⚠️ Found 2 unknown topic(s):\n\nThread IDs: 4, 7\n\n"));
        assert!(report.contains("Known topics (1):\n  • Thread 2: Ideas\n"));
    }
}
