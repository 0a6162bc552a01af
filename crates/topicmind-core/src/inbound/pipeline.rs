//! The per-message pipeline.
//!
//! 1. Resolve the topic; first contact with an unnamed thread adds the
//!    setup notice to the replies.
//! 2. Store the message.
//! 3. Messages without text are acknowledged and stop here.
//! 4. A URL already registered in the topic short-circuits with a
//!    duplicate notice; the agent is not called.
//! 5. Everything else goes to the topic's agent.
//!
//! Registry failures never block a reply: the message is treated as new.

use chrono::{DateTime, Utc};

use topicmind_types::error::RepositoryError;
use topicmind_types::message::{IndexedBy, MessageKind, NewMessage};

use super::link::message_link;
use crate::agent::{AgentRequest, Responder};
use crate::dedup::notice::duplicate_notice;
use crate::dedup::{DedupCheck, DedupService};
use crate::repository::indexed_url::IndexedUrlRepository;
use crate::repository::message::MessageRepository;
use crate::repository::scrape_cache::ScrapeCacheRepository;
use crate::repository::topic::TopicRepository;
use crate::topic::TopicService;
use crate::topic::service::UNNAMED_TOPIC_NOTICE;
use crate::url::extract_first_url;

pub const SAVED_ACK: &str = "✅ Saved!";

/// A chat message, already converted from the transport's types.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub chat_id: i64,
    pub chat_username: Option<String>,
    pub thread_id: Option<i64>,
    pub telegram_message_id: i64,
    pub user_id: Option<i64>,
    pub username: Option<String>,
    pub kind: MessageKind,
    /// Text or media caption.
    pub text: Option<String>,
    pub file_id: Option<String>,
    pub file_unique_id: Option<String>,
    pub received_at: DateTime<Utc>,
}

/// How a message was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// No text; stored and acknowledged.
    Saved,
    /// The message's URL was already registered in its topic.
    Duplicate { times_shared: i64 },
    /// Answered by the topic's agent.
    Agent,
}

/// Replies to send, in order, into the message's thread.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub topic_name: String,
    pub replies: Vec<String>,
    pub route: Route,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

pub struct InboundPipeline<T, M, R, C, A>
where
    T: TopicRepository,
    M: MessageRepository,
    R: IndexedUrlRepository,
    C: ScrapeCacheRepository,
    A: Responder,
{
    topics: TopicService<T, M>,
    messages: M,
    dedup: DedupService<R>,
    cache: C,
    responder: A,
    summary_max_chars: usize,
}

impl<T, M, R, C, A> InboundPipeline<T, M, R, C, A>
where
    T: TopicRepository,
    M: MessageRepository,
    R: IndexedUrlRepository,
    C: ScrapeCacheRepository,
    A: Responder,
{
    pub fn new(
        topics: TopicService<T, M>,
        messages: M,
        dedup: DedupService<R>,
        cache: C,
        responder: A,
        summary_max_chars: usize,
    ) -> Self {
        Self {
            topics,
            messages,
            dedup,
            cache,
            responder,
            summary_max_chars,
        }
    }

    pub fn topics(&self) -> &TopicService<T, M> {
        &self.topics
    }

    pub async fn handle(&self, msg: InboundMessage) -> Result<PipelineOutcome, PipelineError> {
        let mut replies = Vec::new();

        let resolution = self.topics.resolve(msg.chat_id, msg.thread_id).await?;
        if resolution.first_seen {
            replies.push(UNNAMED_TOPIC_NOTICE.to_string());
        }
        let topic_name = resolution.name;

        let text = msg.text.clone().filter(|t| !t.trim().is_empty());
        let row_id = self
            .messages
            .save(&NewMessage {
                chat_id: msg.chat_id,
                thread_id: msg.thread_id,
                topic_name: topic_name.clone(),
                telegram_message_id: msg.telegram_message_id,
                user_id: msg.user_id,
                username: msg.username.clone(),
                kind: msg.kind,
                text: text.clone(),
                file_id: msg.file_id.clone(),
                file_unique_id: msg.file_unique_id.clone(),
                message_link: message_link(
                    msg.chat_id,
                    msg.chat_username.as_deref(),
                    msg.telegram_message_id,
                ),
                created_at: msg.received_at,
            })
            .await?;
        tracing::info!(
            row_id,
            topic = %topic_name,
            kind = %msg.kind,
            user = msg.username.as_deref().unwrap_or("unknown"),
            "message stored"
        );

        let Some(text) = text else {
            replies.push(SAVED_ACK.to_string());
            return Ok(PipelineOutcome {
                topic_name,
                replies,
                route: Route::Saved,
            });
        };

        let url = extract_first_url(&text);
        if let Some(url) = url {
            if let Some((notice, times_shared)) =
                self.check_duplicate(row_id, url, &topic_name).await
            {
                replies.push(notice);
                return Ok(PipelineOutcome {
                    topic_name,
                    replies,
                    route: Route::Duplicate { times_shared },
                });
            }
        }

        let reply = self
            .responder
            .respond(&AgentRequest {
                topic_name: &topic_name,
                user_id: msg.user_id.unwrap_or(0),
                chat_id: msg.chat_id,
                text: &text,
            })
            .await;

        if reply.succeeded {
            if let Err(e) = self
                .messages
                .set_categories(row_id, &topic_name, &reply.tags)
                .await
            {
                tracing::warn!(row_id, error = %e, "failed to store categories");
            }
        }
        if let Some(url) = url {
            self.record_link(row_id, url).await;
        }

        replies.push(reply.text);
        Ok(PipelineOutcome {
            topic_name,
            replies,
            route: Route::Agent,
        })
    }

    /// Returns the notice and share count when `url` is a duplicate in
    /// `topic`. Any registry failure counts as "not a duplicate".
    async fn check_duplicate(&self, row_id: i64, url: &str, topic: &str) -> Option<(String, i64)> {
        let (normalized_url, hit) = match self.dedup.check(url, topic).await {
            Ok(DedupCheck::Seen {
                normalized_url,
                hit,
            }) => (normalized_url, hit),
            Ok(DedupCheck::New { .. }) => return None,
            Ok(DedupCheck::Invalid) => {
                tracing::debug!(url, "URL has no host, skipping dedup");
                return None;
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "duplicate lookup failed, treating as new");
                return None;
            }
        };

        let times_shared = match self.dedup.increment_share(&normalized_url, topic).await {
            Ok(0) => return None,
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(url, error = %e, "share count update failed, treating as new");
                return None;
            }
        };
        tracing::info!(url = %normalized_url, topic, times_shared, "duplicate URL");

        if let Err(e) = self.messages.set_extracted_link(row_id, url).await {
            tracing::warn!(row_id, error = %e, "failed to store extracted link");
        }
        if let Err(e) = self
            .messages
            .mark_indexed(row_id, IndexedBy::Duplicate, Utc::now())
            .await
        {
            tracing::warn!(row_id, error = %e, "failed to mark duplicate");
        }

        Some((
            duplicate_notice(&hit, times_shared, self.summary_max_chars),
            times_shared,
        ))
    }

    /// Store the link and, when the agent scraped it, its summary. The
    /// background indexer picks the row up from there.
    async fn record_link(&self, row_id: i64, url: &str) {
        if let Err(e) = self.messages.set_extracted_link(row_id, url).await {
            tracing::warn!(row_id, error = %e, "failed to store extracted link");
            return;
        }
        match self.cache.get(url).await {
            Ok(Some(page)) => {
                let Some(summary) = page.summary.filter(|s| !s.trim().is_empty()) else {
                    return;
                };
                if let Err(e) = self.messages.set_summary(row_id, &summary).await {
                    tracing::warn!(row_id, error = %e, "failed to store summary");
                }
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(url, error = %e, "scrape cache read failed"),
        }
    }
}
