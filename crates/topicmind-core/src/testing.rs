//! In-memory fakes shared by the unit tests.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use topicmind_types::error::{RepositoryError, ToolError};
use topicmind_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, StopReason, ToolCall, ToolDefinition, Usage,
};
use topicmind_types::message::{IndexedBy, MessageKind, NewMessage, PendingIndex};
use topicmind_types::registry::{DuplicateHit, IndexedUrl, ScrapedPage};
use topicmind_types::topic::{Topic, TopicRecord};

use crate::agent::{AgentReply, AgentRequest, Responder};
use crate::llm::provider::LlmProvider;
use crate::repository::indexed_url::IndexedUrlRepository;
use crate::repository::message::MessageRepository;
use crate::repository::scrape_cache::ScrapeCacheRepository;
use crate::repository::topic::TopicRepository;
use crate::tools::search::SearchResult;
use crate::tools::{PageFetcher, SearchProvider, ToolExecutor, web_tool_definitions};

/// A stored message row with the columns later stages fill in.
#[derive(Debug, Clone)]
pub struct StoredMessage {
    pub id: i64,
    pub message: NewMessage,
    pub extracted_link: Option<String>,
    pub summary: Option<String>,
    pub primary_category: Option<String>,
    pub tags: Vec<String>,
    pub indexed_by: Option<IndexedBy>,
    pub indexed_at: Option<DateTime<Utc>>,
}

#[derive(Default)]
struct State {
    indexed: HashMap<(String, String), IndexedUrl>,
    scraped: HashMap<String, ScrapedPage>,
    messages: Vec<StoredMessage>,
    topics: BTreeMap<(i64, i64), TopicRecord>,
    fail_registry: bool,
}

/// One shared state implementing every repository trait. Clones share it.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    fn registry_guard(&self) -> Result<std::sync::MutexGuard<'_, State>, RepositoryError> {
        let state = self.lock();
        if state.fail_registry {
            return Err(RepositoryError::Connection);
        }
        Ok(state)
    }

    /// Make every registry call fail with a connection error.
    pub fn fail_registry(&self, fail: bool) {
        self.lock().fail_registry = fail;
    }

    pub fn indexed_urls(&self) -> Vec<IndexedUrl> {
        self.lock().indexed.values().cloned().collect()
    }

    pub fn put_scraped(&self, url: &str, summary: Option<&str>) {
        self.lock().scraped.insert(
            url.to_string(),
            ScrapedPage {
                url: url.to_string(),
                summary: summary.map(str::to_string),
                full_content: None,
                scraped_at: Utc::now(),
            },
        );
    }

    pub fn scraped(&self, url: &str) -> Option<ScrapedPage> {
        self.lock().scraped.get(url).cloned()
    }

    pub fn messages(&self) -> Vec<StoredMessage> {
        self.lock().messages.clone()
    }

    pub fn message(&self, id: i64) -> Option<StoredMessage> {
        self.lock().messages.iter().find(|m| m.id == id).cloned()
    }

    /// Record a bare message in `thread_id`, as if someone had posted there.
    pub fn add_thread(&self, chat_id: i64, thread_id: i64) {
        let mut state = self.lock();
        let id = state.messages.len() as i64 + 1;
        state.messages.push(StoredMessage {
            id,
            message: NewMessage {
                chat_id,
                thread_id: Some(thread_id),
                topic_name: format!("Topic_{thread_id}"),
                telegram_message_id: id,
                user_id: None,
                username: None,
                kind: MessageKind::Text,
                text: None,
                file_id: None,
                file_unique_id: None,
                message_link: String::new(),
                created_at: Utc::now(),
            },
            extracted_link: None,
            summary: None,
            primary_category: None,
            tags: Vec::new(),
            indexed_by: None,
            indexed_at: None,
        });
    }

    fn update_message(
        &self,
        id: i64,
        f: impl FnOnce(&mut StoredMessage),
    ) -> Result<(), RepositoryError> {
        let mut state = self.lock();
        let row = state
            .messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(RepositoryError::NotFound)?;
        f(row);
        Ok(())
    }
}

impl IndexedUrlRepository for InMemoryStore {
    async fn find(
        &self,
        normalized_url: &str,
        topic: &str,
    ) -> Result<Option<IndexedUrl>, RepositoryError> {
        let state = self.registry_guard()?;
        Ok(state
            .indexed
            .get(&(normalized_url.to_string(), topic.to_string()))
            .cloned())
    }

    async fn find_with_summary(
        &self,
        normalized_url: &str,
        topic: &str,
    ) -> Result<Option<DuplicateHit>, RepositoryError> {
        let state = self.registry_guard()?;
        let Some(entry) = state
            .indexed
            .get(&(normalized_url.to_string(), topic.to_string()))
            .cloned()
        else {
            return Ok(None);
        };
        let page = state.scraped.get(&entry.original_url);
        Ok(Some(DuplicateHit {
            summary: page.and_then(|p| p.summary.clone()),
            scraped_at: page.map(|p| p.scraped_at),
            entry,
        }))
    }

    async fn insert(&self, entry: &IndexedUrl) -> Result<(), RepositoryError> {
        let mut state = self.registry_guard()?;
        let key = (entry.normalized_url.clone(), entry.topic.clone());
        if state.indexed.contains_key(&key) {
            return Err(RepositoryError::Conflict(format!(
                "{} already indexed in {}",
                entry.normalized_url, entry.topic
            )));
        }
        state.indexed.insert(key, entry.clone());
        Ok(())
    }

    async fn increment_share(
        &self,
        normalized_url: &str,
        topic: &str,
        seen_at: DateTime<Utc>,
    ) -> Result<Option<i64>, RepositoryError> {
        let mut state = self.registry_guard()?;
        Ok(state
            .indexed
            .get_mut(&(normalized_url.to_string(), topic.to_string()))
            .map(|entry| {
                entry.times_shared += 1;
                entry.last_seen_at = Some(seen_at);
                entry.times_shared
            }))
    }

    async fn list(&self, topic: Option<&str>, limit: u32) -> Result<Vec<IndexedUrl>, RepositoryError> {
        let state = self.registry_guard()?;
        let mut entries: Vec<IndexedUrl> = state
            .indexed
            .values()
            .filter(|e| topic.is_none_or(|t| e.topic == t))
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.first_indexed_at.cmp(&a.first_indexed_at));
        entries.truncate(limit as usize);
        Ok(entries)
    }
}

impl ScrapeCacheRepository for InMemoryStore {
    async fn get(&self, url: &str) -> Result<Option<ScrapedPage>, RepositoryError> {
        Ok(self.scraped(url))
    }

    async fn put(&self, page: &ScrapedPage) -> Result<(), RepositoryError> {
        self.lock().scraped.insert(page.url.clone(), page.clone());
        Ok(())
    }
}

impl MessageRepository for InMemoryStore {
    async fn save(&self, message: &NewMessage) -> Result<i64, RepositoryError> {
        let mut state = self.lock();
        let id = state.messages.len() as i64 + 1;
        state.messages.push(StoredMessage {
            id,
            message: message.clone(),
            extracted_link: None,
            summary: None,
            primary_category: None,
            tags: Vec::new(),
            indexed_by: None,
            indexed_at: None,
        });
        Ok(id)
    }

    async fn set_extracted_link(&self, id: i64, url: &str) -> Result<(), RepositoryError> {
        self.update_message(id, |m| m.extracted_link = Some(url.to_string()))
    }

    async fn set_summary(&self, id: i64, summary: &str) -> Result<(), RepositoryError> {
        self.update_message(id, |m| m.summary = Some(summary.to_string()))
    }

    async fn set_categories(
        &self,
        id: i64,
        primary_category: &str,
        tags: &[String],
    ) -> Result<(), RepositoryError> {
        self.update_message(id, |m| {
            m.primary_category = Some(primary_category.to_string());
            m.tags = tags.to_vec();
        })
    }

    async fn list_pending_index(
        &self,
        since: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<PendingIndex>, RepositoryError> {
        let state = self.lock();
        let mut pending: Vec<PendingIndex> = state
            .messages
            .iter()
            .filter(|m| m.indexed_by.is_none() && m.message.created_at >= since)
            .filter_map(|m| {
                let url = m.extracted_link.clone()?;
                let summary = m.summary.clone().filter(|s| !s.is_empty())?;
                Some(PendingIndex {
                    message_id: m.id,
                    topic_name: m.message.topic_name.clone(),
                    url,
                    username: m.message.username.clone(),
                    created_at: m.message.created_at,
                    summary,
                })
            })
            .collect();
        pending.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.message_id.cmp(&a.message_id))
        });
        pending.truncate(limit as usize);
        Ok(pending)
    }

    async fn mark_indexed(
        &self,
        id: i64,
        indexed_by: IndexedBy,
        at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        self.update_message(id, |m| {
            m.indexed_by = Some(indexed_by);
            m.indexed_at = Some(at);
        })
    }

    async fn thread_ids(&self, chat_id: i64) -> Result<Vec<i64>, RepositoryError> {
        let state = self.lock();
        let mut ids: Vec<i64> = state
            .messages
            .iter()
            .filter(|m| m.message.chat_id == chat_id)
            .filter_map(|m| m.message.thread_id)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }
}

impl TopicRepository for InMemoryStore {
    async fn upsert(&self, record: &TopicRecord) -> Result<(), RepositoryError> {
        self.lock()
            .topics
            .insert((record.chat_id, record.thread_id), record.clone());
        Ok(())
    }

    async fn get_name(&self, chat_id: i64, thread_id: i64) -> Result<Option<String>, RepositoryError> {
        Ok(self
            .lock()
            .topics
            .get(&(chat_id, thread_id))
            .map(|r| r.topic_name.clone()))
    }

    async fn insert_if_absent(&self, record: &TopicRecord) -> Result<bool, RepositoryError> {
        let mut state = self.lock();
        let key = (record.chat_id, record.thread_id);
        if state.topics.contains_key(&key) {
            return Ok(false);
        }
        state.topics.insert(key, record.clone());
        Ok(true)
    }

    async fn list_for_chat(&self, chat_id: i64) -> Result<Vec<TopicRecord>, RepositoryError> {
        Ok(self
            .lock()
            .topics
            .values()
            .filter(|r| r.chat_id == chat_id)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<TopicRecord>, RepositoryError> {
        Ok(self.lock().topics.values().cloned().collect())
    }
}

/// Replays canned completions in order and records every request.
pub struct ScriptedLlm {
    responses: Mutex<VecDeque<CompletionResponse>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedLlm {
    pub fn new(responses: Vec<CompletionResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn text(content: &str) -> CompletionResponse {
        CompletionResponse {
            id: "resp".to_string(),
            content: content.to_string(),
            model: "scripted".to_string(),
            stop_reason: StopReason::EndTurn,
            tool_calls: Vec::new(),
            usage: Usage::default(),
        }
    }

    pub fn tool_call(id: &str, name: &str, arguments: &str) -> CompletionResponse {
        CompletionResponse {
            stop_reason: StopReason::ToolUse,
            tool_calls: vec![ToolCall {
                id: id.to_string(),
                name: name.to_string(),
                arguments: arguments.to_string(),
            }],
            ..Self::text("")
        }
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl LlmProvider for ScriptedLlm {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| LlmError::Provider {
                message: "no scripted response left".to_string(),
            })
    }
}

/// Offers the web tool definitions and echoes each call back.
pub struct EchoTools;

impl ToolExecutor for EchoTools {
    fn definitions(&self) -> Vec<ToolDefinition> {
        web_tool_definitions()
    }

    async fn execute(&self, call: &ToolCall) -> String {
        format!("{} -> {}", call.name, call.arguments)
    }
}

#[derive(Default)]
pub struct FakeSearch {
    results: Vec<SearchResult>,
}

impl FakeSearch {
    pub fn with_results(results: Vec<SearchResult>) -> Self {
        Self { results }
    }
}

impl SearchProvider for FakeSearch {
    async fn search(
        &self,
        _query: &str,
        max_results: u32,
        _max_chars_per_result: u32,
    ) -> Result<Vec<SearchResult>, ToolError> {
        Ok(self.results.iter().take(max_results as usize).cloned().collect())
    }
}

#[derive(Clone)]
pub struct FakeFetcher {
    content: Option<String>,
    calls: Arc<AtomicUsize>,
}

impl FakeFetcher {
    pub fn ok(content: &str) -> Self {
        Self {
            content: Some(content.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            content: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PageFetcher for FakeFetcher {
    async fn fetch(&self, _url: &str) -> Result<String, ToolError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.content
            .clone()
            .ok_or_else(|| ToolError::Request("connection refused".to_string()))
    }
}

/// Answers every request with a fixed reply and counts calls.
#[derive(Clone)]
pub struct StubResponder {
    text: String,
    tags: Vec<String>,
    succeeded: bool,
    calls: Arc<AtomicUsize>,
    last_topic: Arc<Mutex<Option<String>>>,
}

impl StubResponder {
    pub fn new(text: &str, tags: &[&str]) -> Self {
        Self {
            text: text.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            succeeded: true,
            calls: Arc::new(AtomicUsize::new(0)),
            last_topic: Arc::new(Mutex::new(None)),
        }
    }

    pub fn failing(text: &str) -> Self {
        Self {
            succeeded: false,
            ..Self::new(text, &[])
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_topic(&self) -> Option<String> {
        self.last_topic.lock().unwrap().clone()
    }
}

impl Responder for StubResponder {
    async fn respond(&self, request: &AgentRequest<'_>) -> AgentReply {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_topic.lock().unwrap() = Some(request.topic_name.to_string());
        AgentReply {
            topic: Topic::from_topic_name(request.topic_name),
            text: self.text.clone(),
            tags: self.tags.clone(),
            succeeded: self.succeeded,
        }
    }
}
