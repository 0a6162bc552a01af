//! Message log repository trait definition.
//!
//! Every inbound chat message is persisted. Later stages annotate the stored
//! row: the pipeline records the extracted link, summary and tags, and the
//! background indexer marks rows as resolved.

use chrono::{DateTime, Utc};

use topicmind_types::error::RepositoryError;
use topicmind_types::message::{IndexedBy, NewMessage, PendingIndex};

/// Repository trait for the inbound message log.
///
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait MessageRepository: Send + Sync {
    /// Persist a message and return its row id.
    fn save(
        &self,
        message: &NewMessage,
    ) -> impl std::future::Future<Output = Result<i64, RepositoryError>> + Send;

    fn set_extracted_link(
        &self,
        id: i64,
        url: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn set_summary(
        &self,
        id: i64,
        summary: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Store the primary category and secondary tags (as a JSON array).
    fn set_categories(
        &self,
        id: i64,
        primary_category: &str,
        tags: &[String],
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Messages with a link and a non-empty summary that have not been
    /// indexed yet, created at or after `since`, newest first.
    fn list_pending_index(
        &self,
        since: DateTime<Utc>,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<PendingIndex>, RepositoryError>> + Send;

    fn mark_indexed(
        &self,
        id: i64,
        indexed_by: IndexedBy,
        at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Distinct thread ids that have messages in a chat.
    fn thread_ids(
        &self,
        chat_id: i64,
    ) -> impl std::future::Future<Output = Result<Vec<i64>, RepositoryError>> + Send;
}
