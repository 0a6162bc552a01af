//! Forum topic name repository trait definition.

use topicmind_types::error::RepositoryError;
use topicmind_types::topic::TopicRecord;

/// Repository trait for `(chat_id, thread_id) -> topic_name` mappings.
pub trait TopicRepository: Send + Sync {
    /// Insert or replace the name of a thread.
    fn upsert(
        &self,
        record: &TopicRecord,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn get_name(
        &self,
        chat_id: i64,
        thread_id: i64,
    ) -> impl std::future::Future<Output = Result<Option<String>, RepositoryError>> + Send;

    /// Insert `record` only if the thread has no row yet.
    /// Returns `true` when a row was inserted.
    fn insert_if_absent(
        &self,
        record: &TopicRecord,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// All named threads of a chat, ordered by thread id.
    fn list_for_chat(
        &self,
        chat_id: i64,
    ) -> impl std::future::Future<Output = Result<Vec<TopicRecord>, RepositoryError>> + Send;

    /// All known topics across chats.
    fn list_all(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<TopicRecord>, RepositoryError>> + Send;
}
