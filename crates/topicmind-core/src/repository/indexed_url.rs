//! Duplicate URL registry repository trait definition.

use chrono::{DateTime, Utc};

use topicmind_types::error::RepositoryError;
use topicmind_types::registry::{DuplicateHit, IndexedUrl};

/// Repository trait for the `(normalized_url, topic)` keyed registry.
///
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait IndexedUrlRepository: Send + Sync {
    /// Keyed read. `Ok(None)` when the key is absent.
    fn find(
        &self,
        normalized_url: &str,
        topic: &str,
    ) -> impl std::future::Future<Output = Result<Option<IndexedUrl>, RepositoryError>> + Send;

    /// Keyed read joined with the scrape cache on `original_url`.
    fn find_with_summary(
        &self,
        normalized_url: &str,
        topic: &str,
    ) -> impl std::future::Future<Output = Result<Option<DuplicateHit>, RepositoryError>> + Send;

    /// Insert a new entry. Returns `Conflict` if the key already exists;
    /// the existing row is left untouched.
    fn insert(
        &self,
        entry: &IndexedUrl,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Atomically bump `times_shared` and set `last_seen_at`.
    ///
    /// Returns the post-increment count, or `None` when the key is absent
    /// (in which case nothing is written).
    fn increment_share(
        &self,
        normalized_url: &str,
        topic: &str,
        seen_at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<Option<i64>, RepositoryError>> + Send;

    /// List entries, most recently indexed first, optionally for one topic.
    fn list(
        &self,
        topic: Option<&str>,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<IndexedUrl>, RepositoryError>> + Send;
}
