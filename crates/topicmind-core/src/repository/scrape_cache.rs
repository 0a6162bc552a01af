//! Scrape cache repository trait definition.
//!
//! The cache is keyed by the raw URL exactly as it was scraped, never by the
//! normalized dedup key.

use topicmind_types::error::RepositoryError;
use topicmind_types::registry::ScrapedPage;

pub trait ScrapeCacheRepository: Send + Sync {
    fn get(
        &self,
        url: &str,
    ) -> impl std::future::Future<Output = Result<Option<ScrapedPage>, RepositoryError>> + Send;

    /// Insert or replace the cached page for `page.url`.
    fn put(
        &self,
        page: &ScrapedPage,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
