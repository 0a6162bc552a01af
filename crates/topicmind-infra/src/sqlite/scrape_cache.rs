//! SQLite scrape cache implementation.

use sqlx::Row;

use topicmind_core::repository::scrape_cache::ScrapeCacheRepository;
use topicmind_types::error::RepositoryError;
use topicmind_types::registry::ScrapedPage;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

#[derive(Clone)]
pub struct SqliteScrapeCacheRepository {
    pool: DatabasePool,
}

impl SqliteScrapeCacheRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

impl ScrapeCacheRepository for SqliteScrapeCacheRepository {
    async fn get(&self, url: &str) -> Result<Option<ScrapedPage>, RepositoryError> {
        let row = sqlx::query(
            "SELECT url, summary, full_content, scraped_at FROM url_scrape_cache WHERE url = ?",
        )
        .bind(url)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let scraped_at: String = row
            .try_get("scraped_at")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(Some(ScrapedPage {
            url: row
                .try_get("url")
                .map_err(|e| RepositoryError::Query(e.to_string()))?,
            summary: row
                .try_get("summary")
                .map_err(|e| RepositoryError::Query(e.to_string()))?,
            full_content: row
                .try_get("full_content")
                .map_err(|e| RepositoryError::Query(e.to_string()))?,
            scraped_at: parse_datetime(&scraped_at)?,
        }))
    }

    async fn put(&self, page: &ScrapedPage) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT OR REPLACE INTO url_scrape_cache (url, summary, full_content, scraped_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(&page.url)
        .bind(&page.summary)
        .bind(&page.full_content)
        .bind(format_datetime(&page.scraped_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(())
    }
}
