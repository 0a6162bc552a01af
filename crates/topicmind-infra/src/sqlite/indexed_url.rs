//! SQLite duplicate registry implementation.
//!
//! Implements `IndexedUrlRepository` from `topicmind-core`. Inserts never
//! replace an existing key, and the share counter is bumped with a single
//! `UPDATE ... RETURNING` on the writer connection, so concurrent sightings
//! each observe a distinct post-increment value.

use chrono::{DateTime, Utc};
use sqlx::Row;

use topicmind_core::repository::indexed_url::IndexedUrlRepository;
use topicmind_types::error::RepositoryError;
use topicmind_types::registry::{DuplicateHit, IndexedUrl};

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `IndexedUrlRepository`.
#[derive(Clone)]
pub struct SqliteIndexedUrlRepository {
    pool: DatabasePool,
}

impl SqliteIndexedUrlRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct IndexedUrlRow {
    normalized_url: String,
    topic_name: String,
    original_url: String,
    first_indexed_at: String,
    first_message_id: i64,
    last_seen_at: Option<String>,
    times_shared: i64,
}

impl IndexedUrlRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            normalized_url: row.try_get("normalized_url")?,
            topic_name: row.try_get("topic_name")?,
            original_url: row.try_get("original_url")?,
            first_indexed_at: row.try_get("first_indexed_at")?,
            first_message_id: row.try_get("first_message_id")?,
            last_seen_at: row.try_get("last_seen_at")?,
            times_shared: row.try_get("times_shared")?,
        })
    }

    fn into_entry(self) -> Result<IndexedUrl, RepositoryError> {
        Ok(IndexedUrl {
            normalized_url: self.normalized_url,
            topic: self.topic_name,
            original_url: self.original_url,
            first_indexed_at: parse_datetime(&self.first_indexed_at)?,
            first_message_id: self.first_message_id,
            last_seen_at: self.last_seen_at.as_deref().map(parse_datetime).transpose()?,
            times_shared: self.times_shared,
        })
    }
}

impl IndexedUrlRepository for SqliteIndexedUrlRepository {
    async fn find(
        &self,
        normalized_url: &str,
        topic: &str,
    ) -> Result<Option<IndexedUrl>, RepositoryError> {
        let row = sqlx::query(
            "SELECT * FROM indexed_urls WHERE normalized_url = ? AND topic_name = ?",
        )
        .bind(normalized_url)
        .bind(topic)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let entry_row =
                    IndexedUrlRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(entry_row.into_entry()?))
            }
            None => Ok(None),
        }
    }

    async fn find_with_summary(
        &self,
        normalized_url: &str,
        topic: &str,
    ) -> Result<Option<DuplicateHit>, RepositoryError> {
        let row = sqlx::query(
            "SELECT u.*, c.summary AS cached_summary, c.scraped_at AS cached_at
             FROM indexed_urls u
             LEFT JOIN url_scrape_cache c ON c.url = u.original_url
             WHERE u.normalized_url = ? AND u.topic_name = ?",
        )
        .bind(normalized_url)
        .bind(topic)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let entry = IndexedUrlRow::from_row(&row)
            .map_err(|e| RepositoryError::Query(e.to_string()))?
            .into_entry()?;
        let summary: Option<String> = row
            .try_get("cached_summary")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        let scraped_at: Option<String> = row
            .try_get("cached_at")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(Some(DuplicateHit {
            entry,
            summary,
            scraped_at: scraped_at.as_deref().map(parse_datetime).transpose()?,
        }))
    }

    async fn insert(&self, entry: &IndexedUrl) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO indexed_urls (normalized_url, topic_name, original_url, first_indexed_at, first_message_id, last_seen_at, times_shared)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&entry.normalized_url)
        .bind(&entry.topic)
        .bind(&entry.original_url)
        .bind(format_datetime(&entry.first_indexed_at))
        .bind(entry.first_message_id)
        .bind(entry.last_seen_at.as_ref().map(format_datetime))
        .bind(entry.times_shared)
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => {
                Err(RepositoryError::Conflict(format!(
                    "'{}' already indexed in topic '{}'",
                    entry.normalized_url, entry.topic
                )))
            }
            Err(e) => Err(RepositoryError::Query(e.to_string())),
        }
    }

    async fn increment_share(
        &self,
        normalized_url: &str,
        topic: &str,
        seen_at: DateTime<Utc>,
    ) -> Result<Option<i64>, RepositoryError> {
        let row = sqlx::query(
            "UPDATE indexed_urls
             SET times_shared = times_shared + 1, last_seen_at = ?
             WHERE normalized_url = ? AND topic_name = ?
             RETURNING times_shared",
        )
        .bind(format_datetime(&seen_at))
        .bind(normalized_url)
        .bind(topic)
        .fetch_optional(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.map(|r| r.try_get::<i64, _>("times_shared"))
            .transpose()
            .map_err(|e| RepositoryError::Query(e.to_string()))
    }

    async fn list(&self, topic: Option<&str>, limit: u32) -> Result<Vec<IndexedUrl>, RepositoryError> {
        let rows = match topic {
            Some(topic) => {
                sqlx::query(
                    "SELECT * FROM indexed_urls WHERE topic_name = ?
                     ORDER BY first_indexed_at DESC LIMIT ?",
                )
                .bind(topic)
                .bind(limit)
                .fetch_all(&self.pool.reader)
                .await
            }
            None => {
                sqlx::query("SELECT * FROM indexed_urls ORDER BY first_indexed_at DESC LIMIT ?")
                    .bind(limit)
                    .fetch_all(&self.pool.reader)
                    .await
            }
        }
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in &rows {
            let entry_row =
                IndexedUrlRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            entries.push(entry_row.into_entry()?);
        }
        Ok(entries)
    }
}
