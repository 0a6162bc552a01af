//! SQLite topic name repository implementation.

use sqlx::Row;

use topicmind_core::repository::topic::TopicRepository;
use topicmind_types::error::RepositoryError;
use topicmind_types::topic::TopicRecord;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

#[derive(Clone)]
pub struct SqliteTopicRepository {
    pool: DatabasePool,
}

impl SqliteTopicRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn record_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<TopicRecord, RepositoryError> {
    let updated_at: String = row
        .try_get("updated_at")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    Ok(TopicRecord {
        chat_id: row
            .try_get("chat_id")
            .map_err(|e| RepositoryError::Query(e.to_string()))?,
        thread_id: row
            .try_get("thread_id")
            .map_err(|e| RepositoryError::Query(e.to_string()))?,
        topic_name: row
            .try_get("topic_name")
            .map_err(|e| RepositoryError::Query(e.to_string()))?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

impl TopicRepository for SqliteTopicRepository {
    async fn upsert(&self, record: &TopicRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT OR REPLACE INTO topics (chat_id, thread_id, topic_name, updated_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(record.chat_id)
        .bind(record.thread_id)
        .bind(&record.topic_name)
        .bind(format_datetime(&record.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(())
    }

    async fn get_name(&self, chat_id: i64, thread_id: i64) -> Result<Option<String>, RepositoryError> {
        sqlx::query_scalar("SELECT topic_name FROM topics WHERE chat_id = ? AND thread_id = ?")
            .bind(chat_id)
            .bind(thread_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))
    }

    async fn insert_if_absent(&self, record: &TopicRecord) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO topics (chat_id, thread_id, topic_name, updated_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(record.chat_id)
        .bind(record.thread_id)
        .bind(&record.topic_name)
        .bind(format_datetime(&record.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_for_chat(&self, chat_id: i64) -> Result<Vec<TopicRecord>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM topics WHERE chat_id = ? ORDER BY thread_id")
            .bind(chat_id)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        rows.iter().map(record_from_row).collect()
    }

    async fn list_all(&self) -> Result<Vec<TopicRecord>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM topics ORDER BY chat_id, thread_id")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        rows.iter().map(record_from_row).collect()
    }
}
