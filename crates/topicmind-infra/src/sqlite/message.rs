//! SQLite message log implementation.
//!
//! Implements `MessageRepository` from `topicmind-core`. The row id is the
//! internal key the registry refers to as `first_message_id`; Telegram's own
//! message id is stored in the `message_id` column.

use chrono::{DateTime, Utc};
use sqlx::Row;

use topicmind_core::repository::message::MessageRepository;
use topicmind_types::error::RepositoryError;
use topicmind_types::message::{IndexedBy, NewMessage, PendingIndex};

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

#[derive(Clone)]
pub struct SqliteMessageRepository {
    pool: DatabasePool,
}

impl SqliteMessageRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    async fn update_column(&self, sql: &str, id: i64, value: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query(sql)
            .bind(value)
            .bind(id)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

struct PendingRow {
    id: i64,
    topic_name: String,
    extracted_link: String,
    username: Option<String>,
    created_at: String,
    summary: String,
}

impl PendingRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            topic_name: row.try_get("topic_name")?,
            extracted_link: row.try_get("extracted_link")?,
            username: row.try_get("username")?,
            created_at: row.try_get("created_at")?,
            summary: row.try_get("summary")?,
        })
    }

    fn into_pending(self) -> Result<PendingIndex, RepositoryError> {
        Ok(PendingIndex {
            message_id: self.id,
            topic_name: self.topic_name,
            url: self.extracted_link,
            username: self.username,
            created_at: parse_datetime(&self.created_at)?,
            summary: self.summary,
        })
    }
}

impl MessageRepository for SqliteMessageRepository {
    async fn save(&self, message: &NewMessage) -> Result<i64, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO messages (chat_id, thread_id, topic_name, message_id, user_id, username, message_type, text, file_id, file_unique_id, message_link, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(message.chat_id)
        .bind(message.thread_id)
        .bind(&message.topic_name)
        .bind(message.telegram_message_id)
        .bind(message.user_id)
        .bind(&message.username)
        .bind(message.kind.to_string())
        .bind(&message.text)
        .bind(&message.file_id)
        .bind(&message.file_unique_id)
        .bind(&message.message_link)
        .bind(format_datetime(&message.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.last_insert_rowid())
    }

    async fn set_extracted_link(&self, id: i64, url: &str) -> Result<(), RepositoryError> {
        self.update_column("UPDATE messages SET extracted_link = ? WHERE id = ?", id, url)
            .await
    }

    async fn set_summary(&self, id: i64, summary: &str) -> Result<(), RepositoryError> {
        self.update_column("UPDATE messages SET summary = ? WHERE id = ?", id, summary)
            .await
    }

    async fn set_categories(
        &self,
        id: i64,
        primary_category: &str,
        tags: &[String],
    ) -> Result<(), RepositoryError> {
        let tags_json =
            serde_json::to_string(tags).map_err(|e| RepositoryError::Query(e.to_string()))?;

        let result = sqlx::query(
            "UPDATE messages SET primary_category = ?, secondary_tags = ? WHERE id = ?",
        )
        .bind(primary_category)
        .bind(&tags_json)
        .bind(id)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn list_pending_index(
        &self,
        since: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<PendingIndex>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, topic_name, extracted_link, username, created_at, summary
             FROM messages
             WHERE extracted_link IS NOT NULL
               AND summary IS NOT NULL AND summary != ''
               AND indexed_to_rag = 0
               AND created_at >= ?
             ORDER BY created_at DESC, id DESC
             LIMIT ?",
        )
        .bind(format_datetime(&since))
        .bind(limit)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut pending = Vec::with_capacity(rows.len());
        for row in &rows {
            let pending_row =
                PendingRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            pending.push(pending_row.into_pending()?);
        }
        Ok(pending)
    }

    async fn mark_indexed(
        &self,
        id: i64,
        indexed_by: IndexedBy,
        at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE messages SET indexed_to_rag = 1, indexed_at = ?, indexed_by = ? WHERE id = ?",
        )
        .bind(format_datetime(&at))
        .bind(indexed_by.to_string())
        .bind(id)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn thread_ids(&self, chat_id: i64) -> Result<Vec<i64>, RepositoryError> {
        sqlx::query_scalar(
            "SELECT DISTINCT thread_id FROM messages
             WHERE chat_id = ? AND thread_id IS NOT NULL
             ORDER BY thread_id",
        )
        .bind(chat_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::sqlite::test_pool;
    use topicmind_types::message::MessageKind;

    fn make_message(thread_id: Option<i64>, created_at: DateTime<Utc>) -> NewMessage {
        NewMessage {
            chat_id: -100,
            thread_id,
            topic_name: "Ideas".to_string(),
            telegram_message_id: 10,
            user_id: Some(5),
            username: Some("alice".to_string()),
            kind: MessageKind::Text,
            text: Some("https://a.com".to_string()),
            file_id: None,
            file_unique_id: None,
            message_link: "https://t.me/c/1/10".to_string(),
            created_at,
        }
    }

    async fn row_value(repo: &SqliteMessageRepository, id: i64, column: &str) -> Option<String> {
        sqlx::query_scalar(&format!("SELECT {column} FROM messages WHERE id = ?"))
            .bind(id)
            .fetch_one(&repo.pool.reader)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_save_returns_row_ids() {
        let repo = SqliteMessageRepository::new(test_pool().await);
        let a = repo.save(&make_message(Some(3), Utc::now())).await.unwrap();
        let b = repo.save(&make_message(Some(3), Utc::now())).await.unwrap();
        assert!(b > a);
        assert_eq!(row_value(&repo, a, "message_type").await.as_deref(), Some("text"));
    }

    #[tokio::test]
    async fn test_categories_are_stored_as_json() {
        let repo = SqliteMessageRepository::new(test_pool().await);
        let id = repo.save(&make_message(Some(3), Utc::now())).await.unwrap();
        repo.set_categories(id, "Ideas", &["startup".to_string(), "saas".to_string()])
            .await
            .unwrap();

        assert_eq!(row_value(&repo, id, "primary_category").await.as_deref(), Some("Ideas"));
        assert_eq!(
            row_value(&repo, id, "secondary_tags").await.as_deref(),
            Some(r#"["startup","saas"]"#)
        );
    }

    #[tokio::test]
    async fn test_update_missing_row_is_not_found() {
        let repo = SqliteMessageRepository::new(test_pool().await);
        assert!(matches!(
            repo.set_summary(999, "x").await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_pending_index_selection() {
        let repo = SqliteMessageRepository::new(test_pool().await);
        let now = Utc::now();

        let older = repo.save(&make_message(Some(3), now - Duration::hours(1))).await.unwrap();
        let newer = repo.save(&make_message(Some(3), now)).await.unwrap();
        let stale = repo.save(&make_message(Some(3), now - Duration::hours(48))).await.unwrap();
        let no_summary = repo.save(&make_message(Some(3), now)).await.unwrap();
        let empty_summary = repo.save(&make_message(Some(3), now)).await.unwrap();

        for id in [older, newer, stale, no_summary, empty_summary] {
            repo.set_extracted_link(id, "https://a.com").await.unwrap();
        }
        for id in [older, newer, stale] {
            repo.set_summary(id, "- gist").await.unwrap();
        }
        repo.set_summary(empty_summary, "").await.unwrap();

        let pending = repo
            .list_pending_index(now - Duration::hours(24), 10)
            .await
            .unwrap();
        let ids: Vec<i64> = pending.iter().map(|p| p.message_id).collect();
        assert_eq!(ids, vec![newer, older]);
        assert_eq!(pending[0].url, "https://a.com");
        assert_eq!(pending[0].summary, "- gist");

        let limited = repo
            .list_pending_index(now - Duration::hours(24), 1)
            .await
            .unwrap();
        assert_eq!(limited.len(), 1);

        repo.mark_indexed(newer, IndexedBy::AutoUrl, now).await.unwrap();
        let pending = repo
            .list_pending_index(now - Duration::hours(24), 10)
            .await
            .unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(row_value(&repo, newer, "indexed_by").await.as_deref(), Some("auto_url"));
    }

    #[tokio::test]
    async fn test_thread_ids() {
        let repo = SqliteMessageRepository::new(test_pool().await);
        repo.save(&make_message(Some(7), Utc::now())).await.unwrap();
        repo.save(&make_message(Some(3), Utc::now())).await.unwrap();
        repo.save(&make_message(Some(7), Utc::now())).await.unwrap();
        repo.save(&make_message(None, Utc::now())).await.unwrap();

        assert_eq!(repo.thread_ids(-100).await.unwrap(), vec![3, 7]);
        assert!(repo.thread_ids(-200).await.unwrap().is_empty());
    }
}
