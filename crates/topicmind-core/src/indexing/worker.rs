//! Periodic indexer.
//!
//! Picks up stored messages whose link has been summarized but not yet
//! indexed, and registers each link under its topic. Every processed row
//! gets an `indexed_by` marker so it is never selected again.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tokio_util::sync::CancellationToken;

use topicmind_types::config::IndexingConfig;
use topicmind_types::error::{RegistryError, WorkerError};
use topicmind_types::message::{IndexedBy, PendingIndex};
use topicmind_types::registry::NewIndexedUrl;

use crate::dedup::DedupService;
use crate::repository::indexed_url::IndexedUrlRepository;
use crate::repository::message::MessageRepository;
use crate::url::normalize;

/// Counts for one polling pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub scanned: usize,
    pub registered: usize,
    pub duplicates: usize,
    pub invalid: usize,
    pub failed: usize,
}

pub struct IndexingWorker<M: MessageRepository, R: IndexedUrlRepository> {
    messages: M,
    dedup: DedupService<R>,
    config: IndexingConfig,
}

impl<M: MessageRepository, R: IndexedUrlRepository> IndexingWorker<M, R> {
    pub fn new(messages: M, dedup: DedupService<R>, config: IndexingConfig) -> Self {
        Self {
            messages,
            dedup,
            config,
        }
    }

    /// Process one batch of pending messages.
    ///
    /// Only loading the batch can fail; per-item errors are logged, counted
    /// and leave the row pending for the next pass.
    pub async fn run_batch(&self) -> Result<BatchReport, WorkerError> {
        let since = self.lookback_start(Utc::now())?;
        let pending = self
            .messages
            .list_pending_index(since, self.config.batch_size)
            .await?;

        let mut report = BatchReport {
            scanned: pending.len(),
            ..BatchReport::default()
        };

        for item in &pending {
            match self.index_one(item).await {
                Ok(IndexedBy::AutoUrl) => report.registered += 1,
                Ok(IndexedBy::Duplicate) => report.duplicates += 1,
                Ok(IndexedBy::InvalidUrl) => report.invalid += 1,
                Err(e) => {
                    report.failed += 1;
                    tracing::error!(
                        message_id = item.message_id,
                        url = %item.url,
                        error = %e,
                        "indexing failed"
                    );
                }
            }
        }

        if report.scanned > 0 {
            tracing::info!(
                scanned = report.scanned,
                registered = report.registered,
                duplicates = report.duplicates,
                invalid = report.invalid,
                failed = report.failed,
                "indexing batch done"
            );
        }
        Ok(report)
    }

    /// Oldest creation time a pending message may have.
    fn lookback_start(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>, WorkerError> {
        let hours = self.config.lookback_hours;
        TimeDelta::try_hours(hours)
            .and_then(|lookback| now.checked_sub_signed(lookback))
            .ok_or(WorkerError::LookbackOutOfRange(hours))
    }

    async fn index_one(&self, item: &PendingIndex) -> Result<IndexedBy, RegistryError> {
        let normalized_url = normalize(&item.url);
        let marker = if normalized_url.is_empty() {
            tracing::debug!(message_id = item.message_id, url = %item.url, "unparseable link");
            IndexedBy::InvalidUrl
        } else if self
            .dedup
            .lookup(&normalized_url, &item.topic_name)
            .await?
            .is_some()
        {
            IndexedBy::Duplicate
        } else {
            self.dedup
                .register_if_absent(NewIndexedUrl {
                    original_url: item.url.clone(),
                    normalized_url,
                    topic: item.topic_name.clone(),
                    message_id: item.message_id,
                })
                .await?;
            IndexedBy::AutoUrl
        };

        self.messages
            .mark_indexed(item.message_id, marker, Utc::now())
            .await?;
        Ok(marker)
    }

    /// Poll until `cancel` fires. A failing batch backs off for twice the
    /// normal interval.
    pub async fn run(self, cancel: CancellationToken) {
        let interval = Duration::from_secs(self.config.poll_interval_secs.max(1));
        tracing::info!(
            interval_secs = interval.as_secs(),
            batch_size = self.config.batch_size,
            "indexing worker started"
        );

        loop {
            let wait = match self.run_batch().await {
                Ok(_) => interval,
                Err(e) => {
                    tracing::error!(error = %e, "indexing batch failed");
                    interval.saturating_mul(2)
                }
            };

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(wait) => {}
            }
        }

        tracing::info!("indexing worker stopped");
    }
}
