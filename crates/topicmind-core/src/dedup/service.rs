//! Duplicate registry service.
//!
//! Wraps an [`IndexedUrlRepository`] with the registry contract: keyed
//! lookup, non-upserting register, and an atomic share counter that reports
//! the post-increment value.

use chrono::Utc;

use topicmind_types::error::{RegistryError, RepositoryError};
use topicmind_types::registry::{DuplicateHit, IndexedUrl, NewIndexedUrl};

use crate::repository::indexed_url::IndexedUrlRepository;
use crate::url::normalize_key;

/// Outcome of checking a raw URL against the registry.
#[derive(Debug, Clone)]
pub enum DedupCheck {
    /// The URL has no network location; skip dedup entirely.
    Invalid,
    /// Not registered in this topic yet.
    New { normalized_url: String },
    /// Already registered in this topic.
    Seen {
        normalized_url: String,
        hit: DuplicateHit,
    },
}

/// Service over the `(normalized_url, topic)` keyed registry.
///
/// Generic over the repository trait -- topicmind-core never depends on
/// topicmind-infra.
pub struct DedupService<R: IndexedUrlRepository> {
    repo: R,
}

impl<R: IndexedUrlRepository> DedupService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Keyed read. `Ok(None)` is the miss branch, not an error.
    pub async fn lookup(
        &self,
        normalized_url: &str,
        topic: &str,
    ) -> Result<Option<IndexedUrl>, RegistryError> {
        ensure_key(normalized_url)?;
        Ok(self.repo.find(normalized_url, topic).await?)
    }

    /// Keyed read joined with the scrape cache entry for the original URL.
    pub async fn lookup_with_summary(
        &self,
        normalized_url: &str,
        topic: &str,
    ) -> Result<Option<DuplicateHit>, RegistryError> {
        ensure_key(normalized_url)?;
        Ok(self.repo.find_with_summary(normalized_url, topic).await?)
    }

    /// Normalize `raw_url` and look it up in `topic`.
    pub async fn check(&self, raw_url: &str, topic: &str) -> Result<DedupCheck, RegistryError> {
        let normalized_url = match normalize_key(raw_url) {
            Ok(key) => key,
            Err(RegistryError::InvalidUrl(_)) => return Ok(DedupCheck::Invalid),
            Err(other) => return Err(other),
        };

        match self.lookup_with_summary(&normalized_url, topic).await? {
            Some(hit) => Ok(DedupCheck::Seen {
                normalized_url,
                hit,
            }),
            None => Ok(DedupCheck::New { normalized_url }),
        }
    }

    /// Register a URL on a confirmed miss.
    ///
    /// Never overwrites: an existing key fails with
    /// [`RegistryError::AlreadyExists`] and keeps its original
    /// `first_indexed_at`.
    pub async fn register(&self, new: NewIndexedUrl) -> Result<IndexedUrl, RegistryError> {
        ensure_key(&new.normalized_url)?;

        let entry = IndexedUrl {
            normalized_url: new.normalized_url,
            topic: new.topic,
            original_url: new.original_url,
            first_indexed_at: Utc::now(),
            first_message_id: new.message_id,
            last_seen_at: None,
            times_shared: 1,
        };

        match self.repo.insert(&entry).await {
            Ok(()) => {
                tracing::debug!(
                    url = %entry.normalized_url,
                    topic = %entry.topic,
                    message_id = entry.first_message_id,
                    "registered URL"
                );
                Ok(entry)
            }
            Err(RepositoryError::Conflict(_)) => Err(RegistryError::AlreadyExists {
                normalized_url: entry.normalized_url,
                topic: entry.topic,
            }),
            Err(other) => Err(other.into()),
        }
    }

    /// Register, treating a lost race against a concurrent registration as
    /// a no-op. Returns `Ok(None)` when the key was already present.
    pub async fn register_if_absent(
        &self,
        new: NewIndexedUrl,
    ) -> Result<Option<IndexedUrl>, RegistryError> {
        match self.register(new).await {
            Ok(entry) => Ok(Some(entry)),
            Err(RegistryError::AlreadyExists {
                normalized_url,
                topic,
            }) => {
                tracing::debug!(
                    url = %normalized_url,
                    topic = %topic,
                    "URL registered concurrently, skipping"
                );
                Ok(None)
            }
            Err(other) => Err(other),
        }
    }

    /// Record another sighting and return the post-increment share count.
    ///
    /// Returns `0` without writing anything when the key is not registered.
    /// A `0` is never a valid share count.
    pub async fn increment_share(
        &self,
        normalized_url: &str,
        topic: &str,
    ) -> Result<i64, RegistryError> {
        ensure_key(normalized_url)?;
        match self
            .repo
            .increment_share(normalized_url, topic, Utc::now())
            .await?
        {
            Some(count) => Ok(count),
            None => {
                tracing::warn!(
                    url = %normalized_url,
                    topic = %topic,
                    "increment_share on unregistered URL"
                );
                Ok(0)
            }
        }
    }
}

fn ensure_key(normalized_url: &str) -> Result<(), RegistryError> {
    if normalized_url.is_empty() {
        return Err(RegistryError::InvalidUrl(String::new()));
    }
    Ok(())
}
