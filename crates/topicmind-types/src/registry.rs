//! Duplicate URL registry types.
//!
//! An [`IndexedUrl`] records the first time a URL was indexed within a topic
//! and how often it has been shared since. Entries are keyed by the
//! `(normalized_url, topic)` pair.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registry entry for a URL indexed within one topic.
///
/// `first_indexed_at` and `first_message_id` never change after creation.
/// `times_shared` starts at 1 and only grows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedUrl {
    pub normalized_url: String,
    pub topic: String,
    /// The URL exactly as the user sent it. Join key into the scrape cache.
    pub original_url: String,
    pub first_indexed_at: DateTime<Utc>,
    pub first_message_id: i64,
    pub last_seen_at: Option<DateTime<Utc>>,
    pub times_shared: i64,
}

/// Input for registering a URL on a confirmed registry miss.
#[derive(Debug, Clone)]
pub struct NewIndexedUrl {
    pub original_url: String,
    pub normalized_url: String,
    pub topic: String,
    pub message_id: i64,
}

/// A registry hit joined with whatever the scrape cache holds for the
/// entry's original URL.
///
/// `summary` and `scraped_at` are absent when the cache has no row for
/// `original_url` (the join is a LEFT JOIN).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateHit {
    pub entry: IndexedUrl,
    pub summary: Option<String>,
    pub scraped_at: Option<DateTime<Utc>>,
}

/// Cached scrape result for a raw URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapedPage {
    pub url: String,
    pub summary: Option<String>,
    pub full_content: Option<String>,
    pub scraped_at: DateTime<Utc>,
}
