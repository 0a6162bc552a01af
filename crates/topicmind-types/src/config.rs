//! Configuration types for topicmind.
//!
//! `BotConfig` represents the `config.toml` in the data directory. Every field
//! has a default so an empty or missing file yields a working configuration.
//! Secrets are never part of this file; they come from the environment.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default chat model routed through OpenRouter.
pub const DEFAULT_MODEL: &str = "minimax/minimax-m2.1";

/// Default OpenAI-compatible API base URL.
pub const DEFAULT_LLM_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Top-level bot configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// SQLite database file. `None` means `<data_dir>/topicmind.db`.
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_llm_base_url")]
    pub llm_base_url: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Exchanges kept per conversation.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Upper bound on model/tool round trips for one reply.
    #[serde(default = "default_max_tool_rounds")]
    pub max_tool_rounds: usize,

    #[serde(default)]
    pub indexing: IndexingConfig,

    #[serde(default)]
    pub scrape: ScrapeConfig,

    #[serde(default)]
    pub search: SearchConfig,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_llm_base_url() -> String {
    DEFAULT_LLM_BASE_URL.to_string()
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_history_limit() -> usize {
    10
}

fn default_max_tool_rounds() -> usize {
    6
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            model: default_model(),
            llm_base_url: default_llm_base_url(),
            max_tokens: default_max_tokens(),
            history_limit: default_history_limit(),
            max_tool_rounds: default_max_tool_rounds(),
            indexing: IndexingConfig::default(),
            scrape: ScrapeConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

/// Background indexer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexingConfig {
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    #[serde(default = "default_batch_size")]
    pub batch_size: u32,

    /// Only messages newer than this are picked up.
    #[serde(default = "default_lookback_hours")]
    pub lookback_hours: i64,
}

fn default_poll_interval_secs() -> u64 {
    10
}

fn default_batch_size() -> u32 {
    10
}

fn default_lookback_hours() -> i64 {
    24
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            batch_size: default_batch_size(),
            lookback_hours: default_lookback_hours(),
        }
    }
}

/// Page scraping and summarization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Page content beyond this many characters is not sent to the summarizer.
    #[serde(default = "default_max_content_chars")]
    pub max_content_chars: usize,

    /// Cached summaries are cut to this length in duplicate notices.
    #[serde(default = "default_summary_max_chars")]
    pub summary_max_chars: usize,
}

fn default_max_content_chars() -> usize {
    50_000
}

fn default_summary_max_chars() -> usize {
    500
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            max_content_chars: default_max_content_chars(),
            summary_max_chars: default_summary_max_chars(),
        }
    }
}

/// Web search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_max_results")]
    pub max_results: u32,

    #[serde(default = "default_max_chars_per_result")]
    pub max_chars_per_result: u32,
}

fn default_max_results() -> u32 {
    6
}

fn default_max_chars_per_result() -> u32 {
    800
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            max_chars_per_result: default_max_chars_per_result(),
        }
    }
}
