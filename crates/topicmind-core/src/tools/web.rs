//! Web search and scrape tools.
//!
//! The HTTP backends live in topicmind-infra behind [`SearchProvider`] and
//! [`PageFetcher`]. This module owns the tool behavior: argument parsing,
//! the scrape cache keyed by raw URL, content clipping and summarization.

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;

use topicmind_types::config::{BotConfig, ScrapeConfig, SearchConfig};
use topicmind_types::error::ToolError;
use topicmind_types::llm::{ToolCall, ToolDefinition};
use topicmind_types::registry::ScrapedPage;

use super::search::{SearchResult, format_search_results};
use super::summarize::summarize_page;
use super::{ToolExecutor, WEB_SCRAPE, WEB_SEARCH, web_tool_definitions};
use crate::llm::provider::LlmProvider;
use crate::repository::scrape_cache::ScrapeCacheRepository;

/// Token cap for page summaries.
const SUMMARY_MAX_TOKENS: u32 = 1024;

/// Backend for `web_search`.
pub trait SearchProvider: Send + Sync {
    fn search(
        &self,
        query: &str,
        max_results: u32,
        max_chars_per_result: u32,
    ) -> impl std::future::Future<Output = Result<Vec<SearchResult>, ToolError>> + Send;
}

/// Backend for `web_scrape`: fetches a page as markdown/plain text.
pub trait PageFetcher: Send + Sync {
    fn fetch(
        &self,
        url: &str,
    ) -> impl std::future::Future<Output = Result<String, ToolError>> + Send;
}

#[derive(Debug, Deserialize)]
struct SearchArgs {
    query: String,
}

#[derive(Debug, Deserialize)]
struct ScrapeArgs {
    url: String,
}

/// The agents' tool set: search plus cached, summarized scraping.
pub struct WebToolkit<S, F, C, L> {
    search: S,
    fetcher: F,
    cache: C,
    llm: Arc<L>,
    model: String,
    search_config: SearchConfig,
    scrape_config: ScrapeConfig,
}

impl<S, F, C, L> WebToolkit<S, F, C, L>
where
    S: SearchProvider,
    F: PageFetcher,
    C: ScrapeCacheRepository,
    L: LlmProvider,
{
    pub fn new(search: S, fetcher: F, cache: C, llm: Arc<L>, config: &BotConfig) -> Self {
        Self {
            search,
            fetcher,
            cache,
            llm,
            model: config.model.clone(),
            search_config: config.search.clone(),
            scrape_config: config.scrape.clone(),
        }
    }

    /// Run a web search and render the results.
    pub async fn web_search(&self, query: &str) -> Result<String, ToolError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ToolError::InvalidArguments("empty search query".to_string()));
        }

        tracing::info!(query, "web search");
        let results = self
            .search
            .search(
                query,
                self.search_config.max_results,
                self.search_config.max_chars_per_result,
            )
            .await?;
        tracing::debug!(query, count = results.len(), "search results");
        Ok(format_search_results(query, &results))
    }

    /// Summarize a page, serving from the scrape cache when possible.
    ///
    /// Fresh summaries are written to the cache under the raw `url`.
    pub async fn web_scrape(&self, url: &str) -> Result<String, ToolError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ToolError::InvalidArguments("no URL provided".to_string()));
        }

        match self.cache.get(url).await {
            Ok(Some(page)) => {
                if let Some(summary) = page.summary.filter(|s| !s.trim().is_empty()) {
                    tracing::info!(url, "scrape cache hit");
                    return Ok(render_summary(url, &summary));
                }
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(url, error = %e, "scrape cache read failed"),
        }

        tracing::info!(url, "scraping page");
        let content = self.fetcher.fetch(url).await?;
        if content.trim().is_empty() {
            return Err(ToolError::EmptyContent(url.to_string()));
        }

        let summary = summarize_page(
            self.llm.as_ref(),
            &self.model,
            SUMMARY_MAX_TOKENS,
            &content,
            self.scrape_config.max_content_chars,
        )
        .await?;

        let page = ScrapedPage {
            url: url.to_string(),
            summary: Some(summary.clone()),
            full_content: Some(content),
            scraped_at: Utc::now(),
        };
        if let Err(e) = self.cache.put(&page).await {
            tracing::warn!(url, error = %e, "failed to cache scraped page");
        }

        Ok(render_summary(url, &summary))
    }
}

fn render_summary(url: &str, summary: &str) -> String {
    format!("Summary of {url}:\n\n{summary}")
}

fn parse_args<'a, T: Deserialize<'a>>(arguments: &'a str) -> Result<T, ToolError> {
    serde_json::from_str(arguments).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

impl<S, F, C, L> ToolExecutor for WebToolkit<S, F, C, L>
where
    S: SearchProvider,
    F: PageFetcher,
    C: ScrapeCacheRepository,
    L: LlmProvider,
{
    fn definitions(&self) -> Vec<ToolDefinition> {
        web_tool_definitions()
    }

    async fn execute(&self, call: &ToolCall) -> String {
        let result = match call.name.as_str() {
            WEB_SEARCH => match parse_args::<SearchArgs>(&call.arguments) {
                Ok(args) => self.web_search(&args.query).await,
                Err(e) => Err(e),
            },
            WEB_SCRAPE => match parse_args::<ScrapeArgs>(&call.arguments) {
                Ok(args) => self.web_scrape(&args.url).await,
                Err(e) => Err(e),
            },
            other => Err(ToolError::UnknownTool(other.to_string())),
        };

        result.unwrap_or_else(|e| {
            tracing::warn!(tool = %call.name, error = %e, "tool call failed");
            format!("Error: {e}")
        })
    }
}
