//! Parallel AI web search.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use topicmind_core::tools::SearchProvider;
use topicmind_core::tools::search::SearchResult;
use topicmind_types::error::ToolError;

use super::{http_client, request_error};

const SEARCH_URL: &str = "https://api.parallel.ai/v1beta/search";
const BETA_HEADER: &str = "search-extract-2025-10-10";
const TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    objective: &'a str,
    mode: &'static str,
    max_results: u32,
    max_chars_per_result: u32,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<RawResult>,
}

#[derive(Debug, Deserialize)]
struct RawResult {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    publish_date: Option<String>,
    #[serde(default)]
    excerpts: Vec<Excerpt>,
}

/// Excerpts arrive either as plain strings or as `{"text": ...}` objects.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Excerpt {
    Text(String),
    Object {
        #[serde(default)]
        text: String,
    },
}

impl Excerpt {
    fn into_text(self) -> String {
        match self {
            Excerpt::Text(text) | Excerpt::Object { text } => text.trim().to_string(),
        }
    }
}

impl From<RawResult> for SearchResult {
    fn from(raw: RawResult) -> Self {
        SearchResult {
            title: raw.title.filter(|t| !t.trim().is_empty()),
            url: raw.url.unwrap_or_default(),
            publish_date: raw.publish_date.filter(|d| !d.trim().is_empty()),
            excerpts: raw
                .excerpts
                .into_iter()
                .map(Excerpt::into_text)
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }
}

/// Does NOT derive Debug: holds the API key.
pub struct ParallelSearch {
    client: reqwest::Client,
    api_key: Option<SecretString>,
    endpoint: String,
}

impl ParallelSearch {
    /// A search backend. Without a key every search fails with
    /// [`ToolError::NotConfigured`].
    pub fn new(api_key: Option<SecretString>) -> Result<Self, ToolError> {
        Ok(Self {
            client: http_client(TIMEOUT)?,
            api_key,
            endpoint: SEARCH_URL.to_string(),
        })
    }
}

fn parse_results(body: &str) -> Result<Vec<SearchResult>, ToolError> {
    let response: SearchResponse = serde_json::from_str(body)
        .map_err(|e| ToolError::Request(format!("invalid search response: {e}")))?;
    Ok(response.results.into_iter().map(SearchResult::from).collect())
}

impl SearchProvider for ParallelSearch {
    async fn search(
        &self,
        query: &str,
        max_results: u32,
        max_chars_per_result: u32,
    ) -> Result<Vec<SearchResult>, ToolError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or(ToolError::NotConfigured("PARALLEL_API_KEY"))?;

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", api_key.expose_secret())
            .header("parallel-beta", BETA_HEADER)
            .json(&SearchRequest {
                objective: query,
                mode: "agentic",
                max_results,
                max_chars_per_result,
            })
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        let body = response.text().await.map_err(request_error)?;
        if !status.is_success() {
            tracing::error!(%status, "search API error");
            return Err(ToolError::Request(format!("search API returned HTTP {status}")));
        }
        parse_results(&body)
    }
}
