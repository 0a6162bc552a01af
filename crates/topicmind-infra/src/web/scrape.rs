//! Page fetching: Firecrawl first, Jina Reader as fallback.
//!
//! Firecrawl is skipped for LinkedIn (it cannot get past the login wall)
//! and when no key is configured. Jina Reader needs no key.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use topicmind_core::tools::PageFetcher;
use topicmind_types::error::ToolError;

use super::{http_client, request_error};

const FIRECRAWL_URL: &str = "https://api.firecrawl.dev/v1/scrape";
const JINA_READER_URL: &str = "https://r.jina.ai/";
const TIMEOUT: Duration = Duration::from_secs(30);

/// Marker after which Jina's LinkedIn output holds the actual post.
const LINKEDIN_CONTENT_MARKER: &str = "Markdown Content:";

#[derive(Debug, Serialize)]
struct FirecrawlRequest<'a> {
    url: &'a str,
}

#[derive(Debug, Deserialize)]
struct FirecrawlResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<FirecrawlData>,
}

#[derive(Debug, Deserialize)]
struct FirecrawlData {
    #[serde(default)]
    markdown: Option<String>,
}

fn is_linkedin(url: &str) -> bool {
    url.to_lowercase().contains("linkedin.com")
}

/// Drop LinkedIn login-page noise from Jina output.
fn strip_linkedin_preamble(url: &str, content: String) -> String {
    if !is_linkedin(url) {
        return content;
    }
    match content.find(LINKEDIN_CONTENT_MARKER) {
        Some(idx) => content[idx + LINKEDIN_CONTENT_MARKER.len()..].to_string(),
        None => content,
    }
}

/// Does NOT derive Debug: holds the Firecrawl key.
pub struct ReaderFetcher {
    client: reqwest::Client,
    firecrawl_key: Option<SecretString>,
}

impl ReaderFetcher {
    pub fn new(firecrawl_key: Option<SecretString>) -> Result<Self, ToolError> {
        Ok(Self {
            client: http_client(TIMEOUT)?,
            firecrawl_key,
        })
    }

    async fn firecrawl(&self, key: &SecretString, url: &str) -> Result<String, ToolError> {
        let response = self
            .client
            .post(FIRECRAWL_URL)
            .bearer_auth(key.expose_secret())
            .json(&FirecrawlRequest { url })
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::Request(format!("Firecrawl returned HTTP {status}")));
        }
        let body: FirecrawlResponse = response
            .json()
            .await
            .map_err(|e| ToolError::Request(format!("invalid Firecrawl response: {e}")))?;

        body.success
            .then_some(body.data)
            .flatten()
            .and_then(|d| d.markdown)
            .filter(|m| !m.trim().is_empty())
            .ok_or_else(|| ToolError::EmptyContent(url.to_string()))
    }

    async fn jina(&self, url: &str) -> Result<String, ToolError> {
        let response = self
            .client
            .get(format!("{JINA_READER_URL}{url}"))
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::Request(format!("Jina Reader returned HTTP {status}")));
        }
        let content = response.text().await.map_err(request_error)?;
        Ok(strip_linkedin_preamble(url, content))
    }
}

impl PageFetcher for ReaderFetcher {
    async fn fetch(&self, url: &str) -> Result<String, ToolError> {
        if let Some(key) = self.firecrawl_key.as_ref().filter(|_| !is_linkedin(url)) {
            match self.firecrawl(key, url).await {
                Ok(content) => return Ok(content),
                Err(e) => tracing::warn!(url, error = %e, "Firecrawl failed, falling back to Jina"),
            }
        }
        tracing::debug!(url, "fetching with Jina Reader");
        self.jina(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linkedin_detection() {
        assert!(is_linkedin("https://www.LinkedIn.com/posts/abc"));
        assert!(!is_linkedin("https://example.com"));
    }

    #[test]
    fn linkedin_preamble_is_stripped() {
        let raw = "Title: Sign in\nJoin now\nMarkdown Content:\nThe actual post".to_string();
        assert_eq!(
            strip_linkedin_preamble("https://linkedin.com/posts/1", raw.clone()),
            "\nThe actual post"
        );
        // Other sites keep everything.
        assert_eq!(strip_linkedin_preamble("https://example.com", raw.clone()), raw);
        // No marker: unchanged.
        assert_eq!(
            strip_linkedin_preamble("https://linkedin.com/x", "plain".to_string()),
            "plain"
        );
    }

    #[test]
    fn firecrawl_response_parsing() {
        let body: FirecrawlResponse =
            serde_json::from_str(r##"{"success": true, "data": {"markdown": "# Hi"}}"##).unwrap();
        assert!(body.success);
        assert_eq!(body.data.unwrap().markdown.as_deref(), Some("# Hi"));

        let failed: FirecrawlResponse = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert!(!failed.success);
        assert!(failed.data.is_none());
    }
}
