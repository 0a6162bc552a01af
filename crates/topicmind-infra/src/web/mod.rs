//! HTTP backends for the agents' web tools.
//!
//! - [`ParallelSearch`]: Parallel AI search API behind `SearchProvider`
//! - [`ReaderFetcher`]: Firecrawl with Jina Reader fallback behind `PageFetcher`

pub mod scrape;
pub mod search;

pub use scrape::ReaderFetcher;
pub use search::ParallelSearch;

use std::time::Duration;

use topicmind_types::error::ToolError;

fn http_client(timeout: Duration) -> Result<reqwest::Client, ToolError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ToolError::Request(format!("failed to create HTTP client: {e}")))
}

fn request_error(e: reqwest::Error) -> ToolError {
    if e.is_timeout() {
        ToolError::Timeout
    } else {
        ToolError::Request(e.to_string())
    }
}
