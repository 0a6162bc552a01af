//! Function tools exposed to the agents.
//!
//! The model sees two tools, `web_search` and `web_scrape`. A
//! [`ToolExecutor`] runs a requested call and always produces text: failures
//! come back as `Error: ...` so the model can recover.

pub mod search;
pub mod summarize;
pub mod web;

use serde_json::json;

use topicmind_types::llm::{ToolCall, ToolDefinition};

pub use web::{PageFetcher, SearchProvider, WebToolkit};

pub const WEB_SEARCH: &str = "web_search";
pub const WEB_SCRAPE: &str = "web_scrape";

/// Runs tool calls requested by the model.
pub trait ToolExecutor: Send + Sync {
    /// Tools offered to the model.
    fn definitions(&self) -> Vec<ToolDefinition>;

    /// Execute one call. Never fails: errors are rendered into the result.
    fn execute(&self, call: &ToolCall) -> impl std::future::Future<Output = String> + Send;
}

/// Definitions of the built-in web tools.
pub fn web_tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: WEB_SEARCH.to_string(),
            description: "Search the web for current information. Returns numbered results \
                          with URLs, publish dates and key excerpts. Use English queries."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search query or objective in natural language"
                    }
                },
                "required": ["query"]
            }),
        },
        ToolDefinition {
            name: WEB_SCRAPE.to_string(),
            description: "Fetch a web page and return a concise bullet-point summary of its \
                          content. Use whenever the user provides a URL."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "url": {
                        "type": "string",
                        "description": "The URL to scrape"
                    }
                },
                "required": ["url"]
            }),
        },
    ]
}
