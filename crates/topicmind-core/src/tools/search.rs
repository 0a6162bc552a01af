//! Web search results and their text rendering for the model.

use serde::{Deserialize, Serialize};

/// Excerpts shown per result.
pub const MAX_EXCERPTS_PER_RESULT: usize = 3;

/// One search hit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: Option<String>,
    pub url: String,
    pub publish_date: Option<String>,
    #[serde(default)]
    pub excerpts: Vec<String>,
}

/// Render results as numbered entries.
pub fn format_search_results(query: &str, results: &[SearchResult]) -> String {
    if results.is_empty() {
        return format!("No search results found for query: {query}");
    }

    let mut lines = vec![format!("Web search results for: {query}\n")];
    for (idx, result) in results.iter().enumerate() {
        let title = result
            .title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or("No title");
        lines.push(format!("\n[{}] {title}", idx + 1));
        lines.push(format!("URL: {}", result.url));

        if let Some(date) = result.publish_date.as_deref().filter(|d| !d.is_empty()) {
            lines.push(format!("Published: {date}"));
        }

        let excerpts: Vec<&str> = result
            .excerpts
            .iter()
            .map(|e| e.trim())
            .filter(|e| !e.is_empty())
            .take(MAX_EXCERPTS_PER_RESULT)
            .collect();
        if !excerpts.is_empty() {
            lines.push("Key excerpts:".to_string());
            for excerpt in excerpts {
                lines.push(format!("  - {excerpt}"));
            }
        }
    }
    lines.join("\n")
}
