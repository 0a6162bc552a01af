//! LLM summarization of scraped page content.

use topicmind_types::error::ToolError;
use topicmind_types::llm::{CompletionRequest, Message};

use crate::llm::provider::LlmProvider;

const SUMMARY_SYSTEM_PROMPT: &str = "You are an expert summarizer. Create a concise, \
information-dense summary.\n\
Format as 5-10 bullet points maximum.\n\
Use PLAIN TEXT only - no markdown formatting.\n\
Start each bullet with a dash (-) or bullet (•).\n\
Focus on key insights and actionable information.";

/// First `max_chars` characters of `content`.
pub fn clip_content(content: &str, max_chars: usize) -> &str {
    match content.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &content[..byte_idx],
        None => content,
    }
}

/// Summarize page content into plain-text bullets.
pub async fn summarize_page<L: LlmProvider>(
    llm: &L,
    model: &str,
    max_tokens: u32,
    content: &str,
    max_content_chars: usize,
) -> Result<String, ToolError> {
    let request = CompletionRequest {
        model: model.to_string(),
        messages: vec![Message::user(clip_content(content, max_content_chars))],
        system: Some(SUMMARY_SYSTEM_PROMPT.to_string()),
        max_tokens,
        temperature: None,
        tools: Vec::new(),
    };

    let response = llm
        .complete(&request)
        .await
        .map_err(|e| ToolError::Summarize(e.to_string()))?;

    let summary = response.content.trim();
    if summary.is_empty() {
        return Err(ToolError::Summarize("model returned an empty summary".to_string()));
    }
    Ok(summary.to_string())
}
