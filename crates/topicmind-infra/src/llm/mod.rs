//! LLM provider implementations.
//!
//! Contains the concrete [`LlmProvider`](topicmind_core::llm::LlmProvider)
//! used by the agents: OpenRouter over the OpenAI-compatible chat API.

pub mod openrouter;

use secrecy::SecretString;

use topicmind_core::llm::box_provider::BoxLlmProvider;
use topicmind_types::llm::LlmError;

use self::openrouter::OpenRouterProvider;

/// Build the boxed chat provider from an API key and base URL.
pub fn create_provider(api_key: SecretString, base_url: &str) -> Result<BoxLlmProvider, LlmError> {
    let provider = OpenRouterProvider::new(api_key, base_url)?;
    tracing::debug!(base_url, "LLM provider ready");
    Ok(BoxLlmProvider::new(provider))
}
