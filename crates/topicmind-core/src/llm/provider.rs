//! LlmProvider trait definition.
//!
//! This is the core abstraction that all LLM providers implement.

use topicmind_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for chat completion backends.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition). Providers
/// that support function tools return requested calls in
/// `CompletionResponse::tool_calls` with `StopReason::ToolUse`.
///
/// Implementations live in topicmind-infra (e.g., `OpenRouterProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "openrouter").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
