//! Topic agents.
//!
//! - `profile`: fixed persona per [`Topic`](topicmind_types::topic::Topic)
//! - `prompt`: `SystemPromptBuilder` (date/time context + tool guidelines + persona)
//! - `runner`: `AgentRunner`, the model/tool loop with conversation memory
//! - `router`: `AgentRouter`, topic name -> agent, with fixed fallback replies
//! - `tags`: trailing `Tags:` line parsing

pub mod profile;
pub mod prompt;
pub mod router;
pub mod runner;
pub mod tags;

use topicmind_types::llm::LlmError;

pub use router::{AgentReply, AgentRequest, AgentRouter, Responder};
pub use runner::AgentRunner;

/// Errors from a single agent run. Never shown to the user verbatim.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("LLM call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("model returned an empty reply")]
    EmptyResponse,

    #[error("gave up after {0} tool rounds")]
    ToolRoundsExhausted(usize),
}
