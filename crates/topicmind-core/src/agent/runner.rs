//! The model/tool loop for one agent turn.
//!
//! A turn sends the conversation history plus the new user message. While
//! the model asks for tools, each call is executed and its output appended
//! as a tool message; the first reply without tool calls ends the turn.

use std::sync::Arc;

use chrono::Local;

use topicmind_types::config::BotConfig;
use topicmind_types::llm::{CompletionRequest, Message};
use topicmind_types::memory::ConversationKey;

use super::AgentError;
use super::profile::AgentProfile;
use super::prompt::SystemPromptBuilder;
use crate::llm::provider::LlmProvider;
use crate::memory::ConversationMemory;
use crate::tools::ToolExecutor;

pub struct AgentRunner<L, T> {
    llm: Arc<L>,
    tools: Arc<T>,
    memory: ConversationMemory,
    model: String,
    max_tokens: u32,
    max_tool_rounds: usize,
}

impl<L: LlmProvider, T: ToolExecutor> AgentRunner<L, T> {
    pub fn new(llm: Arc<L>, tools: Arc<T>, memory: ConversationMemory, config: &BotConfig) -> Self {
        Self {
            llm,
            tools,
            memory,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            max_tool_rounds: config.max_tool_rounds.max(1),
        }
    }

    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    /// Run one turn and return the model's final text.
    ///
    /// The exchange is recorded in memory only when the turn succeeds.
    pub async fn run(
        &self,
        profile: &AgentProfile,
        key: &ConversationKey,
        text: &str,
    ) -> Result<String, AgentError> {
        let system = SystemPromptBuilder::build(profile, &Local::now());
        let tools = self.tools.definitions();

        let mut messages = self.memory.history_messages(key);
        messages.push(Message::user(text));

        for round in 0..self.max_tool_rounds {
            let request = CompletionRequest {
                model: self.model.clone(),
                messages: messages.clone(),
                system: Some(system.clone()),
                max_tokens: self.max_tokens,
                temperature: None,
                tools: tools.clone(),
            };

            let response = self.llm.complete(&request).await?;
            tracing::debug!(
                agent = profile.name,
                round,
                stop_reason = %response.stop_reason,
                input_tokens = response.usage.input_tokens,
                output_tokens = response.usage.output_tokens,
                "completion"
            );

            if response.tool_calls.is_empty() {
                let reply = response.content.trim().to_string();
                if reply.is_empty() {
                    return Err(AgentError::EmptyResponse);
                }
                self.memory.record(key.clone(), text.to_string(), reply.clone());
                return Ok(reply);
            }

            let calls = response.tool_calls;
            messages.push(Message::assistant_tool_calls(response.content, calls.clone()));
            for call in &calls {
                tracing::info!(agent = profile.name, tool = %call.name, "tool call");
                let output = self.tools.execute(call).await;
                messages.push(Message::tool_result(call.id.clone(), output));
            }
        }

        Err(AgentError::ToolRoundsExhausted(self.max_tool_rounds))
    }
}
