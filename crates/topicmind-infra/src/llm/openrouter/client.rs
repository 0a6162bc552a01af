//! OpenRouterProvider -- concrete [`LlmProvider`] for OpenRouter.
//!
//! Sends non-streaming requests with function tools to
//! `{base_url}/chat/completions`. Any OpenAI-compatible endpoint works by
//! overriding the base URL.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use topicmind_core::llm::provider::LlmProvider;
use topicmind_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, Message, MessageRole, StopReason, ToolCall,
    Usage,
};

use super::types::{
    ChatMessage, ChatRequest, ChatResponse, ChatTool, FunctionSpec, WireFunctionCall, WireToolCall,
};

/// OpenRouter LLM provider.
///
/// Does NOT derive Debug: the client holds the API key.
pub struct OpenRouterProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
}

impl OpenRouterProvider {
    /// Request timeout; tool-using replies can take a while.
    const TIMEOUT: Duration = Duration::from_secs(120);

    pub fn new(api_key: SecretString, base_url: impl Into<String>) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Self::TIMEOUT)
            .build()
            .map_err(|e| LlmError::Provider {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Convert a generic [`CompletionRequest`] into the wire request.
    ///
    /// The system prompt becomes the first message.
    fn to_chat_request(request: &CompletionRequest) -> ChatRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if let Some(system) = &request.system {
            messages.push(ChatMessage {
                role: MessageRole::System.to_string(),
                content: Some(system.clone()),
                tool_calls: Vec::new(),
                tool_call_id: None,
            });
        }
        messages.extend(request.messages.iter().map(to_chat_message));

        ChatRequest {
            model: request.model.clone(),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            tools: request
                .tools
                .iter()
                .map(|t| ChatTool {
                    kind: "function",
                    function: FunctionSpec {
                        name: t.name.clone(),
                        description: t.description.clone(),
                        parameters: t.parameters.clone(),
                    },
                })
                .collect(),
        }
    }

    fn from_chat_response(response: ChatResponse) -> Result<CompletionResponse, LlmError> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::Deserialization("response has no choices".to_string()))?;

        let tool_calls: Vec<ToolCall> = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|c| ToolCall {
                id: c.id,
                name: c.function.name,
                arguments: c.function.arguments,
            })
            .collect();

        let stop_reason = match choice.finish_reason.as_deref() {
            Some("tool_calls") | Some("function_call") => StopReason::ToolUse,
            Some("length") => StopReason::MaxTokens,
            Some("content_filter") => StopReason::ContentFilter,
            _ if !tool_calls.is_empty() => StopReason::ToolUse,
            _ => StopReason::EndTurn,
        };

        let usage = response
            .usage
            .map(|u| Usage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            id: response.id,
            content: choice.message.content.unwrap_or_default(),
            model: response.model,
            stop_reason,
            tool_calls,
            usage,
        })
    }
}

fn to_chat_message(message: &Message) -> ChatMessage {
    let tool_calls: Vec<WireToolCall> = message
        .tool_calls
        .iter()
        .map(|c| WireToolCall {
            id: c.id.clone(),
            kind: "function".to_string(),
            function: WireFunctionCall {
                name: c.name.clone(),
                arguments: c.arguments.clone(),
            },
        })
        .collect();

    let content = if message.content.is_empty() && !tool_calls.is_empty() {
        None
    } else {
        Some(message.content.clone())
    };

    ChatMessage {
        role: message.role.to_string(),
        content,
        tool_calls,
        tool_call_id: message.tool_call_id.clone(),
    }
}

fn retry_after_ms(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(|secs| secs * 1000)
}

impl LlmProvider for OpenRouterProvider {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = Self::to_chat_request(request);

        let response = self
            .client
            .post(self.url("/chat/completions"))
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = retry_after_ms(response.headers());
            let error_body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => LlmError::AuthenticationFailed,
                429 => LlmError::RateLimited {
                    retry_after_ms: retry_after,
                },
                400 => LlmError::InvalidRequest(error_body),
                _ => LlmError::Provider {
                    message: format!("HTTP {status}: {error_body}"),
                },
            });
        }

        let chat: ChatResponse = response.json().await.map_err(|e| {
            LlmError::Deserialization(format!("failed to parse response: {e}"))
        })?;
        Self::from_chat_response(chat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use topicmind_types::llm::ToolDefinition;

    fn make_provider() -> OpenRouterProvider {
        OpenRouterProvider::new(
            SecretString::from("test-key-not-real"),
            "https://openrouter.ai/api/v1/",
        )
        .unwrap()
    }

    fn sample_request() -> CompletionRequest {
        CompletionRequest {
            model: "minimax/minimax-m2.1".to_string(),
            messages: vec![
                Message::user("find rust news"),
                Message::assistant_tool_calls(
                    "",
                    vec![ToolCall {
                        id: "call_1".to_string(),
                        name: "web_search".to_string(),
                        arguments: r#"{"query":"rust"}"#.to_string(),
                    }],
                ),
                Message::tool_result("call_1", "results"),
            ],
            system: Some("Be helpful".to_string()),
            max_tokens: 1024,
            temperature: None,
            tools: vec![ToolDefinition {
                name: "web_search".to_string(),
                description: "search".to_string(),
                parameters: serde_json::json!({"type": "object"}),
            }],
        }
    }

    #[test]
    fn test_provider_name_and_url() {
        let provider = make_provider();
        assert_eq!(provider.name(), "openrouter");
        assert_eq!(
            provider.url("/chat/completions"),
            "https://openrouter.ai/api/v1/chat/completions"
        );
    }

    #[test]
    fn test_request_wire_format() {
        let chat = OpenRouterProvider::to_chat_request(&sample_request());
        let json = serde_json::to_value(&chat).unwrap();

        let messages = json["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[0]["content"], "Be helpful");
        assert_eq!(messages[1]["role"], "user");
        assert!(messages[1].get("tool_calls").is_none());

        assert_eq!(messages[2]["role"], "assistant");
        assert!(messages[2]["content"].is_null());
        assert_eq!(messages[2]["tool_calls"][0]["type"], "function");
        assert_eq!(messages[2]["tool_calls"][0]["function"]["name"], "web_search");

        assert_eq!(messages[3]["role"], "tool");
        assert_eq!(messages[3]["tool_call_id"], "call_1");

        assert_eq!(json["tools"][0]["type"], "function");
        assert_eq!(json["tools"][0]["function"]["name"], "web_search");
        assert!(json.get("temperature").is_none());
    }

    #[test]
    fn test_parse_text_response() {
        let raw = r#"{
            "id": "gen-1",
            "model": "minimax/minimax-m2.1",
            "choices": [{"message": {"role": "assistant", "content": "Hello"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 3}
        }"#;
        let response =
            OpenRouterProvider::from_chat_response(serde_json::from_str(raw).unwrap()).unwrap();
        assert_eq!(response.content, "Hello");
        assert_eq!(response.stop_reason, StopReason::EndTurn);
        assert!(response.tool_calls.is_empty());
        assert_eq!(response.usage.input_tokens, 12);
    }

    #[test]
    fn test_parse_tool_call_response() {
        let raw = r#"{
            "id": "gen-2",
            "model": "m",
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{"id": "call_9", "type": "function",
                        "function": {"name": "web_scrape", "arguments": "{\"url\":\"https://a.com\"}"}}]
                },
                "finish_reason": "tool_calls"
            }]
        }"#;
        let response =
            OpenRouterProvider::from_chat_response(serde_json::from_str(raw).unwrap()).unwrap();
        assert_eq!(response.stop_reason, StopReason::ToolUse);
        assert_eq!(response.content, "");
        assert_eq!(response.tool_calls[0].id, "call_9");
        assert_eq!(response.tool_calls[0].name, "web_scrape");
        assert_eq!(response.tool_calls[0].arguments, r#"{"url":"https://a.com"}"#);
        assert_eq!(response.usage.output_tokens, 0);
    }

    #[test]
    fn test_empty_choices_is_an_error() {
        let raw = r#"{"id": "gen-3", "model": "m", "choices": []}"#;
        let err =
            OpenRouterProvider::from_chat_response(serde_json::from_str(raw).unwrap()).unwrap_err();
        assert!(matches!(err, LlmError::Deserialization(_)));
    }
}
