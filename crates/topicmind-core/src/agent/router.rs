//! Topic name -> agent routing.
//!
//! The stored topic name maps onto the closed [`Topic`] set with
//! [`Topic::General`] as the fallback. Failures never surface raw: the
//! user gets a fixed apology instead.

use std::sync::Arc;

use topicmind_types::memory::ConversationKey;
use topicmind_types::topic::Topic;

use super::AgentError;
use super::profile::profile_for;
use super::runner::AgentRunner;
use super::tags::parse_tags;
use crate::llm::provider::LlmProvider;
use crate::tools::ToolExecutor;

pub const EMPTY_REPLY_APOLOGY: &str = "I apologize, I encountered an issue generating a response. \
Please try rephrasing your question or try again.";

pub const ERROR_APOLOGY: &str = "I encountered an error processing your message. Please try again.";

/// A user message addressed to a topic's agent.
#[derive(Debug, Clone)]
pub struct AgentRequest<'a> {
    pub topic_name: &'a str,
    pub user_id: i64,
    pub chat_id: i64,
    pub text: &'a str,
}

/// The agent's answer, ready to send.
#[derive(Debug, Clone)]
pub struct AgentReply {
    pub topic: Topic,
    pub text: String,
    pub tags: Vec<String>,
    /// `false` when `text` is a fallback apology.
    pub succeeded: bool,
}

/// Produces a reply for a routed message.
pub trait Responder: Send + Sync {
    fn respond(
        &self,
        request: &AgentRequest<'_>,
    ) -> impl std::future::Future<Output = AgentReply> + Send;
}

pub struct AgentRouter<L, T> {
    runner: Arc<AgentRunner<L, T>>,
}

impl<L: LlmProvider, T: ToolExecutor> AgentRouter<L, T> {
    pub fn new(runner: Arc<AgentRunner<L, T>>) -> Self {
        Self { runner }
    }
}

impl<L: LlmProvider, T: ToolExecutor> Responder for AgentRouter<L, T> {
    async fn respond(&self, request: &AgentRequest<'_>) -> AgentReply {
        let topic = Topic::from_topic_name(request.topic_name);
        let profile = profile_for(topic);
        let key = ConversationKey::new(topic.display_name(), request.user_id, request.chat_id);
        tracing::info!(topic_name = request.topic_name, agent = profile.name, "routing message");

        match self.runner.run(profile, &key, request.text).await {
            Ok(raw) => {
                let parsed = parse_tags(&raw);
                if parsed.tags.is_empty() {
                    tracing::warn!(agent = profile.name, "no tags in agent reply");
                }
                AgentReply {
                    topic,
                    text: parsed.text,
                    tags: parsed.tags,
                    succeeded: true,
                }
            }
            Err(AgentError::EmptyResponse) => {
                tracing::error!(agent = profile.name, "agent returned an empty reply");
                fallback(topic, EMPTY_REPLY_APOLOGY)
            }
            Err(e) => {
                tracing::error!(agent = profile.name, error = %e, "agent failed");
                fallback(topic, ERROR_APOLOGY)
            }
        }
    }
}

fn fallback(topic: Topic, text: &str) -> AgentReply {
    AgentReply {
        topic,
        text: text.to_string(),
        tags: Vec::new(),
        succeeded: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::ConversationMemory;
    use crate::testing::{EchoTools, ScriptedLlm};
    use topicmind_types::config::BotConfig;

    fn router(llm: ScriptedLlm) -> (AgentRouter<ScriptedLlm, EchoTools>, Arc<ScriptedLlm>) {
        let llm = Arc::new(llm);
        let runner = AgentRunner::new(
            Arc::clone(&llm),
            Arc::new(EchoTools),
            ConversationMemory::new(10),
            &BotConfig::default(),
        );
        (AgentRouter::new(Arc::new(runner)), llm)
    }

    fn request<'a>(topic_name: &'a str, text: &'a str) -> AgentRequest<'a> {
        AgentRequest {
            topic_name,
            user_id: 7,
            chat_id: -100,
            text,
        }
    }

    #[tokio::test]
    async fn known_topic_routes_to_its_agent() {
        let (router, llm) = router(ScriptedLlm::new(vec![ScriptedLlm::text(
            "Solid plan.\n\nTags: career, promotion",
        )]));
        let reply = router.respond(&request("Career", "should I ask?")).await;
        assert_eq!(reply.topic, Topic::Career);
        assert!(reply.succeeded);
        assert_eq!(reply.tags, vec!["career", "promotion"]);
        assert_eq!(reply.text, "Solid plan.\n\n📁 Tags: career, promotion");
        assert!(llm.requests()[0].system.as_deref().unwrap().contains("Career Advisor"));
    }

    #[tokio::test]
    async fn unknown_topic_falls_back_to_general() {
        let (router, llm) = router(ScriptedLlm::new(vec![ScriptedLlm::text("ok")]));
        let reply = router.respond(&request("Topic_99", "hello")).await;
        assert_eq!(reply.topic, Topic::General);
        assert!(llm.requests()[0].system.as_deref().unwrap().contains("General Assistant"));
    }

    #[tokio::test]
    async fn empty_reply_gets_rephrase_apology() {
        let (router, _) = router(ScriptedLlm::new(vec![ScriptedLlm::text("")]));
        let reply = router.respond(&request("Ideas", "hmm")).await;
        assert!(!reply.succeeded);
        assert_eq!(reply.text, EMPTY_REPLY_APOLOGY);
    }

    #[tokio::test]
    async fn failure_gets_error_apology() {
        let (router, _) = router(ScriptedLlm::new(Vec::new()));
        let reply = router.respond(&request("Ideas", "hmm")).await;
        assert!(!reply.succeeded);
        assert_eq!(reply.text, ERROR_APOLOGY);
        assert!(reply.tags.is_empty());
    }
}
