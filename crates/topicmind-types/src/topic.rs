//! Forum topic types.
//!
//! A topic is a user-facing conversation scope (a Telegram forum thread). It
//! isolates both agent memory and duplicate URL tracking. Topics are stored
//! by free-form name; agent routing maps that name onto the closed [`Topic`]
//! set, falling back to [`Topic::General`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Name used for messages outside any forum thread.
pub const GENERAL_TOPIC_NAME: &str = "General";

/// Prefix of the fallback name given to threads nobody has named yet.
pub const PLACEHOLDER_TOPIC_PREFIX: &str = "Topic_";

/// The closed set of topics that have a dedicated agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Journal,
    Health,
    Wealth,
    Rants,
    Ideas,
    AiEngineering,
    Career,
    General,
}

impl Topic {
    /// All routable topics, fallback last.
    pub const ALL: [Topic; 8] = [
        Topic::Journal,
        Topic::Health,
        Topic::Wealth,
        Topic::Rants,
        Topic::Ideas,
        Topic::AiEngineering,
        Topic::Career,
        Topic::General,
    ];

    /// Map a stored topic name onto an agent topic.
    ///
    /// Matching is exact after trimming surrounding whitespace. Unknown
    /// names (including placeholders) route to `General`.
    pub fn from_topic_name(name: &str) -> Self {
        name.trim().parse().unwrap_or(Topic::General)
    }

    /// The forum topic name this variant answers to.
    pub fn display_name(&self) -> &'static str {
        match self {
            Topic::Journal => "Journal",
            Topic::Health => "Health",
            Topic::Wealth => "Wealth",
            Topic::Rants => "Rants",
            Topic::Ideas => "Ideas",
            Topic::AiEngineering => "AI Engineering",
            Topic::Career => "Career",
            Topic::General => GENERAL_TOPIC_NAME,
        }
    }

    /// Lower snake_case identifier, used in session keys and logs.
    pub fn slug(&self) -> &'static str {
        match self {
            Topic::Journal => "journal",
            Topic::Health => "health",
            Topic::Wealth => "wealth",
            Topic::Rants => "rants",
            Topic::Ideas => "ideas",
            Topic::AiEngineering => "ai_engineering",
            Topic::Career => "career",
            Topic::General => "general",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Topic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Topic::ALL
            .into_iter()
            .find(|t| t.display_name() == s)
            .ok_or_else(|| format!("no agent for topic '{s}'"))
    }
}

/// A named forum thread in a chat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicRecord {
    pub chat_id: i64,
    pub thread_id: i64,
    pub topic_name: String,
    pub updated_at: DateTime<Utc>,
}

/// Whether a topic name is a generated placeholder rather than a real name.
pub fn is_placeholder_name(name: &str) -> bool {
    name.starts_with(PLACEHOLDER_TOPIC_PREFIX)
}

/// The fallback name for an unnamed thread.
pub fn placeholder_name(thread_id: i64) -> String {
    format!("{PLACEHOLDER_TOPIC_PREFIX}{thread_id}")
}
