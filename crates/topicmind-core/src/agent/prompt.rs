//! System prompt builder for topic agents.
//!
//! Layout:
//! ```text
//! <context>Today is ... Current time: ...</context>
//! <tools>tool usage guidelines</tools>
//! <instructions>{profile instructions}\n\n{tags rule}</instructions>
//! ```

use chrono::{DateTime, TimeZone};

use super::profile::{AgentProfile, tags_rule};

const TOOL_GUIDELINES: &str = "- web_search: use for ANY question that needs current information. \
Always search in English.
- web_scrape: use whenever the user provides a URL.
If uncertain, search rather than guess. Reply in plain text suitable for Telegram.";

/// "Today is Friday, March 14, 2025. Current time: 09:30 AM."
pub fn datetime_context<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "Today is {}. Current time: {}.",
        now.format("%A, %B %d, %Y"),
        now.format("%I:%M %p")
    )
}

pub struct SystemPromptBuilder;

impl SystemPromptBuilder {
    /// Build the system prompt for `profile` as of `now`.
    pub fn build<Tz: TimeZone>(profile: &AgentProfile, now: &DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        format!(
            "<context>\nYou are {name}: {description}.\n{when}\n</context>\n\n\
             <tools>\n{TOOL_GUIDELINES}\n</tools>\n\n\
             <instructions>\n{instructions}\n\n{rule}\n</instructions>",
            name = profile.name,
            description = profile.description,
            when = datetime_context(now),
            instructions = profile.instructions,
            rule = tags_rule(),
        )
    }
}
