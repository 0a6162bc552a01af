//! Trailing `Tags:` line handling for agent replies.

use std::sync::LazyLock;

use regex::Regex;

static TAGS_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)\n+[ \t]*Tags:[ \t]*(.+?)[ \t]*$").expect("valid regex"));

/// An agent reply with its tags pulled out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedReply {
    /// Reply text as shown to the user.
    pub text: String,
    pub tags: Vec<String>,
}

/// Parse the `Tags: a, b, c` line of a reply.
///
/// When found, every tags line is removed from the body and the tags are
/// re-appended as `📁 Tags: a, b, c`. Without one, the text is returned
/// unchanged with no tags.
pub fn parse_tags(reply: &str) -> TaggedReply {
    let Some(caps) = TAGS_LINE.captures(reply) else {
        return TaggedReply {
            text: reply.to_string(),
            tags: Vec::new(),
        };
    };

    let tags: Vec<String> = caps[1]
        .split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    let body = TAGS_LINE.replace_all(reply, "");
    let body = body.trim();

    let text = if tags.is_empty() {
        body.to_string()
    } else {
        format!("{body}\n\n📁 Tags: {}", tags.join(", "))
    };
    TaggedReply { text, tags }
}
