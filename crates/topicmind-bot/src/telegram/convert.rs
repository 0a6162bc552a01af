//! Conversions between teloxide types and the pipeline's transport-neutral
//! types, plus reply chunking.

use teloxide::types::{Message, ThreadId};

use topicmind_core::inbound::InboundMessage;
use topicmind_types::message::MessageKind;

/// Telegram's per-message text limit, in characters.
pub const MAX_MESSAGE_CHARS: usize = 4096;

/// Forum thread id of a message, if it was posted inside a topic.
pub fn topic_thread(msg: &Message) -> Option<ThreadId> {
    if msg.is_topic_message { msg.thread_id } else { None }
}

pub fn thread_id_value(thread: ThreadId) -> i64 {
    i64::from(thread.0.0)
}

/// Kind and file ids of a message's content. `None` for service messages
/// (joins, pins, ...) that carry neither text nor media.
fn content_of(msg: &Message) -> Option<(MessageKind, Option<String>, Option<String>)> {
    if let Some(sizes) = msg.photo() {
        // Largest rendition last.
        let best = sizes.last();
        return Some((
            MessageKind::Photo,
            best.map(|p| p.file.id.to_string()),
            best.map(|p| p.file.unique_id.to_string()),
        ));
    }
    if let Some(video) = msg.video() {
        return Some((
            MessageKind::Video,
            Some(video.file.id.to_string()),
            Some(video.file.unique_id.to_string()),
        ));
    }
    if let Some(document) = msg.document() {
        return Some((
            MessageKind::Document,
            Some(document.file.id.to_string()),
            Some(document.file.unique_id.to_string()),
        ));
    }
    if let Some(voice) = msg.voice() {
        return Some((
            MessageKind::Voice,
            Some(voice.file.id.to_string()),
            Some(voice.file.unique_id.to_string()),
        ));
    }
    msg.text().map(|_| (MessageKind::Text, None, None))
}

/// Convert a Telegram message for the pipeline. Returns `None` when there is
/// nothing to store.
pub fn to_inbound(msg: &Message) -> Option<InboundMessage> {
    let (kind, file_id, file_unique_id) = content_of(msg)?;
    let text = msg.text().or_else(|| msg.caption()).map(str::to_string);

    Some(InboundMessage {
        chat_id: msg.chat.id.0,
        chat_username: msg.chat.username().map(str::to_string),
        thread_id: topic_thread(msg).map(thread_id_value),
        telegram_message_id: i64::from(msg.id.0),
        user_id: msg.from.as_ref().and_then(|u| i64::try_from(u.id.0).ok()),
        username: msg.from.as_ref().and_then(|u| u.username.clone()),
        kind,
        text,
        file_id,
        file_unique_id,
        received_at: msg.date,
    })
}

/// Split `text` into chunks Telegram accepts, preferring line breaks.
pub fn split_reply(text: &str) -> Vec<String> {
    if text.chars().count() <= MAX_MESSAGE_CHARS {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let limit = rest
            .char_indices()
            .nth(MAX_MESSAGE_CHARS)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        if limit == rest.len() {
            chunks.push(rest.to_string());
            break;
        }

        let cut = match rest[..limit].rfind('\n') {
            Some(pos) if pos > 0 => pos,
            _ => limit,
        };
        chunks.push(rest[..cut].to_string());
        rest = rest[cut..].strip_prefix('\n').unwrap_or(&rest[cut..]);
    }
    chunks
}
