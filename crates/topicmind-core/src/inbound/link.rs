//! Telegram message permalinks.

/// Offset between a supergroup's bot API id (`-100xxxxxxxxxx`) and the id
/// used in `t.me/c/` links.
const SUPERGROUP_ID_OFFSET: i64 = 1_000_000_000_000;

/// Permalink to a message.
///
/// Public chats link through their username; private supergroups use the
/// `t.me/c/<internal id>/<message id>` form.
pub fn message_link(chat_id: i64, chat_username: Option<&str>, message_id: i64) -> String {
    match chat_username.filter(|u| !u.is_empty()) {
        Some(username) => format!("https://t.me/{username}/{message_id}"),
        None => {
            let internal = chat_id.unsigned_abs() as i64 - SUPERGROUP_ID_OFFSET;
            format!("https://t.me/c/{internal}/{message_id}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_chat_uses_username() {
        assert_eq!(
            message_link(-1001234567890, Some("mychannel"), 42),
            "https://t.me/mychannel/42"
        );
    }

    #[test]
    fn private_supergroup_strips_prefix() {
        assert_eq!(
            message_link(-1001234567890, None, 42),
            "https://t.me/c/1234567890/42"
        );
        assert_eq!(
            message_link(-1001234567890, Some(""), 7),
            "https://t.me/c/1234567890/7"
        );
    }
}
