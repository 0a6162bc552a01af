//! Extraction of candidate URLs from message text.

use std::sync::LazyLock;

use regex::Regex;

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s]+").expect("valid regex"));

/// Return the first `http(s)://` URL in `text`, if any.
///
/// The match runs up to the next whitespace; no further cleanup is applied.
pub fn extract_first_url(text: &str) -> Option<&str> {
    URL_PATTERN.find(text).map(|m| m.as_str())
}
