//! Reply text for a duplicate URL hit.
//!
//! Every field that may be absent on a hit (summary, scrape time) is
//! replaced by a fixed placeholder before formatting, so truncation only
//! ever sees a concrete string.

use chrono::{DateTime, Utc};

use topicmind_types::registry::DuplicateHit;

pub const NO_SUMMARY_PLACEHOLDER: &str = "No summary available";
pub const UNKNOWN_DATE_PLACEHOLDER: &str = "unknown date";

const ELLIPSIS: &str = "...";

/// Cut `text` to at most `max_chars` characters, ending in `...` when cut.
///
/// Counts `char`s, never splits a code point. Limits too small to fit the
/// ellipsis get a plain prefix.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars <= ELLIPSIS.len() {
        return text.chars().take(max_chars).collect();
    }
    let keep = max_chars - ELLIPSIS.len();
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

fn format_date(at: Option<DateTime<Utc>>) -> String {
    at.map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| UNKNOWN_DATE_PLACEHOLDER.to_string())
}

/// Build the reply for a URL already indexed in this topic.
///
/// `times_shared` must be the post-increment count.
pub fn duplicate_notice(hit: &DuplicateHit, times_shared: i64, summary_max_chars: usize) -> String {
    let summary = hit
        .summary
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(NO_SUMMARY_PLACEHOLDER);
    let summary = truncate_chars(summary, summary_max_chars);

    format!(
        "🔁 This link was already shared in {topic}.\n\
         First indexed: {first}\n\
         Times shared: {times_shared}\n\n\
         📝 Summary (scraped {scraped}):\n{summary}",
        topic = hit.entry.topic,
        first = format_date(Some(hit.entry.first_indexed_at)),
        scraped = format_date(hit.scraped_at),
    )
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use topicmind_types::registry::IndexedUrl;

    fn hit(summary: Option<&str>) -> DuplicateHit {
        DuplicateHit {
            entry: IndexedUrl {
                normalized_url: "https://example.com/a".to_string(),
                topic: "Ideas".to_string(),
                original_url: "http://example.com/a".to_string(),
                first_indexed_at: Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap(),
                first_message_id: 1,
                last_seen_at: None,
                times_shared: 1,
            },
            summary: summary.map(str::to_string),
            scraped_at: None,
        }
    }

    #[test]
    fn notice_includes_topic_date_and_count() {
        let text = duplicate_notice(&hit(Some("A short summary")), 3, 500);
        assert!(text.contains("Ideas"));
        assert!(text.contains("2025-03-14"));
        assert!(text.contains("Times shared: 3"));
        assert!(text.contains("A short summary"));
    }

    #[test]
    fn missing_summary_uses_placeholder() {
        let text = duplicate_notice(&hit(None), 2, 500);
        assert!(text.contains(NO_SUMMARY_PLACEHOLDER));

        let blank = duplicate_notice(&hit(Some("   ")), 2, 500);
        assert!(blank.contains(NO_SUMMARY_PLACEHOLDER));
    }

    #[test]
    fn long_summary_is_truncated() {
        let long = "x".repeat(600);
        let text = duplicate_notice(&hit(Some(&long)), 2, 500);
        assert!(text.contains(&format!("{}...", "x".repeat(497))));
        assert!(!text.contains(&"x".repeat(498)));
    }

    #[test]
    fn truncate_is_char_safe() {
        assert_eq!(truncate_chars("héllo wörld", 8), "héllo...");
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("exact", 5), "exact");
        assert_eq!(truncate_chars("🦀🦀🦀🦀🦀", 4), "🦀...");
    }

    #[test]
    fn tiny_limits_never_exceed_max_chars() {
        assert_eq!(truncate_chars("abcdef", 0), "");
        assert_eq!(truncate_chars("abcdef", 2), "ab");
        assert_eq!(truncate_chars("abcdef", 3), "abc");
        assert_eq!(truncate_chars("abcdef", 4), "a...");
        assert_eq!(truncate_chars("🦀🦀🦀🦀", 1), "🦀");
    }

    #[test]
    fn missing_scrape_time_uses_placeholder() {
        let text = duplicate_notice(&hit(None), 2, 500);
        assert!(text.contains(UNKNOWN_DATE_PLACEHOLDER));
    }
}
