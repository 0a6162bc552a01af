//! `topicmind normalize <url>`.

use anyhow::Result;
use console::style;

use topicmind_core::url::normalize;

/// Print the registry key for `url`. An invalid URL is reported, not an error.
pub fn normalize_url(url: &str, json: bool) -> Result<()> {
    let key = normalize(url);
    let valid = !key.is_empty();

    if json {
        let out = serde_json::json!({
            "input": url,
            "normalized_url": if valid { Some(key.as_str()) } else { None },
            "valid": valid,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if valid {
        println!("{key}");
    } else {
        println!(
            "  {} '{}' has no network location and cannot be deduplicated",
            style("✗").red(),
            url.trim()
        );
    }
    Ok(())
}
