//! Duplicate registry commands (`urls list`, `urls check`).

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use topicmind_core::dedup::DedupCheck;
use topicmind_core::dedup::notice::truncate_chars;
use topicmind_core::repository::indexed_url::IndexedUrlRepository;
use topicmind_types::registry::IndexedUrl;

use crate::state::AppState;

/// Display registry entries as a table.
pub async fn list_urls(
    state: &AppState,
    topic: Option<&str>,
    limit: u32,
    json: bool,
) -> Result<()> {
    let entries = state.dedup.repository().list(topic, limit).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!();
        match topic {
            Some(topic) => println!(
                "  {} No links indexed in '{}' yet.",
                style("i").blue().bold(),
                style(topic).cyan()
            ),
            None => println!("  {} No links indexed yet.", style("i").blue().bold()),
        }
        println!();
        return Ok(());
    }

    println!();
    println!("{}", render_table(&entries));
    println!();
    println!("  {} entries", style(entries.len()).bold());
    println!();
    Ok(())
}

fn render_table(entries: &[IndexedUrl]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Topic").fg(Color::White),
        Cell::new("URL").fg(Color::White),
        Cell::new("Shared").fg(Color::White),
        Cell::new("First Indexed").fg(Color::White),
        Cell::new("Last Seen").fg(Color::White),
    ]);

    for entry in entries {
        let shared = if entry.times_shared > 1 {
            Cell::new(entry.times_shared).fg(Color::Yellow)
        } else {
            Cell::new(entry.times_shared).fg(Color::DarkGrey)
        };
        let last_seen = entry
            .last_seen_at
            .as_ref()
            .map(format_relative_time)
            .unwrap_or_else(|| "never".to_string());

        table.add_row(vec![
            Cell::new(&entry.topic).fg(Color::Cyan),
            Cell::new(truncate_chars(&entry.normalized_url, 60)),
            shared,
            Cell::new(entry.first_indexed_at.format("%Y-%m-%d").to_string()),
            Cell::new(last_seen).fg(Color::DarkGrey),
        ]);
    }
    table
}

/// Report whether `url` is already registered in `topic`. Read-only: the
/// share counter is not touched.
pub async fn check_url(state: &AppState, url: &str, topic: &str, json: bool) -> Result<()> {
    let check = state.dedup.check(url, topic).await?;

    if json {
        let out = match &check {
            DedupCheck::Invalid => serde_json::json!({
                "input": url,
                "topic": topic,
                "status": "invalid",
            }),
            DedupCheck::New { normalized_url } => serde_json::json!({
                "input": url,
                "topic": topic,
                "status": "new",
                "normalized_url": normalized_url,
            }),
            DedupCheck::Seen {
                normalized_url,
                hit,
            } => serde_json::json!({
                "input": url,
                "topic": topic,
                "status": "duplicate",
                "normalized_url": normalized_url,
                "entry": hit.entry,
                "summary": hit.summary,
                "scraped_at": hit.scraped_at,
            }),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    match check {
        DedupCheck::Invalid => {
            println!(
                "  {} '{}' is not a valid link; it is never deduplicated",
                style("✗").red(),
                url.trim()
            );
        }
        DedupCheck::New { normalized_url } => {
            println!(
                "  {} New in '{}'",
                style("✓").green(),
                style(topic).cyan()
            );
            println!("  Key: {}", style(normalized_url).dim());
        }
        DedupCheck::Seen {
            normalized_url,
            hit,
        } => {
            println!(
                "  {} Already shared in '{}'",
                style("🔁").bold(),
                style(topic).cyan()
            );
            println!("  Key:           {}", style(normalized_url).dim());
            println!("  First shared:  {}", hit.entry.original_url);
            println!(
                "  First indexed: {}",
                hit.entry.first_indexed_at.format("%Y-%m-%d %H:%M")
            );
            println!(
                "  Times shared:  {}",
                style(hit.entry.times_shared).bold()
            );
            if let Some(summary) = hit.summary.as_deref() {
                println!();
                println!("  {}", style("── Summary ──").dim());
                for line in truncate_chars(summary, 500).lines() {
                    println!("  {line}");
                }
            }
        }
    }
    println!();
    Ok(())
}

fn format_relative_time(dt: &chrono::DateTime<chrono::Utc>) -> String {
    let now = chrono::Utc::now();
    let diff = now - *dt;

    if diff.num_minutes() < 1 {
        "just now".to_string()
    } else if diff.num_hours() < 1 {
        format!("{}m ago", diff.num_minutes())
    } else if diff.num_days() < 1 {
        format!("{}h ago", diff.num_hours())
    } else if diff.num_days() < 30 {
        format!("{}d ago", diff.num_days())
    } else {
        dt.format("%Y-%m-%d").to_string()
    }
}
