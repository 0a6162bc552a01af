//! `topicmind topics list`.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use topicmind_core::repository::topic::TopicRepository;
use topicmind_types::topic::{Topic, is_placeholder_name};

use crate::state::AppState;

/// List stored topic names, optionally for one chat.
pub async fn list_topics(state: &AppState, chat: Option<i64>, json: bool) -> Result<()> {
    let records = match chat {
        Some(chat_id) => state.topics.list_for_chat(chat_id).await?,
        None => state.topics.list_all().await?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!();
        println!(
            "  {} No topics yet. Create a forum topic or use {} in a thread.",
            style("i").blue().bold(),
            style("/name_topic").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Chat").fg(Color::White),
        Cell::new("Thread").fg(Color::White),
        Cell::new("Name").fg(Color::White),
        Cell::new("Agent").fg(Color::White),
        Cell::new("Updated").fg(Color::White),
    ]);

    for record in &records {
        let name = if is_placeholder_name(&record.topic_name) {
            Cell::new(format!("{} (unnamed)", record.topic_name)).fg(Color::Yellow)
        } else {
            Cell::new(&record.topic_name).fg(Color::Cyan)
        };
        table.add_row(vec![
            Cell::new(record.chat_id),
            Cell::new(record.thread_id),
            name,
            Cell::new(Topic::from_topic_name(&record.topic_name).slug()).fg(Color::DarkGrey),
            Cell::new(record.updated_at.format("%Y-%m-%d %H:%M").to_string()),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    Ok(())
}
