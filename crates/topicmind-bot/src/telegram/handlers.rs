//! Update handlers: slash commands, forum topic events and the catch-all
//! message handler that feeds the inbound pipeline.

use std::sync::Arc;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::ChatAction;
use teloxide::utils::command::BotCommands;

use super::convert::{split_reply, thread_id_value, to_inbound, topic_thread};
use crate::state::ConcretePipeline;

pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;
pub type HandlerResult = Result<(), HandlerError>;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "snake_case", description = "Topic commands:")]
pub enum Command {
    #[command(description = "set the name of this forum topic, e.g. /name_topic AI Engineering")]
    NameTopic(String),
    #[command(description = "list threads that still need a name")]
    CheckTopics,
}

/// The dispatcher's handler tree.
pub fn schema() -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
        .branch(
            dptree::filter(|msg: Message| {
                msg.forum_topic_created().is_some() || msg.forum_topic_edited().is_some()
            })
            .endpoint(handle_topic_event),
        )
        .branch(dptree::endpoint(handle_message))
}

async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    pipeline: Arc<ConcretePipeline>,
) -> HandlerResult {
    let chat_id = msg.chat.id.0;
    let thread_id = topic_thread(&msg).map(thread_id_value);
    let topics = pipeline.topics();

    let result = match cmd {
        Command::NameTopic(args) => {
            tracing::info!(chat_id, ?thread_id, "name_topic command");
            topics.name_topic(chat_id, thread_id, &args).await
        }
        Command::CheckTopics => topics.check_topics(chat_id).await,
    };

    let reply = match result {
        Ok(reply) => reply,
        Err(e) => {
            tracing::error!(chat_id, error = %e, "command failed");
            format!("Error: {e}")
        }
    };
    send_replies(&bot, &msg, &[reply]).await;
    Ok(())
}

async fn handle_topic_event(
    bot: Bot,
    msg: Message,
    pipeline: Arc<ConcretePipeline>,
) -> HandlerResult {
    let chat_id = msg.chat.id.0;
    let Some(thread_id) = msg.thread_id.map(thread_id_value) else {
        tracing::warn!(chat_id, "forum topic event without a thread id");
        return Ok(());
    };
    let topics = pipeline.topics();

    let reply = if let Some(created) = msg.forum_topic_created() {
        tracing::info!(chat_id, thread_id, name = %created.name, "topic created");
        Some(topics.on_topic_created(chat_id, thread_id, &created.name).await?)
    } else if let Some(edited) = msg.forum_topic_edited() {
        tracing::info!(chat_id, thread_id, name = ?edited.name, "topic edited");
        topics
            .on_topic_edited(chat_id, thread_id, edited.name.as_deref())
            .await?
    } else {
        None
    };

    if let Some(reply) = reply {
        send_replies(&bot, &msg, &[reply]).await;
    }
    Ok(())
}

async fn handle_message(
    bot: Bot,
    msg: Message,
    pipeline: Arc<ConcretePipeline>,
) -> HandlerResult {
    let Some(inbound) = to_inbound(&msg) else {
        tracing::trace!(message_id = msg.id.0, "ignoring service message");
        return Ok(());
    };

    tracing::info!(
        chat_id = inbound.chat_id,
        thread_id = ?inbound.thread_id,
        user = ?inbound.username,
        kind = %inbound.kind,
        "received message"
    );

    if inbound.text.is_some() {
        let mut typing = bot.send_chat_action(msg.chat.id, ChatAction::Typing);
        if let Some(tid) = topic_thread(&msg) {
            typing = typing.message_thread_id(tid);
        }
        let _ = typing.await;
    }

    match pipeline.handle(inbound).await {
        Ok(outcome) => {
            tracing::info!(
                message_id = msg.id.0,
                topic = %outcome.topic_name,
                route = ?outcome.route,
                "message processed"
            );
            send_replies(&bot, &msg, &outcome.replies).await;
        }
        Err(e) => {
            tracing::error!(message_id = msg.id.0, error = %e, "failed to process message");
        }
    }
    Ok(())
}

/// Send each reply into the thread `msg` came from. Send failures are logged;
/// later replies are still attempted.
async fn send_replies(bot: &Bot, msg: &Message, replies: &[String]) {
    let thread = topic_thread(msg);
    for reply in replies {
        for chunk in split_reply(reply) {
            let mut request = bot.send_message(msg.chat.id, chunk);
            if let Some(tid) = thread {
                request = request.message_thread_id(tid);
            }
            if let Err(e) = request.await {
                tracing::warn!(chat_id = msg.chat.id.0, error = %e, "failed to send reply");
            }
        }
    }
}
