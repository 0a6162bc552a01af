//! Telegram transport: long polling with teloxide.
//!
//! Runs the dispatcher and the background indexer side by side until a
//! shutdown signal arrives, then stops both.

pub mod convert;
pub mod handlers;

use std::future::Future;
use std::time::Duration;

use secrecy::ExposeSecret;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tokio_util::sync::CancellationToken;

use topicmind_infra::config::Secrets;

use crate::state::{AppState, BotRuntime};
use handlers::Command;

/// Start the bot. Returns once `shutdown` resolves and both the dispatcher
/// and the indexer have stopped.
pub async fn run(
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let secrets = Secrets::from_env();
    secrets.warn_missing_optional();
    let bot = Bot::new(secrets.telegram_bot_token()?.expose_secret());
    let runtime = BotRuntime::build(&state, &secrets)?;

    let me = bot.get_me().await?;
    tracing::info!(
        username = me.username.as_deref().unwrap_or("unknown"),
        "connected to Telegram"
    );
    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        tracing::warn!(error = %e, "failed to register bot commands");
    }

    let cancel = CancellationToken::new();
    let worker = tokio::spawn(runtime.worker.run(cancel.clone()));

    let mut dispatcher = Dispatcher::builder(bot, handlers::schema())
        .dependencies(dptree::deps![runtime.pipeline])
        .default_handler(|update| async move {
            tracing::trace!(update_id = ?update.id, "unhandled update");
        })
        .build();

    let shutdown_token = dispatcher.shutdown_token();
    let stopper = tokio::spawn(async move {
        shutdown.await;
        tracing::info!("shutdown requested");
        stop_when_running(|| shutdown_token.shutdown()).await;
    });

    tracing::info!(data_dir = %state.data_dir.display(), "bot started");
    dispatcher.dispatch().await;

    stopper.abort();
    cancel.cancel();
    worker.await?;
    tracing::info!("bot stopped");
    Ok(())
}

const SHUTDOWN_RETRY: Duration = Duration::from_millis(100);

/// Keep asking the dispatcher to stop until it accepts.
///
/// The token rejects a shutdown as idle until `dispatch()` has started.
async fn stop_when_running<F, Fut, E>(mut try_stop: F)
where
    F: FnMut() -> Result<Fut, E>,
    Fut: Future<Output = ()>,
    E: std::fmt::Display,
{
    loop {
        match try_stop() {
            Ok(done) => {
                done.await;
                return;
            }
            Err(e) => {
                tracing::debug!(error = %e, "dispatcher not running yet, retrying shutdown");
                tokio::time::sleep(SHUTDOWN_RETRY).await;
            }
        }
    }
}
