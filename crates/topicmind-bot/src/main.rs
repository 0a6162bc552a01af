//! topicmind entry point.
//!
//! Binary name: `topicmind`
//!
//! Parses CLI arguments, sets up tracing, initializes database and services,
//! then dispatches to the command handler or starts the Telegram bot.

mod cli;
mod state;
mod telegram;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands, TopicsCommand, UrlsCommand};
use state::AppState;
use topicmind_observe::tracing_setup::{
    LogFormat, TracingOptions, filter_for_verbosity, init_tracing, otel_requested,
    shutdown_tracing,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The bot logs JSON lines; interactive commands stay readable.
    let format = match cli.command {
        Commands::Run => LogFormat::Json,
        _ => LogFormat::Pretty,
    };
    init_tracing(&TracingOptions {
        filter: filter_for_verbosity(cli.verbose, cli.quiet).to_string(),
        format,
        enable_otel: otel_requested(),
    })
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = dispatch(cli).await;
    shutdown_tracing();
    result
}

async fn dispatch(cli: Cli) -> anyhow::Result<()> {
    // These don't need app state
    match &cli.command {
        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            generate(*shell, &mut cmd, "topicmind", &mut std::io::stdout());
            return Ok(());
        }
        Commands::Normalize { url } => return cli::normalize::normalize_url(url, cli.json),
        _ => {}
    }

    let state = AppState::init().await?;

    match cli.command {
        Commands::Run => {
            telegram::run(state, shutdown_signal()).await?;
        }

        Commands::Urls { action } => match action {
            UrlsCommand::List { topic, limit } => {
                cli::urls::list_urls(&state, topic.as_deref(), limit, cli.json).await?;
            }
            UrlsCommand::Check { url, topic } => {
                cli::urls::check_url(&state, &url, &topic, cli.json).await?;
            }
        },

        Commands::Topics { action } => match action {
            TopicsCommand::List { chat } => {
                cli::topics::list_topics(&state, chat, cli.json).await?;
            }
        },

        Commands::Completions { .. } | Commands::Normalize { .. } => {
            unreachable!("handled above")
        }
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
