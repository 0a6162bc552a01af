//! CLI command definitions for the `topicmind` binary.
//!
//! Uses clap derive macros for argument parsing. Besides `run`, every
//! command is a read-only view of the local database.

pub mod normalize;
pub mod topics;
pub mod urls;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Topic-aware Telegram assistant with per-topic link deduplication.
#[derive(Parser)]
#[command(name = "topicmind", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the Telegram bot and the background indexer.
    Run,

    /// Print the canonical registry key of a URL.
    Normalize {
        /// URL to normalize.
        url: String,
    },

    /// Inspect the duplicate URL registry.
    Urls {
        #[command(subcommand)]
        action: UrlsCommand,
    },

    /// Inspect known forum topics.
    Topics {
        #[command(subcommand)]
        action: TopicsCommand,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum UrlsCommand {
    /// List registry entries, most recently indexed first.
    #[command(alias = "ls")]
    List {
        /// Only entries of this topic.
        #[arg(long)]
        topic: Option<String>,

        /// Maximum number of entries.
        #[arg(long, default_value = "20")]
        limit: u32,
    },

    /// Check whether a URL is already registered in a topic.
    Check {
        /// URL as it would be shared.
        url: String,

        /// Topic name to check against.
        #[arg(long)]
        topic: String,
    },
}

#[derive(Subcommand)]
pub enum TopicsCommand {
    /// List named threads.
    #[command(alias = "ls")]
    List {
        /// Only topics of this chat.
        #[arg(long, allow_hyphen_values = true)]
        chat: Option<i64>,
    },
}
