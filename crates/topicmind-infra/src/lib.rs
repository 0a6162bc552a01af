//! Infrastructure layer for topicmind.
//!
//! Contains implementations of the ports defined in `topicmind-core`:
//! SQLite storage, the OpenRouter chat client, web search/scrape backends,
//! and the configuration loader.

pub mod config;
pub mod llm;
pub mod sqlite;
pub mod web;
