//! Shared domain types for topicmind.
//!
//! This crate contains the domain types used across the workspace: topics,
//! messages, the duplicate URL registry, LLM request shapes, conversation
//! memory keys, configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod config;
pub mod error;
pub mod llm;
pub mod memory;
pub mod message;
pub mod registry;
pub mod topic;
