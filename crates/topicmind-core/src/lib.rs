//! Business logic and repository trait definitions for topicmind.
//!
//! This crate defines the "ports" (repository traits, LLM provider, web tool
//! backends) that the infrastructure layer implements. It depends only on
//! `topicmind-types` -- never on `topicmind-infra` or any database/IO crate.

pub mod agent;
pub mod dedup;
pub mod indexing;
pub mod inbound;
pub mod llm;
pub mod memory;
pub mod repository;
pub mod tools;
pub mod topic;
pub mod url;

#[cfg(test)]
pub(crate) mod testing;
