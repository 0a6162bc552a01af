//! Repository trait definitions (ports).
//!
//! These traits define the storage interface that the infrastructure layer
//! (topicmind-infra) implements. The core crate never depends on any
//! specific storage technology.

pub mod indexed_url;
pub mod message;
pub mod scrape_cache;
pub mod topic;
