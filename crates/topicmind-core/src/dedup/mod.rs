//! Duplicate URL detection per topic.
//!
//! - [`service::DedupService`]: lookup / register / increment over a
//!   registry repository
//! - [`notice`]: user-facing text for a duplicate hit

pub mod notice;
pub mod service;

pub use service::{DedupCheck, DedupService};
