//! Forum topic naming and resolution.

pub mod service;

pub use service::{TopicResolution, TopicService};
