//! Inbound message handling: topic resolution, logging, dedup and routing.

pub mod link;
pub mod pipeline;

pub use link::message_link;
pub use pipeline::{InboundMessage, InboundPipeline, PipelineError, PipelineOutcome, Route};
