//! Observability setup for topicmind: structured logging and optional
//! OpenTelemetry span export.

pub mod tracing_setup;
