//! OpenRouter chat completions provider (OpenAI-compatible wire format).

pub mod client;
pub mod types;

pub use client::OpenRouterProvider;
