//! Per-conversation agent memory.
//!
//! Each `(topic, user, chat)` triple owns an isolated, bounded window of
//! recent exchanges.

pub mod conversation;

pub use conversation::ConversationMemory;
