//! Domain layer for PersonaChat RAG.
//!
//! Everything in this crate is free of I/O: the data model, the share-token
//! codec, the merge rules applied on import, and the chat turn state machine.
//! Persistence and the hosted model client live in the infrastructure and
//! interaction crates and plug in through the traits defined here.

pub mod answer;
pub mod chat;
pub mod config;
pub mod document;
pub mod error;
pub mod id;
pub mod session;
pub mod share;
pub mod stats;
pub mod storage;

// Re-export common error type
pub use error::PersonaError;

/// Current wall-clock time in Unix milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
