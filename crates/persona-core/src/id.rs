//! Identifier generation for documents, sessions and messages.

use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Produces identifiers that are unique within a collection.
///
/// Ids keep a readable prefix (`chat-`, `msg-`, or the document name) so that
/// persisted JSON and share links stay easy to inspect.
pub trait IdGenerator: Send + Sync {
    /// Returns a fresh unique suffix.
    fn next_suffix(&self) -> String;

    fn session_id(&self) -> String {
        format!("chat-{}", self.next_suffix())
    }

    fn message_id(&self) -> String {
        format!("msg-{}", self.next_suffix())
    }

    fn document_id(&self, file_name: &str) -> String {
        format!("{}-{}", file_name, self.next_suffix())
    }
}

/// Random v4 UUID suffixes. Used everywhere outside of tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_suffix(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Monotonic counter suffixes, for deterministic ids.
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    next: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_suffix(&self) -> String {
        (self.next.fetch_add(1, Ordering::Relaxed) + 1).to_string()
    }
}
