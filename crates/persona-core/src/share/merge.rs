//! Merging an imported share payload into the local collections.

use crate::document::Document;
use crate::session::Session;
use std::collections::HashSet;

/// The collections after an import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeResult {
    pub documents: Vec<Document>,
    pub sessions: Vec<Session>,
}

/// Merges an incoming documents/session pair into local collections.
///
/// Pure: inputs are left untouched and new collections are returned.
pub fn merge(
    local_documents: &[Document],
    local_sessions: &[Session],
    incoming_documents: &[Document],
    incoming_session: &Session,
) -> MergeResult {
    MergeResult {
        documents: merge_documents(local_documents, incoming_documents),
        sessions: merge_session(local_sessions, incoming_session),
    }
}

/// Local documents first, then incoming documents whose id is not known yet.
///
/// Deduplication is by id only; two documents with identical content and
/// different ids are both kept.
pub fn merge_documents(local: &[Document], incoming: &[Document]) -> Vec<Document> {
    let mut seen: HashSet<&str> = local.iter().map(|d| d.id.as_str()).collect();
    let mut merged = local.to_vec();
    for document in incoming {
        if seen.insert(document.id.as_str()) {
            merged.push(document.clone());
        }
    }
    merged
}

/// Replaces the local session with the same id wholesale, or appends.
pub fn merge_session(local: &[Session], incoming: &Session) -> Vec<Session> {
    let mut merged = local.to_vec();
    match merged.iter_mut().find(|s| s.id == incoming.id) {
        Some(existing) => *existing = incoming.clone(),
        None => merged.push(incoming.clone()),
    }
    merged
}
