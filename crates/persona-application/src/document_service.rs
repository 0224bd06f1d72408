//! Uploading, viewing and removing knowledge-base documents.

use crate::app_state::AppState;
use persona_core::document::Document;
use persona_core::error::{PersonaError, Result};
use persona_infrastructure::extract::{self, ExtractionError};
use std::path::Path;
use std::sync::Arc;

/// A file that was not added, with the reason shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFailure {
    pub file_name: String,
    pub message: String,
}

/// Result of one upload batch.
#[derive(Debug, Default)]
pub struct UploadOutcome {
    pub added: Vec<Document>,
    pub failures: Vec<UploadFailure>,
}

pub struct DocumentService {
    state: Arc<AppState>,
}

impl DocumentService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub fn list(&self) -> Vec<Document> {
        self.state.documents()
    }

    pub fn find(&self, document_id: &str) -> Option<Document> {
        self.state
            .documents()
            .into_iter()
            .find(|d| d.id == document_id)
    }

    /// Reads and extracts each file, then appends every success in one update.
    ///
    /// A failing file never stops the batch.
    pub fn upload_files<P: AsRef<Path>>(&self, paths: &[P]) -> UploadOutcome {
        let extracted = paths
            .iter()
            .map(|path| {
                let path = path.as_ref();
                match extract::extract_file(path) {
                    Ok((name, content)) => (name, Ok(content)),
                    Err(e) => (display_name(path), Err(e)),
                }
            })
            .collect();
        self.ingest(extracted)
    }

    /// Same as [`upload_files`](Self::upload_files) for in-memory files.
    pub fn upload_bytes<'a, I>(&self, files: I) -> UploadOutcome
    where
        I: IntoIterator<Item = (&'a str, &'a [u8])>,
    {
        let extracted = files
            .into_iter()
            .map(|(name, bytes)| (name.to_string(), extract::extract_text(name, bytes)))
            .collect();
        self.ingest(extracted)
    }

    /// Removes a document by id. Sessions that mention it are left as they are.
    pub fn remove(&self, document_id: &str) -> Result<Document> {
        let removed = self.state.documents.try_update(|documents| -> Result<_> {
            let index = documents
                .iter()
                .position(|d| d.id == document_id)
                .ok_or_else(|| PersonaError::not_found("Document", document_id))?;
            let mut next = documents.clone();
            let removed = next.remove(index);
            Ok((next, removed))
        })?;
        tracing::info!(id = %removed.id, name = %removed.name, "Document removed");
        Ok(removed)
    }

    fn ingest(&self, extracted: Vec<(String, std::result::Result<String, ExtractionError>)>) -> UploadOutcome {
        let mut outcome = UploadOutcome::default();
        for (name, result) in extracted {
            match result {
                Ok(content) => {
                    let id = self.state.ids.document_id(&name);
                    outcome.added.push(Document::new(id, name, content));
                }
                Err(e) => {
                    tracing::warn!(file = %name, error = %e, "Skipping file");
                    outcome.failures.push(UploadFailure {
                        file_name: name,
                        message: e.to_string(),
                    });
                }
            }
        }

        if !outcome.added.is_empty() {
            let added = outcome.added.clone();
            self.state.documents.update(|documents| {
                let mut next = documents.clone();
                next.extend(added);
                next
            });
            tracing::info!(count = outcome.added.len(), "Documents uploaded");
        }
        outcome
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use persona_core::id::SequentialIdGenerator;
    use persona_infrastructure::MemoryStorageArea;

    fn service() -> DocumentService {
        let state = AppState::open_with_ids(
            Arc::new(MemoryStorageArea::new()),
            Arc::new(SequentialIdGenerator::new()),
        );
        DocumentService::new(Arc::new(state))
    }

    #[test]
    fn test_batch_continues_past_unsupported_files() {
        let service = service();
        let outcome = service.upload_bytes([
            ("a.txt", b"alpha".as_slice()),
            ("b.png", b"\x89PNG".as_slice()),
            ("c.md", b"# gamma".as_slice()),
        ]);

        assert_eq!(outcome.added.len(), 2);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].file_name, "b.png");
        assert!(outcome.failures[0].message.starts_with("Unsupported file type: b.png."));

        let names: Vec<_> = service.list().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["a.txt", "c.md"]);
    }

    #[test]
    fn test_ids_keep_the_file_name() {
        let service = service();
        let outcome = service.upload_bytes([("notes.txt", b"x".as_slice())]);
        assert_eq!(outcome.added[0].id, "notes.txt-1");
        assert_eq!(service.find("notes.txt-1").unwrap().content, "x");
    }

    #[test]
    fn test_all_failures_leave_store_untouched() {
        let service = service();
        let outcome = service.upload_bytes([("broken.pdf", b"nope".as_slice())]);
        assert!(outcome.added.is_empty());
        assert!(service.list().is_empty());
    }

    #[test]
    fn test_remove() {
        let service = service();
        service.upload_bytes([("a.txt", b"a".as_slice()), ("b.txt", b"b".as_slice())]);

        let removed = service.remove("a.txt-1").unwrap();
        assert_eq!(removed.name, "a.txt");
        assert_eq!(service.list().len(), 1);
        assert!(service.remove("a.txt-1").unwrap_err().is_not_found());
    }
}
