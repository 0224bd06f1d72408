//! Uploaded document model.

use serde::{Deserialize, Serialize};

/// An uploaded file's extracted plain text plus its metadata.
///
/// Documents are never mutated after upload; they are appended to the
/// collection or removed from it by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier within the document collection
    pub id: String,
    /// Original filename
    pub name: String,
    /// Fully extracted plain text
    pub content: String,
}

impl Document {
    pub fn new(id: impl Into<String>, name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            content: content.into(),
        }
    }
}
