//! Plain-text extraction for uploaded files.
//!
//! The file name decides the extractor. Text formats are decoded as UTF-8
//! (lossily), PDFs go through `lopdf` and DOCX files are read straight from
//! their `word/document.xml` part.

mod docx;
mod pdf;

use persona_core::document::{DocumentKind, SUPPORTED_EXTENSIONS};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error(
        "Unsupported file type: {0}. Only .txt, .md, .csv, .pdf, and .docx are supported."
    )]
    UnsupportedType(String),

    #[error("Failed to read {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read PDF: {0}")]
    Pdf(String),

    #[error("Failed to read DOCX: {0}")]
    Docx(String),
}

/// Extracts the text content of a file named `name` with raw contents `bytes`.
pub fn extract_text(name: &str, bytes: &[u8]) -> Result<String, ExtractionError> {
    let kind = DocumentKind::from_file_name(name)
        .ok_or_else(|| ExtractionError::UnsupportedType(name.to_string()))?;

    match kind {
        DocumentKind::Pdf => pdf::extract(bytes),
        DocumentKind::Docx => docx::extract(bytes),
        kind if kind.is_plain_text() => Ok(String::from_utf8_lossy(bytes).into_owned()),
        kind => Err(ExtractionError::UnsupportedType(format!("{name} ({kind})"))),
    }
}

/// Reads `path` from disk and extracts its text, using the file name for dispatch.
pub fn extract_file(path: &std::path::Path) -> Result<(String, String), ExtractionError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    if DocumentKind::from_file_name(&name).is_none() {
        return Err(ExtractionError::UnsupportedType(name));
    }

    let bytes = std::fs::read(path).map_err(|source| ExtractionError::Io {
        name: name.clone(),
        source,
    })?;
    let content = extract_text(&name, &bytes)?;
    Ok((name, content))
}

/// Human-readable list of accepted extensions, e.g. for CLI help.
pub fn supported_extensions_hint() -> String {
    SUPPORTED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(", ")
}
