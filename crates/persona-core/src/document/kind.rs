//! File kinds accepted by the upload surface.

use std::path::Path;
use strum::{Display, EnumString};

/// Extensions accepted for upload, lowercase.
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["txt", "md", "csv", "pdf", "docx"];

/// The kind of an uploaded file, decided by its extension alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DocumentKind {
    Txt,
    Md,
    Csv,
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Classifies a file name. Returns `None` for anything outside the allow-list,
    /// including names without an extension.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let extension = Path::new(name).extension()?.to_str()?;
        extension.parse().ok()
    }

    /// Whether the file is read as plain text without a format-specific extractor.
    pub fn is_plain_text(self) -> bool {
        matches!(self, Self::Txt | Self::Md | Self::Csv)
    }
}
