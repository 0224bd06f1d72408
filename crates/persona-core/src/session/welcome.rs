//! The seed message every new session starts with.

use crate::document::Document;

/// Welcome text used when no documents have been uploaded.
pub const NO_DOCUMENTS_WELCOME: &str = "Hello! No documents have been uploaded yet, so I have nothing to answer questions from. An administrator needs to upload files first, but feel free to say hello.";

/// Builds the welcome text for a new session.
///
/// With documents present the text enumerates every document name, one per line.
pub fn welcome_text(documents: &[Document]) -> String {
    if documents.is_empty() {
        return NO_DOCUMENTS_WELCOME.to_string();
    }

    let mut text = String::from(
        "Hello! I can answer questions based on the following documents:\n",
    );
    for document in documents {
        text.push_str("\n- ");
        text.push_str(&document.name);
    }
    text.push_str("\n\nWhat would you like to know?");
    text
}
