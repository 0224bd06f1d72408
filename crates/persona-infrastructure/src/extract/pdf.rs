use super::ExtractionError;

/// Concatenates the text of every page in page order, one page per line.
pub(super) fn extract(bytes: &[u8]) -> Result<String, ExtractionError> {
    let document =
        lopdf::Document::load_mem(bytes).map_err(|e| ExtractionError::Pdf(e.to_string()))?;

    let mut content = String::new();
    for page_number in document.get_pages().keys() {
        match document.extract_text(&[*page_number]) {
            Ok(text) => {
                content.push_str(text.trim_end());
                content.push('\n');
            }
            Err(e) => {
                tracing::warn!(page = page_number, error = %e, "Skipping unreadable PDF page");
            }
        }
    }
    Ok(content)
}
