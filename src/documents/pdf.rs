use std::path::Path;

use lopdf::Document;
use tracing::{error, info};

use super::DocumentError;

/// Concatenates the text of every page in page order. A failure on any page
/// aborts the whole extraction.
pub fn read_pdf(path: &Path) -> Result<String, DocumentError> {
    if !path.exists() {
        error!(path = %path.display(), "PDF file not found");
        return Err(DocumentError::NotFound(path.to_path_buf()));
    }

    let doc = Document::load(path).map_err(|e| {
        error!(path = %path.display(), error = %e, "Error reading PDF file");
        DocumentError::Extraction(format!("Error reading PDF file: {}", e))
    })?;

    let mut text = String::new();
    // get_pages is a BTreeMap keyed by page number, so iteration is in page order
    for (page_num, _page_id) in doc.get_pages() {
        let page_text = doc.extract_text(&[page_num]).map_err(|e| {
            error!(path = %path.display(), page = page_num, error = %e, "Error reading PDF page");
            DocumentError::Extraction(format!("Error reading PDF page {}: {}", page_num, e))
        })?;
        text.push_str(&page_text);
    }

    info!(path = %path.display(), "Successfully extracted text from PDF");
    Ok(text)
}
