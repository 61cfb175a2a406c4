use std::path::Path;

use tracing::{error, info};

use super::{clean_text, pdf, text, DocumentError, DocumentKind};

pub struct DocumentProcessor;

impl DocumentProcessor {
    /// Extracts and cleans a document whose type is given as a file extension string.
    pub fn process_document(path: &Path, file_type: &str) -> Result<String, DocumentError> {
        info!(path = %path.display(), file_type, "Processing document");

        let kind: DocumentKind = file_type.parse().map_err(|e| {
            error!(file_type, "Unsupported file type");
            e
        })?;

        Self::extract(path, kind)
    }

    /// Blocking: PDF parsing is CPU bound, callers on the runtime should use `spawn_blocking`.
    pub fn extract(path: &Path, kind: DocumentKind) -> Result<String, DocumentError> {
        let raw = match kind {
            DocumentKind::Pdf => pdf::read_pdf(path)?,
            DocumentKind::Text => text::read_text(path)?,
        };

        let cleaned = clean_text(&raw);
        info!(
            original_len = raw.len(),
            cleaned_len = cleaned.len(),
            "Document processed"
        );

        Ok(cleaned)
    }
}
