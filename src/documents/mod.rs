//! Document text extraction
//!
//! Turns an uploaded claim document into cleaned plain text:
//! - `pdf` files are read page by page with lopdf
//! - `txt` files are read as UTF-8, falling back to Latin-1
//!
//! Both paths go through the same cleaning pass before the text reaches the analyzer.

pub mod cleaner;
pub mod error;
pub mod pdf;
pub mod processor;
pub mod text;

pub use cleaner::clean_text;
pub use error::DocumentError;
pub use processor::DocumentProcessor;

use std::fmt;
use std::str::FromStr;

/// Supported upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Pdf,
    Text,
}

impl DocumentKind {
    /// Everything after the last `.` of the filename, or the whole name when there is no dot.
    pub fn from_filename(filename: &str) -> Result<Self, DocumentError> {
        let extension = filename.rsplit('.').next().unwrap_or(filename);
        extension.parse()
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Text => "txt",
        }
    }
}

impl FromStr for DocumentKind {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pdf" => Ok(DocumentKind::Pdf),
            "txt" => Ok(DocumentKind::Text),
            _ => Err(DocumentError::UnsupportedType(s.to_string())),
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
