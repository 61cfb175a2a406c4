use std::path::Path;

use tracing::{error, info, warn};

use super::DocumentError;

/// Reads a text file as UTF-8, falling back to Latin-1 when the bytes are not valid UTF-8.
pub fn read_text(path: &Path) -> Result<String, DocumentError> {
    if !path.exists() {
        error!(path = %path.display(), "TXT file not found");
        return Err(DocumentError::NotFound(path.to_path_buf()));
    }

    let bytes = std::fs::read(path).map_err(|e| {
        error!(path = %path.display(), error = %e, "Error reading TXT file");
        DocumentError::Extraction(format!("Error reading TXT file: {}", e))
    })?;

    match String::from_utf8(bytes) {
        Ok(text) => {
            info!(path = %path.display(), "Successfully read text from file");
            Ok(text)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "File is not valid UTF-8, decoding as Latin-1");
            let text = decode_latin1(e.as_bytes());
            info!(path = %path.display(), "Successfully read text from file with latin-1 encoding");
            Ok(text)
        }
    }
}

/// Every byte maps to the code point of the same value, so this cannot fail.
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}
