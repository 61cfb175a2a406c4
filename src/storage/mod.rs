// Local file storage for transient uploads and result artifacts

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::fs;
use tracing::{error, info};

use crate::config::StorageConfig;
use crate::models::AnalysisResult;

/// Outcome of an operation whose failure must not affect the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BestEffort {
    Done(PathBuf),
    Skipped,
    Failed(String),
}

impl BestEffort {
    pub fn is_done(&self) -> bool {
        matches!(self, BestEffort::Done(_))
    }
}

#[derive(Debug, Clone)]
pub struct Storage {
    upload_dir: PathBuf,
    results_dir: PathBuf,
}

impl Storage {
    pub fn new(config: &StorageConfig) -> Self {
        Self::with_dirs(config.upload_dir.clone(), config.results_dir.clone())
    }

    pub fn with_dirs(upload_dir: impl Into<PathBuf>, results_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            results_dir: results_dir.into(),
        }
    }

    pub async fn ensure_dirs(&self) -> io::Result<()> {
        fs::create_dir_all(&self.upload_dir).await?;
        fs::create_dir_all(&self.results_dir).await?;
        Ok(())
    }

    /// Same filename means same path: a later upload overwrites an earlier one.
    pub fn upload_path(&self, filename: &str) -> PathBuf {
        self.upload_dir.join(filename)
    }

    /// `<results>/<stem>_analysis.json`, where the stem is everything before the first `.`.
    pub fn result_path(&self, filename: &str) -> PathBuf {
        let stem = filename.split('.').next().unwrap_or(filename);
        self.results_dir.join(format!("{}_analysis.json", stem))
    }

    pub async fn write_upload(&self, path: &Path, data: &[u8]) -> io::Result<()> {
        fs::write(path, data).await?;
        info!(path = %path.display(), bytes = data.len(), "File saved");
        Ok(())
    }

    /// Synchronous so it can run from `Drop`; see [`TransientUpload`].
    pub fn remove_upload(&self, path: &Path) -> BestEffort {
        remove_transient(path)
    }

    /// Reserves the transient path for `filename`. The file, once written, is
    /// removed when the returned guard is dropped, including when the request
    /// future is cancelled.
    pub fn transient_upload(&self, filename: &str) -> TransientUpload {
        TransientUpload {
            path: self.upload_path(filename),
        }
    }

    pub async fn persist_result(&self, filename: &str, result: &AnalysisResult) -> BestEffort {
        let path = self.result_path(filename);

        let outcome = match to_pretty_json(result) {
            Ok(data) => fs::write(&path, data).await.map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        match outcome {
            Ok(()) => {
                info!(path = %path.display(), "Results saved");
                BestEffort::Done(path)
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "Error saving results");
                BestEffort::Failed(e)
            }
        }
    }
}

/// Owns the transient upload path for one request.
#[derive(Debug)]
pub struct TransientUpload {
    path: PathBuf,
}

impl TransientUpload {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TransientUpload {
    fn drop(&mut self) {
        // Outcome is logged inside
        let _ = remove_transient(&self.path);
    }
}

fn remove_transient(path: &Path) -> BestEffort {
    match std::fs::remove_file(path) {
        Ok(()) => {
            info!(path = %path.display(), "Temporary file removed");
            BestEffort::Done(path.to_path_buf())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => BestEffort::Skipped,
        Err(e) => {
            error!(path = %path.display(), error = %e, "Error removing temporary file");
            BestEffort::Failed(e.to_string())
        }
    }
}

/// Four-space indented JSON.
fn to_pretty_json<T: Serialize>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}
