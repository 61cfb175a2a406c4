//! Request orchestration
//!
//! One linear pass per upload: validate the extension, write the bytes to the
//! uploads area, extract, analyze, save the result artifact. The transient file
//! is removed when the request finishes, fails or is dropped mid-flight.

use std::path::{Path, PathBuf};

use tracing::{dispatcher, field, info, info_span, Instrument, Span};
use uuid::Uuid;

use crate::agents::ClaimAnalyzer;
use crate::documents::{DocumentKind, DocumentProcessor};
use crate::models::AnalysisResult;
use crate::storage::Storage;
use crate::types::{AppError, AppResult};

/// A file received from the client, not yet written anywhere.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub data: Vec<u8>,
}

pub struct ClaimPipeline {
    analyzer: ClaimAnalyzer,
    storage: Storage,
}

impl ClaimPipeline {
    pub fn new(analyzer: ClaimAnalyzer, storage: Storage) -> Self {
        Self { analyzer, storage }
    }

    pub fn analyzer(&self) -> &ClaimAnalyzer {
        &self.analyzer
    }

    /// Runs one upload inside an `analyze` span carrying request id, filename and kind.
    pub async fn handle(&self, upload: Upload) -> AppResult<AnalysisResult> {
        let span = info_span!(
            "analyze",
            request_id = %Uuid::new_v4(),
            filename = %upload.filename,
            kind = field::Empty,
        );

        self.run(upload).instrument(span).await
    }

    async fn run(&self, upload: Upload) -> AppResult<AnalysisResult> {
        // Gate on the raw client name so empty or dot-only names are a type error too
        let kind = DocumentKind::from_filename(&upload.filename).map_err(|_| {
            let extension = upload
                .filename
                .rsplit('.')
                .next()
                .unwrap_or_default()
                .to_lowercase();
            AppError::UnsupportedFileType(extension)
        })?;
        Span::current().record("kind", field::display(kind));

        let filename = sanitize_filename(&upload.filename)?;
        info!(filename = %filename, bytes = upload.data.len(), "Processing file");

        // Dropping the guard removes the file, also when this future is cancelled
        let transient = self.storage.transient_upload(&filename);
        self.process(transient.path(), &filename, kind, &upload.data).await
    }

    async fn process(
        &self,
        path: &Path,
        filename: &str,
        kind: DocumentKind,
        data: &[u8],
    ) -> AppResult<AnalysisResult> {
        self.storage
            .write_upload(path, data)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let owned: PathBuf = path.to_path_buf();
        let span = Span::current();
        let dispatch = dispatcher::get_default(|d| d.clone());
        let text = tokio::task::spawn_blocking(move || {
            dispatcher::with_default(&dispatch, || {
                span.in_scope(|| DocumentProcessor::extract(&owned, kind))
            })
        })
        .await
        .map_err(|e| AppError::Internal(format!("extraction task failed: {}", e)))??;
        info!("Document processed successfully");

        let result = self.analyzer.analyze(&text).await?;
        info!(score = result.trustworthiness_score, "Document analyzed successfully");

        let _ = self.storage.persist_result(filename, &result).await;

        Ok(result)
    }
}

/// Keeps only the final path component so client-supplied names cannot escape the uploads area.
fn sanitize_filename(raw: &str) -> AppResult<String> {
    Path::new(raw)
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| AppError::InvalidRequest(format!("Invalid filename: {:?}", raw)))
}

#[cfg(test)]
mod tests {
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use super::*;
    use crate::documents::pdf::tests::write_pdf;
    use crate::llm::provider::testing::{PendingAdapter, ScriptedAdapter};
    use crate::llm::LLMAdapter;
    use tempfile::TempDir;

    const GOOD_REPLY: &str =
        r#"{"summary":"Mostly coherent.","trustworthiness_score":77,"detailed_analysis":"Invoice and photos agree."}"#;

    struct Fixture {
        dir: TempDir,
        adapter: Arc<ScriptedAdapter>,
        pipeline: ClaimPipeline,
    }

    impl Fixture {
        async fn new(adapter: ScriptedAdapter) -> Self {
            let adapter = Arc::new(adapter);
            let client: Arc<dyn LLMAdapter> = adapter.clone();
            Self::with_client(adapter, client).await
        }

        async fn with_client(adapter: Arc<ScriptedAdapter>, client: Arc<dyn LLMAdapter>) -> Self {
            let dir = TempDir::new().unwrap();
            let storage = Storage::with_dirs(dir.path().join("uploads"), dir.path().join("results"));
            storage.ensure_dirs().await.unwrap();

            let analyzer = ClaimAnalyzer::new(Some(client), "gpt-3.5-turbo");

            Self {
                dir,
                adapter,
                pipeline: ClaimPipeline::new(analyzer, storage),
            }
        }

        fn uploads_empty(&self) -> bool {
            std::fs::read_dir(self.dir.path().join("uploads")).unwrap().next().is_none()
        }

        fn result_file(&self, name: &str) -> PathBuf {
            self.dir.path().join("results").join(name)
        }
    }

    fn upload(filename: &str, data: &[u8]) -> Upload {
        Upload {
            filename: filename.to_string(),
            data: data.to_vec(),
        }
    }

    #[tokio::test]
    async fn test_text_upload_end_to_end() {
        let fx = Fixture::new(ScriptedAdapter::replying(GOOD_REPLY)).await;

        let result = fx
            .pipeline
            .handle(upload("claim.txt", b"Water damage on 2 June.\n\nPlumber invoice attached."))
            .await
            .unwrap();

        assert_eq!(result.trustworthiness_score, 77);
        assert!(fx.uploads_empty());
        assert!(fx.result_file("claim_analysis.json").exists());

        let request = fx.adapter.last_request().unwrap();
        assert!(request.messages[1]
            .content
            .contains("Water damage on 2 June. Plumber invoice attached."));
    }

    #[tokio::test]
    async fn test_pdf_upload_end_to_end() {
        let fx = Fixture::new(ScriptedAdapter::replying(GOOD_REPLY)).await;
        let pdf_path = fx.dir.path().join("source.pdf");
        write_pdf(&pdf_path, &["Theft reported 4 April", "Receipt number 8812"]);
        let bytes = std::fs::read(&pdf_path).unwrap();

        let result = fx.pipeline.handle(upload("Report.PDF", &bytes)).await.unwrap();

        assert_eq!(result.summary, "Mostly coherent.");
        assert!(fx.uploads_empty());
        assert!(fx.result_file("Report_analysis.json").exists());
        let prompt = fx.adapter.last_request().unwrap().messages[1].content.clone();
        assert!(prompt.contains("Theft reported 4 April"));
        assert!(prompt.contains("Receipt number 8812"));
    }

    #[tokio::test]
    async fn test_unsupported_extension_rejected_up_front() {
        let fx = Fixture::new(ScriptedAdapter::replying(GOOD_REPLY)).await;

        let err = fx.pipeline.handle(upload("claim.docx", b"whatever")).await.unwrap_err();

        assert!(matches!(err, AppError::UnsupportedFileType(ref ext) if ext == "docx"));
        assert_eq!(fx.adapter.call_count(), 0);
        assert!(fx.uploads_empty());
    }

    #[tokio::test]
    async fn test_extraction_failure_cleans_up() {
        let fx = Fixture::new(ScriptedAdapter::replying(GOOD_REPLY)).await;

        let err = fx.pipeline.handle(upload("broken.pdf", b"not really a pdf")).await.unwrap_err();

        assert!(matches!(err, AppError::Document(_)));
        assert!(err.to_string().starts_with("Error processing document: "));
        assert_eq!(fx.adapter.call_count(), 0);
        assert!(fx.uploads_empty());
        assert!(!fx.result_file("broken_analysis.json").exists());
    }

    #[tokio::test]
    async fn test_empty_document_fails_analysis_and_cleans_up() {
        let fx = Fixture::new(ScriptedAdapter::replying(GOOD_REPLY)).await;

        let err = fx.pipeline.handle(upload("blank.txt", b"  @@ \n ## ")).await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "Error analyzing document: Empty document provided for analysis."
        );
        assert_eq!(fx.adapter.call_count(), 0);
        assert!(fx.uploads_empty());
    }

    #[tokio::test]
    async fn test_remote_failure_cleans_up() {
        let fx = Fixture::new(ScriptedAdapter::failing("connection reset")).await;

        let err = fx.pipeline.handle(upload("claim.txt", b"Some claim text")).await.unwrap_err();

        assert!(matches!(err, AppError::Analysis(_)));
        assert!(err.to_string().contains("connection reset"));
        assert!(fx.uploads_empty());
    }

    #[tokio::test]
    async fn test_result_persistence_failure_does_not_fail_request() {
        let fx = Fixture::new(ScriptedAdapter::replying(GOOD_REPLY)).await;
        std::fs::remove_dir_all(fx.dir.path().join("results")).unwrap();

        let result = fx.pipeline.handle(upload("claim.txt", b"Some claim text")).await.unwrap();

        assert_eq!(result.trustworthiness_score, 77);
        assert!(fx.uploads_empty());
    }

    #[tokio::test]
    async fn test_malformed_reply_still_returns_result() {
        let fx = Fixture::new(ScriptedAdapter::replying("Sorry, I cannot help with that.")).await;

        let result = fx.pipeline.handle(upload("claim.txt", b"Some claim text")).await.unwrap();

        assert_eq!(result.trustworthiness_score, 50);
        assert_eq!(result.summary, "Error parsing analysis results.");
        assert!(fx.result_file("claim_analysis.json").exists());
    }

    #[tokio::test]
    async fn test_path_components_are_stripped() {
        let fx = Fixture::new(ScriptedAdapter::replying(GOOD_REPLY)).await;

        fx.pipeline
            .handle(upload("../../etc/claim.txt", b"Some claim text"))
            .await
            .unwrap();

        assert!(fx.result_file("claim_analysis.json").exists());
        assert!(fx.uploads_empty());
    }

    #[tokio::test]
    async fn test_nameless_uploads_are_unsupported_type() {
        let fx = Fixture::new(ScriptedAdapter::replying(GOOD_REPLY)).await;

        for name in ["", "..", "dir/.."] {
            let err = fx.pipeline.handle(upload(name, b"Some claim text")).await.unwrap_err();
            assert!(matches!(err, AppError::UnsupportedFileType(_)), "{:?} gave {:?}", name, err);
            assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
        }
        assert_eq!(fx.adapter.call_count(), 0);
        assert!(fx.uploads_empty());
    }

    #[tokio::test]
    async fn test_cancelled_request_removes_upload() {
        let unused = Arc::new(ScriptedAdapter::replying(GOOD_REPLY));
        let fx = Fixture::with_client(unused, Arc::new(PendingAdapter)).await;

        let outcome = tokio::time::timeout(
            Duration::from_millis(300),
            fx.pipeline.handle(upload("claim.txt", b"Some claim text")),
        )
        .await;

        assert!(outcome.is_err());
        assert!(fx.uploads_empty());
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn lines(&self) -> Vec<String> {
            String::from_utf8(self.0.lock().unwrap().clone())
                .unwrap()
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    #[tokio::test]
    async fn test_extraction_logs_carry_request_span() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let fx = Fixture::new(ScriptedAdapter::replying(GOOD_REPLY)).await;
        fx.pipeline.handle(upload("claim.txt", b"Some claim text")).await.unwrap();

        let lines = logs.lines();
        let extracted = lines
            .iter()
            .find(|line| line.contains("original_len="))
            .expect("extraction log line");
        assert!(extracted.contains("request_id="), "{}", extracted);
        assert!(extracted.contains("kind=txt"), "{}", extracted);
        assert!(extracted.contains("filename=claim.txt"), "{}", extracted);
    }

    #[test]
    fn test_sanitize_rejects_empty_names() {
        assert!(sanitize_filename("").is_err());
        assert!(sanitize_filename("..").is_err());
        assert_eq!(sanitize_filename("dir/claim.txt").unwrap(), "claim.txt");
    }
}
