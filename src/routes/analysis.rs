use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::post, Json, Router};

use crate::agents::Upload;
use crate::models::{AnalysisResult, AppState};
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/analyze/", post(analyze_document))
        .route("/analyze", post(analyze_document))
        .with_state(state)
}

async fn analyze_document(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<AnalysisResult>> {
    let mut multipart =
        multipart.map_err(|e| AppError::InvalidRequest(format!("Expected a multipart upload: {}", e)))?;
    let upload = read_upload(&mut multipart).await?;

    let result = state.pipeline.handle(upload).await?;
    Ok(Json(result))
}

/// Takes the first multipart field named `file`.
async fn read_upload(multipart: &mut Multipart) -> AppResult<Upload> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Invalid multipart body", e))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::InvalidRequest("Uploaded file has no filename".to_string()))?;
        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error("Failed to read uploaded file", e))?;

        return Ok(Upload {
            filename,
            data: data.to_vec(),
        });
    }

    Err(AppError::InvalidRequest("No file provided".to_string()))
}

/// Body-limit hits keep their 413; every other multipart failure is a 422.
fn multipart_error(context: &str, e: MultipartError) -> AppError {
    let message = format!("{}: {}", context, e.body_text());
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(message)
    } else {
        AppError::InvalidRequest(message)
    }
}
