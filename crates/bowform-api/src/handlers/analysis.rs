//! Analysis handlers.
//!
//! Both entry points hand a video file to the analyzer on a blocking thread,
//! store the result under a fresh identifier and return it:
//! 1. Upload: a multipart `file` field, removed again once the request ends
//! 2. Sample: a video from the sample library, by name

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::Json;
use tokio::io::AsyncWriteExt;
use tokio::sync::watch;
use tracing::{error, info, warn};

use bowform_models::{AnalysisId, AnalysisResponse};
use bowform_storage::{remove_upload, StorageError};

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

/// Multipart field carrying the video.
const FILE_FIELD: &str = "file";

const SOURCE_UPLOAD: &str = "upload";
const SOURCE_SAMPLE: &str = "sample";

// ============================================================================
// Upload
// ============================================================================

/// Analyze an uploaded video.
///
/// The upload is streamed to disk and deleted on every exit path, including
/// client disconnects.
pub async fn analyze_video(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<AnalysisResponse>> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        if !field
            .content_type()
            .is_some_and(|ct| ct.starts_with("video/"))
        {
            return Err(ApiError::bad_request("File must be a video"));
        }

        let source_name = field.file_name().unwrap_or("upload").to_string();
        let (path, mut file) = state.uploads.create(&source_name).await?;
        let upload = scopeguard::guard(path, |path| remove_upload(&path));

        let mut received: u64 = 0;
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?
        {
            file.write_all(&chunk).await.map_err(StorageError::from)?;
            received += chunk.len() as u64;
        }
        file.flush().await.map_err(StorageError::from)?;
        drop(file);

        metrics::record_upload_bytes(received);
        info!(file = %source_name, bytes = received, "Received upload");

        return run_analysis(&state, upload.clone(), source_name, SOURCE_UPLOAD).await;
    }

    Err(ApiError::bad_request("No file uploaded"))
}

// ============================================================================
// Samples
// ============================================================================

/// Analyze a video from the sample library.
pub async fn analyze_sample(
    State(state): State<AppState>,
    Path(video_name): Path<String>,
) -> ApiResult<Json<AnalysisResponse>> {
    let path = state
        .samples
        .resolve(&video_name)
        .await
        .map_err(|e| match e {
            StorageError::NotFound(_) => ApiError::not_found("Video not found"),
            StorageError::InvalidKey(_) => ApiError::bad_request("Invalid video name"),
            other => other.into(),
        })?;

    run_analysis(&state, path, video_name, SOURCE_SAMPLE).await
}

// ============================================================================
// Shared
// ============================================================================

/// Run the analyzer on `path` within the request timeout and store the result.
async fn run_analysis(
    state: &AppState,
    path: PathBuf,
    source_name: String,
    source: &'static str,
) -> ApiResult<Json<AnalysisResponse>> {
    let identifier = AnalysisId::new();
    let (cancel_tx, cancel_rx) = watch::channel(false);

    // Raise the cancel flag however this future ends, so an abandoned
    // request stops decoding at the next frame
    let _cancel = scopeguard::guard(cancel_tx, |tx| {
        let _ = tx.send(true);
    });

    let analyzer = Arc::clone(&state.analyzer);
    let run_id = identifier.clone();
    let task = tokio::task::spawn_blocking(move || analyzer.analyze(&run_id, &path, cancel_rx));

    let timeout = state.config.request_timeout;
    let result = match tokio::time::timeout(timeout, task).await {
        Ok(Ok(Ok(result))) => result,
        Ok(Ok(Err(e))) => {
            warn!(id = %identifier, file = %source_name, kind = e.kind(), "Analysis failed: {}", e);
            metrics::record_analysis_request(source, "failed");
            return Err(ApiError::analysis_failed(e.to_string()));
        }
        Ok(Err(e)) => {
            error!(id = %identifier, "Analysis task panicked: {}", e);
            metrics::record_analysis_request(source, "failed");
            return Err(ApiError::internal("Analysis task failed"));
        }
        Err(_) => {
            warn!(id = %identifier, file = %source_name, "Analysis timed out");
            metrics::record_analysis_request(source, "timeout");
            return Err(ApiError::Timeout(timeout.as_secs()));
        }
    };

    state.results.save(&identifier, &result).await?;
    metrics::record_analysis_request(source, "succeeded");

    info!(
        id = %identifier,
        file = %source_name,
        frames = result.pose_data.len(),
        score = result.analysis.overall_score,
        "Analysis stored"
    );

    Ok(Json(AnalysisResponse::new(identifier, source_name, result)))
}
