//! Error types for media operations.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur while decoding video or estimating poses.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Could not open video {path}: {message}")]
    VideoOpen { path: PathBuf, message: String },

    #[error("Invalid stream metadata: {0}")]
    InvalidStreamMetadata(String),

    #[error("FFmpeg not found in PATH")]
    FfmpegNotFound,

    #[error("FFprobe not found in PATH")]
    FfprobeNotFound,

    #[error("FFprobe command failed: {message}")]
    FfprobeFailed {
        message: String,
        stderr: Option<String>,
    },

    #[error("Frame decode failed: {0}")]
    Decode(String),

    #[error("Video backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Pose inference failed: {0}")]
    InferenceFailed(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl MediaError {
    /// Create a video open failure.
    pub fn video_open(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::VideoOpen {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    /// Create an invalid metadata error.
    pub fn invalid_metadata(message: impl Into<String>) -> Self {
        Self::InvalidStreamMetadata(message.into())
    }

    /// Create a decode failure.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Create an inference failure.
    pub fn inference_failed(message: impl Into<String>) -> Self {
        Self::InferenceFailed(message.into())
    }

    /// Create a model not found error.
    pub fn model_not_found(path: impl Into<String>) -> Self {
        Self::ModelNotFound(path.into())
    }

    /// True for failures that mean the video itself could not be read.
    pub fn is_video_open(&self) -> bool {
        matches!(
            self,
            Self::VideoOpen { .. } | Self::FfprobeFailed { .. } | Self::FfmpegNotFound | Self::FfprobeNotFound
        )
    }
}
