//! Pipeline error types.

use thiserror::Error;

use bowform_media::MediaError;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("No valid pose data found")]
    NoPoseData,

    #[error(transparent)]
    Media(#[from] MediaError),
}

impl PipelineError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// True when the video could not be opened or probed.
    pub fn is_video_open(&self) -> bool {
        matches!(self, Self::Media(e) if e.is_video_open())
    }

    /// True when the run stopped because its cancel flag was raised.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Media(MediaError::Cancelled))
    }

    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConfigError(_) => "config",
            Self::NoPoseData => "no_pose_data",
            Self::Media(MediaError::Cancelled) => "cancelled",
            Self::Media(MediaError::InvalidStreamMetadata(_)) => "invalid_metadata",
            Self::Media(e) if e.is_video_open() => "video_open",
            Self::Media(_) => "media",
        }
    }
}
