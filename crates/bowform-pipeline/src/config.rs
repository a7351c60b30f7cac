//! Pipeline configuration.

use std::path::PathBuf;

use bowform_media::{BlazePoseConfig, VideoBackend, DEFAULT_STRIDE};
use bowform_models::DrawHand;

use crate::error::{PipelineError, PipelineResult};

/// Default location of the BlazePose landmark model.
pub const DEFAULT_POSE_MODEL: &str = "models/pose_landmark_full.onnx";

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Decoded frames per pose-estimated sample
    pub stride: usize,
    /// Decoder used by `Pipeline::run_file`
    pub video_backend: VideoBackend,
    /// Hand that draws the string; selects the tracked elbow and wrist
    pub draw_hand: DrawHand,
    /// Path to the BlazePose ONNX model
    pub pose_model_path: PathBuf,
    /// Minimum pose presence score for a frame to count as detected
    pub min_pose_presence: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            stride: DEFAULT_STRIDE,
            video_backend: VideoBackend::default(),
            draw_hand: DrawHand::default(),
            pose_model_path: PathBuf::from(DEFAULT_POSE_MODEL),
            min_pose_presence: 0.5,
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables.
    ///
    /// Unparseable values fall back to their defaults; `validate` catches the
    /// parseable but out-of-range ones.
    pub fn from_env() -> Self {
        Self {
            stride: std::env::var("BOWFORM_STRIDE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_STRIDE),
            video_backend: std::env::var("BOWFORM_VIDEO_BACKEND")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            draw_hand: std::env::var("BOWFORM_DRAW_HAND")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            pose_model_path: std::env::var("BOWFORM_POSE_MODEL")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_POSE_MODEL)),
            min_pose_presence: std::env::var("BOWFORM_MIN_POSE_PRESENCE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(0.5),
        }
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> PipelineResult<()> {
        if self.stride == 0 {
            return Err(PipelineError::config_error("stride must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.min_pose_presence) {
            return Err(PipelineError::config_error(format!(
                "min_pose_presence must be within [0, 1], got {}",
                self.min_pose_presence
            )));
        }
        Ok(())
    }

    /// Model settings for `BlazePoseEstimator`.
    pub fn pose_config(&self) -> BlazePoseConfig {
        BlazePoseConfig::default().with_min_presence(self.min_pose_presence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = PipelineConfig::default();
        assert_eq!(config.stride, 5);
        assert_eq!(config.draw_hand, DrawHand::Right);
        assert_eq!(config.video_backend, VideoBackend::Ffmpeg);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_stride_rejected() {
        let config = PipelineConfig {
            stride: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(PipelineError::ConfigError(_))));
    }

    #[test]
    fn test_presence_range() {
        let config = PipelineConfig {
            min_pose_presence: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert!((config.pose_config().min_presence - 1.5).abs() < f32::EPSILON);
    }
}
