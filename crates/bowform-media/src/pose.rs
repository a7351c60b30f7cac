//! Pose estimation capability.

use image::RgbImage;

use bowform_models::{Landmark, WorldLandmark};

use crate::error::MediaResult;

/// Landmarks found in a single frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseDetection {
    /// Normalized image-space landmarks in canonical order
    pub landmarks: Vec<Landmark>,
    /// Metric 3-D landmarks when the model provides them
    pub world_landmarks: Option<Vec<WorldLandmark>>,
}

impl PoseDetection {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self {
            landmarks,
            world_landmarks: None,
        }
    }

    pub fn with_world_landmarks(mut self, world_landmarks: Vec<WorldLandmark>) -> Self {
        self.world_landmarks = Some(world_landmarks);
        self
    }
}

/// Finds at most one body pose in an RGB frame.
///
/// Shared across concurrent analyses, so implementations guard any mutable
/// inference state themselves.
#[cfg_attr(test, mockall::automock)]
pub trait PoseEstimator: Send + Sync {
    /// `Ok(None)` when no person is found.
    fn estimate(&self, frame: &RgbImage) -> MediaResult<Option<PoseDetection>>;
}
