//! Per-frame pose records.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::landmark::{Landmark, PoseLandmark, WorldLandmark, POSE_LANDMARK_COUNT};

/// Pose landmarks extracted from one sampled video frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FrameRecord {
    /// Index of the frame in the decoded stream (0-based)
    pub frame_index: u64,
    /// Presentation time in seconds (`frame_index / fps`)
    pub timestamp: f64,
    /// Normalized landmarks in canonical order, empty if detection failed
    pub landmarks: Vec<Landmark>,
    /// Metric 3-D landmarks when the pose model provides them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub world_landmarks: Option<Vec<WorldLandmark>>,
}

impl FrameRecord {
    pub fn new(frame_index: u64, timestamp: f64, landmarks: Vec<Landmark>) -> Self {
        Self {
            frame_index,
            timestamp,
            landmarks,
            world_landmarks: None,
        }
    }

    pub fn with_world_landmarks(mut self, world_landmarks: Vec<WorldLandmark>) -> Self {
        self.world_landmarks = Some(world_landmarks);
        self
    }

    /// Get a landmark if this frame carries it.
    pub fn landmark(&self, landmark: PoseLandmark) -> Option<&Landmark> {
        self.landmarks.get(landmark.index())
    }

    /// True when every landmark of the canonical layout is present.
    pub fn has_full_pose(&self) -> bool {
        self.landmarks.len() >= POSE_LANDMARK_COUNT
    }
}
