//! Terminal analysis artifacts.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::frame::FrameRecord;
use crate::phase::PhaseRange;
use crate::report::{FormError, MetricReport};

/// Opaque identifier under which an analysis result is stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct AnalysisId(pub String);

impl AnalysisId {
    /// Generate a new random analysis ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if the ID is a well-formed UUID (safe to use as a file stem).
    pub fn is_valid(&self) -> bool {
        Uuid::parse_str(&self.0).is_ok()
    }
}

impl Default for AnalysisId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AnalysisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AnalysisId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Biomechanical critique of one shot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ShotAnalysis {
    /// Setup, draw, anchor, release in shot order
    pub phases: Vec<PhaseRange>,
    pub stance_analysis: MetricReport,
    pub draw_analysis: MetricReport,
    pub anchor_analysis: MetricReport,
    pub release_analysis: MetricReport,
    /// All analyzer errors in stance, draw, anchor, release order (not deduplicated)
    pub errors: Vec<FormError>,
    /// `max(0, 100 - 15 * errors.len())`
    pub overall_score: u8,
    pub recommendations: Vec<String>,
}

/// Complete result of analyzing one video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisResult {
    /// Frame count reported by the stream metadata
    pub total_frames: u64,
    pub fps: f64,
    /// `total_frames / fps` in seconds
    pub duration: f64,
    pub pose_data: Vec<FrameRecord>,
    pub analysis: ShotAnalysis,
}
