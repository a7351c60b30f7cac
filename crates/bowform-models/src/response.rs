//! Request/response envelopes exchanged at the HTTP boundary.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::result::{AnalysisId, AnalysisResult};

/// Successful analysis response.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisResponse {
    pub success: bool,
    /// Key under which the result was stored
    pub identifier: AnalysisId,
    /// Uploaded file name or sample video name
    pub source_name: String,
    pub analysis: AnalysisResult,
}

impl AnalysisResponse {
    pub fn new(identifier: AnalysisId, source_name: impl Into<String>, analysis: AnalysisResult) -> Self {
        Self {
            success: true,
            identifier,
            source_name: source_name.into(),
            analysis,
        }
    }
}

/// A bundled sample video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SampleVideo {
    pub name: String,
    pub path: String,
    /// File size in bytes
    pub size: u64,
}

/// Listing of bundled sample videos.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SampleVideoList {
    pub videos: Vec<SampleVideo>,
}
