//! Shared data models for Bowform.
//!
//! This crate provides Serde-serializable types for:
//! - The 33-point pose landmark layout and per-frame pose records
//! - Shot phases
//! - Analyzer reports and structured form errors
//! - The persisted analysis result and HTTP envelopes

pub mod frame;
pub mod landmark;
pub mod phase;
pub mod report;
pub mod response;
pub mod result;

// Re-export common types
pub use frame::FrameRecord;
pub use landmark::{DrawHand, Landmark, ParseDrawHandError, PoseLandmark, WorldLandmark, POSE_LANDMARK_COUNT};
pub use phase::{PhaseRange, ShotPhase};
pub use report::{metric_names, FormError, FormErrorCategory, MetricReport};
pub use response::{AnalysisResponse, SampleVideo, SampleVideoList};
pub use result::{AnalysisId, AnalysisResult, ShotAnalysis};
