//! Archery video analysis pipeline.
//!
//! This crate provides:
//! - Pipeline orchestration from video file to `AnalysisResult`
//! - Environment-driven configuration
//! - Structured run logging and metrics
//! - The `bowform-analyze` command line tool

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod pipeline;

pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};
pub use logging::RunLogger;
pub use pipeline::{Pipeline, PipelineStage};
