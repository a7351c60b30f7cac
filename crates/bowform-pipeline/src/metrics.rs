//! Pipeline metrics.
//!
//! Recorded through the `metrics` facade; nothing is exported unless the
//! host process installs a recorder.

use metrics::{counter, histogram};

use crate::pipeline::PipelineStage;

/// Metric names as constants for consistency.
pub mod names {
    pub const RUNS_STARTED_TOTAL: &str = "bowform_runs_started_total";
    pub const RUNS_SUCCEEDED_TOTAL: &str = "bowform_runs_succeeded_total";
    pub const RUNS_FAILED_TOTAL: &str = "bowform_runs_failed_total";
    pub const RUN_DURATION_SECONDS: &str = "bowform_run_duration_seconds";
    pub const STAGE_DURATION_SECONDS: &str = "bowform_stage_duration_seconds";
    pub const FRAMES_DECODED_TOTAL: &str = "bowform_frames_decoded_total";
    pub const FRAMES_SAMPLED_TOTAL: &str = "bowform_frames_sampled_total";
    pub const FRAMES_DETECTED_TOTAL: &str = "bowform_frames_detected_total";
    pub const OVERALL_SCORE: &str = "bowform_overall_score";
    pub const FORM_ERRORS_TOTAL: &str = "bowform_form_errors_total";
}

pub fn record_run_started() {
    counter!(names::RUNS_STARTED_TOTAL).increment(1);
}

pub fn record_run_succeeded(duration_secs: f64, overall_score: u8) {
    counter!(names::RUNS_SUCCEEDED_TOTAL).increment(1);
    histogram!(names::RUN_DURATION_SECONDS).record(duration_secs);
    histogram!(names::OVERALL_SCORE).record(overall_score as f64);
}

pub fn record_run_failed(kind: &'static str, duration_secs: f64) {
    let labels = [("kind", kind.to_string())];
    counter!(names::RUNS_FAILED_TOTAL, &labels).increment(1);
    histogram!(names::RUN_DURATION_SECONDS).record(duration_secs);
}

pub fn record_stage_duration(stage: PipelineStage, duration_secs: f64) {
    let labels = [("stage", stage.as_str().to_string())];
    histogram!(names::STAGE_DURATION_SECONDS, &labels).record(duration_secs);
}

pub fn record_frames(decoded: u64, sampled: u64, detected: u64) {
    counter!(names::FRAMES_DECODED_TOTAL).increment(decoded);
    counter!(names::FRAMES_SAMPLED_TOTAL).increment(sampled);
    counter!(names::FRAMES_DETECTED_TOTAL).increment(detected);
}

pub fn record_form_error(category: &'static str) {
    let labels = [("category", category.to_string())];
    counter!(names::FORM_ERRORS_TOTAL, &labels).increment(1);
}
