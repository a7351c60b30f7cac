//! Analyzer reports and form errors.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Metric keys emitted by the analyzers.
pub mod metric_names {
    pub const FOOT_DISTANCE: &str = "foot_distance";
    pub const ALIGNMENT_DIFFERENCE: &str = "alignment_difference";
    pub const STANCE_SCORE: &str = "stance_score";
    pub const DRAW_SMOOTHNESS: &str = "draw_smoothness";
    pub const SHOULDER_CONSISTENCY: &str = "shoulder_consistency";
    pub const ANCHOR_CONSISTENCY: &str = "anchor_consistency";
    pub const RELEASE_SMOOTHNESS: &str = "release_smoothness";
}

/// What part of the shot a form error concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FormErrorCategory {
    /// Foot placement
    Stance,
    /// Draw path and draw-phase data
    Draw,
    /// Anchor point consistency
    Anchor,
    /// Release hand behavior
    Release,
    /// Shoulder line level and stability, shoulder/hip alignment
    Shoulder,
    /// Pose detection was too incomplete to judge form
    Detection,
}

impl FormErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stance => "stance",
            Self::Draw => "draw",
            Self::Anchor => "anchor",
            Self::Release => "release",
            Self::Shoulder => "shoulder",
            Self::Detection => "detection",
        }
    }
}

impl fmt::Display for FormErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A detected form error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FormError {
    pub category: FormErrorCategory,
    /// Human-readable description shown to the archer
    pub message: String,
    /// Measured value that crossed the threshold, when there is one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl FormError {
    pub fn new(category: FormErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            value: None,
        }
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Output of a single analyzer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MetricReport {
    pub errors: Vec<FormError>,
    pub metrics: BTreeMap<String, f64>,
}

impl MetricReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report for an analyzer that could not run: one error, no metrics.
    pub fn insufficient(error: FormError) -> Self {
        Self {
            errors: vec![error],
            metrics: BTreeMap::new(),
        }
    }

    pub fn push_error(&mut self, error: FormError) {
        self.errors.push(error);
    }

    pub fn set_metric(&mut self, name: &str, value: f64) {
        self.metrics.insert(name.to_string(), value);
    }

    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// True if any error belongs to `category`.
    pub fn has_error_in(&self, category: FormErrorCategory) -> bool {
        self.errors.iter().any(|e| e.category == category)
    }
}
