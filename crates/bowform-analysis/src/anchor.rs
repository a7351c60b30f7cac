//! Anchor point consistency.

use bowform_models::{
    metric_names, DrawHand, FormError, FormErrorCategory, FrameRecord, MetricReport, PoseLandmark,
};

use crate::geometry::max_deviation_from_mean;
use crate::FormAnalyzer;

/// Maximum deviation of the wrist-to-nose distance from its mean
/// (normalized frame units).
pub const MAX_ANCHOR_VARIATION: f64 = 0.05;

/// Measures how steadily the draw hand sits against the face over the
/// second half of the shot.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnchorAnalyzer {
    hand: DrawHand,
}

impl AnchorAnalyzer {
    pub fn new(hand: DrawHand) -> Self {
        Self { hand }
    }

    /// Wrist-to-nose distance for every frame in the second half that has both.
    pub fn anchor_distances(&self, frames: &[FrameRecord]) -> Vec<f64> {
        let wrist = self.hand.wrist();
        frames[frames.len() / 2..]
            .iter()
            .filter_map(|frame| {
                let wrist = frame.landmark(wrist)?;
                let nose = frame.landmark(PoseLandmark::Nose)?;
                Some(wrist.distance_2d(nose))
            })
            .collect()
    }
}

/// Score and optional error for a series of anchor distances.
pub fn evaluate_anchor_distances(distances: &[f64]) -> MetricReport {
    let mut report = MetricReport::new();
    if distances.is_empty() {
        return report;
    }

    let max_variation = max_deviation_from_mean(distances);
    if max_variation > MAX_ANCHOR_VARIATION {
        report.push_error(
            FormError::new(
                FormErrorCategory::Anchor,
                format!(
                    "Inconsistent anchor point - variation of {:.1}%",
                    max_variation * 100.0
                ),
            )
            .with_value(max_variation),
        );
    }

    report.set_metric(
        metric_names::ANCHOR_CONSISTENCY,
        (100.0 - max_variation * 1000.0).max(0.0),
    );
    report
}

impl FormAnalyzer for AnchorAnalyzer {
    fn name(&self) -> &'static str {
        "anchor"
    }

    fn analyze(&self, frames: &[FrameRecord]) -> MetricReport {
        evaluate_anchor_distances(&self.anchor_distances(frames))
    }
}
