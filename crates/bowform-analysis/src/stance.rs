//! Stance analysis at shot setup.
//!
//! Stance is a static posture check on the first extracted frame. Foot width
//! thresholds are in normalized image-width units, not calibrated to the
//! archer's real stance width, so camera distance shifts the result.

use bowform_models::{
    metric_names, FormError, FormErrorCategory, FrameRecord, MetricReport, PoseLandmark,
};

use crate::geometry::line_angle_degrees;
use crate::FormAnalyzer;

/// Ankle x-distance below which the stance is too narrow.
pub const MIN_FOOT_DISTANCE: f64 = 0.15;
/// Ankle x-distance above which the stance is too wide.
pub const MAX_FOOT_DISTANCE: f64 = 0.35;
/// Maximum shoulder-line vs hip-line angle difference in degrees.
pub const MAX_ALIGNMENT_DIFFERENCE_DEG: f64 = 10.0;

const POINTS_PER_ERROR: f64 = 25.0;

/// Checks foot width and shoulder/hip alignment.
#[derive(Debug, Clone, Copy, Default)]
pub struct StanceAnalyzer;

impl FormAnalyzer for StanceAnalyzer {
    fn name(&self) -> &'static str {
        "stance"
    }

    fn analyze(&self, frames: &[FrameRecord]) -> MetricReport {
        let Some(first) = frames.first() else {
            return MetricReport::insufficient(FormError::new(
                FormErrorCategory::Detection,
                "No pose data available",
            ));
        };

        if !first.has_full_pose() {
            return MetricReport::insufficient(FormError::new(
                FormErrorCategory::Detection,
                "Incomplete pose detection",
            ));
        }

        let lm = |p: PoseLandmark| &first.landmarks[p.index()];
        let mut report = MetricReport::new();

        let foot_distance = (lm(PoseLandmark::LeftAnkle).x - lm(PoseLandmark::RightAnkle).x).abs();
        if foot_distance < MIN_FOOT_DISTANCE {
            report.push_error(
                FormError::new(
                    FormErrorCategory::Stance,
                    "Stance too narrow - widen your feet for better balance",
                )
                .with_value(foot_distance),
            );
        } else if foot_distance > MAX_FOOT_DISTANCE {
            report.push_error(
                FormError::new(
                    FormErrorCategory::Stance,
                    "Stance too wide - bring feet closer for stability",
                )
                .with_value(foot_distance),
            );
        }

        let shoulder_angle =
            line_angle_degrees(lm(PoseLandmark::LeftShoulder), lm(PoseLandmark::RightShoulder));
        let hip_angle = line_angle_degrees(lm(PoseLandmark::LeftHip), lm(PoseLandmark::RightHip));
        let alignment_difference = (shoulder_angle - hip_angle).abs();
        if alignment_difference > MAX_ALIGNMENT_DIFFERENCE_DEG {
            report.push_error(
                FormError::new(
                    FormErrorCategory::Shoulder,
                    format!(
                        "Poor body alignment - shoulder/hip misalignment of {:.1}°",
                        alignment_difference
                    ),
                )
                .with_value(alignment_difference),
            );
        }

        let stance_score = (100.0 - POINTS_PER_ERROR * report.errors.len() as f64).max(0.0);

        report.set_metric(metric_names::FOOT_DISTANCE, foot_distance);
        report.set_metric(metric_names::ALIGNMENT_DIFFERENCE, alignment_difference);
        report.set_metric(metric_names::STANCE_SCORE, stance_score);
        report
    }
}
