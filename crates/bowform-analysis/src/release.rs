//! Release hand movement.

use bowform_models::{metric_names, DrawHand, FormError, FormErrorCategory, FrameRecord, MetricReport};

use crate::geometry::max_value;
use crate::FormAnalyzer;

/// Largest allowed wrist step between consecutive release frames.
pub const MAX_RELEASE_MOVEMENT: f64 = 0.1;

/// Checks the draw-side wrist over the last quarter of the shot.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReleaseAnalyzer {
    hand: DrawHand,
}

impl ReleaseAnalyzer {
    pub fn new(hand: DrawHand) -> Self {
        Self { hand }
    }
}

impl FormAnalyzer for ReleaseAnalyzer {
    fn name(&self) -> &'static str {
        "release"
    }

    fn analyze(&self, frames: &[FrameRecord]) -> MetricReport {
        let release_frames = &frames[3 * frames.len() / 4..];
        if release_frames.len() < 2 {
            return MetricReport::insufficient(FormError::new(
                FormErrorCategory::Release,
                "Insufficient frames for release analysis",
            ));
        }

        let wrist = self.hand.wrist();
        let movements: Vec<f64> = release_frames
            .windows(2)
            .filter_map(|pair| {
                let prev = pair[0].landmark(wrist)?;
                let curr = pair[1].landmark(wrist)?;
                Some(curr.distance_2d(prev))
            })
            .collect();

        let mut report = MetricReport::new();
        if let Some(max_movement) = max_value(&movements) {
            if max_movement > MAX_RELEASE_MOVEMENT {
                report.push_error(
                    FormError::new(
                        FormErrorCategory::Release,
                        "Excessive hand movement during release - focus on clean back-tension release",
                    )
                    .with_value(max_movement),
                );
            }
            report.set_metric(
                metric_names::RELEASE_SMOOTHNESS,
                (100.0 - max_movement * 500.0).max(0.0),
            );
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{frame, standing_pose};
    use bowform_models::{Landmark, PoseLandmark};

    fn wrist_track(xs: &[f64]) -> Vec<FrameRecord> {
        xs.iter()
            .enumerate()
            .map(|(i, x)| {
                let mut pose = standing_pose();
                pose[PoseLandmark::RightWrist.index()] = Landmark::at(*x, 0.2);
                frame(i as u64, pose)
            })
            .collect()
    }

    #[test]
    fn test_clean_release() {
        // Last quarter of 8 frames is indices 6 and 7
        let report = ReleaseAnalyzer::default()
            .analyze(&wrist_track(&[0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.50, 0.52]));
        assert!(report.errors.is_empty());
        let score = report.metric(metric_names::RELEASE_SMOOTHNESS).unwrap();
        assert!((score - 90.0).abs() < 1e-6, "score was {score}");
    }

    #[test]
    fn test_excessive_movement() {
        let report = ReleaseAnalyzer::default()
            .analyze(&wrist_track(&[0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.75]));
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].category, FormErrorCategory::Release);
        assert!((report.errors[0].value.unwrap() - 0.25).abs() < 1e-9);
        assert_eq!(report.metric(metric_names::RELEASE_SMOOTHNESS), Some(0.0));
    }

    #[test]
    fn test_movement_before_release_is_ignored() {
        let report = ReleaseAnalyzer::default()
            .analyze(&wrist_track(&[0.1, 0.9, 0.1, 0.9, 0.5, 0.5, 0.5, 0.5]));
        assert!(report.errors.is_empty());
        assert_eq!(report.metric(metric_names::RELEASE_SMOOTHNESS), Some(100.0));
    }

    #[test]
    fn test_insufficient_frames() {
        // Three frames leave a single release frame
        let report = ReleaseAnalyzer::default().analyze(&wrist_track(&[0.5, 0.5, 0.5]));
        assert_eq!(report.errors[0].message, "Insufficient frames for release analysis");
        assert!(report.metrics.is_empty());
    }

    #[test]
    fn test_release_frames_without_wrist() {
        let frames: Vec<_> = (0..8).map(|i| frame(i, Vec::new())).collect();
        let report = ReleaseAnalyzer::default().analyze(&frames);
        assert!(report.errors.is_empty());
        assert!(report.metrics.is_empty());
    }
}
