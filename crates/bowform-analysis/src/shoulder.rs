//! Shoulder-line stability across a frame sequence.

use bowform_models::{FormError, FormErrorCategory, FrameRecord, PoseLandmark};

use crate::geometry::{line_angle_degrees, population_variance};

/// Angle variance (degrees squared) above which shoulders are inconsistent.
pub const MAX_SHOULDER_ANGLE_VARIANCE: f64 = 25.0;

/// Result of the shoulder-consistency check.
#[derive(Debug, Clone, PartialEq)]
pub struct ShoulderConsistency {
    /// 0-100 consistency score
    pub score: f64,
    pub error: Option<FormError>,
}

/// Variance of the shoulder-line angle over every frame that has both shoulders.
pub fn shoulder_consistency(frames: &[FrameRecord]) -> ShoulderConsistency {
    let angles: Vec<f64> = frames
        .iter()
        .filter_map(|frame| {
            let left = frame.landmark(PoseLandmark::LeftShoulder)?;
            let right = frame.landmark(PoseLandmark::RightShoulder)?;
            Some(line_angle_degrees(left, right))
        })
        .collect();

    if angles.len() < 2 {
        return ShoulderConsistency {
            score: 0.0,
            error: Some(FormError::new(
                FormErrorCategory::Shoulder,
                "Insufficient data for shoulder analysis",
            )),
        };
    }

    let variance = population_variance(&angles);
    if variance > MAX_SHOULDER_ANGLE_VARIANCE {
        ShoulderConsistency {
            score: (100.0 - 2.0 * variance).max(0.0),
            error: Some(
                FormError::new(
                    FormErrorCategory::Shoulder,
                    format!("Inconsistent shoulder position - variance of {:.1}°", variance),
                )
                .with_value(variance),
            ),
        }
    } else {
        ShoulderConsistency {
            score: 100.0 - variance,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{frame, standing_pose};
    use bowform_models::Landmark;

    fn tilted(angle_deg: f64) -> Vec<Landmark> {
        let mut pose = standing_pose();
        let rad = angle_deg.to_radians();
        pose[PoseLandmark::LeftShoulder.index()] = Landmark::at(0.4, 0.3);
        pose[PoseLandmark::RightShoulder.index()] =
            Landmark::at(0.4 + 0.2 * rad.cos(), 0.3 + 0.2 * rad.sin());
        pose
    }

    #[test]
    fn test_stable_shoulders() {
        let frames: Vec<_> = (0..10).map(|i| frame(i, tilted(2.0))).collect();
        let result = shoulder_consistency(&frames);
        assert!(result.error.is_none());
        assert!((result.score - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_small_wobble_reduces_score() {
        // Alternating 0 and 4 degrees has variance 4
        let frames: Vec<_> = (0..10)
            .map(|i| frame(i, tilted(if i % 2 == 0 { 0.0 } else { 4.0 })))
            .collect();
        let result = shoulder_consistency(&frames);
        assert!(result.error.is_none());
        assert!((result.score - 96.0).abs() < 1e-6);
    }

    #[test]
    fn test_unstable_shoulders() {
        // Alternating 0 and 20 degrees has variance 100
        let frames: Vec<_> = (0..10)
            .map(|i| frame(i, tilted(if i % 2 == 0 { 0.0 } else { 20.0 })))
            .collect();
        let result = shoulder_consistency(&frames);
        let error = result.error.expect("variance above threshold");
        assert_eq!(error.category, FormErrorCategory::Shoulder);
        assert!(error.message.starts_with("Inconsistent shoulder position"));
        assert!((error.value.unwrap() - 100.0).abs() < 1e-6);
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_insufficient_samples() {
        let result = shoulder_consistency(&[frame(0, standing_pose())]);
        assert_eq!(result.score, 0.0);
        assert_eq!(
            result.error.unwrap().message,
            "Insufficient data for shoulder analysis"
        );
    }

    #[test]
    fn test_frames_without_shoulders_are_skipped() {
        let frames = vec![
            frame(0, standing_pose()),
            frame(1, Vec::new()),
            frame(2, standing_pose()),
        ];
        assert!(shoulder_consistency(&frames).error.is_none());
    }
}
