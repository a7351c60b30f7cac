//! Folds analyzer reports into the final shot critique.

use bowform_models::{FormError, FormErrorCategory, MetricReport, PhaseRange, ShotAnalysis};
use tracing::debug;

/// Points deducted from the overall score per form error.
pub const POINTS_PER_ERROR: u32 = 15;

/// Sole recommendation when no errors were found.
pub const POSITIVE_RECOMMENDATION: &str = "Great form! Continue practicing to maintain consistency";

/// `max(0, 100 - 15 * error_count)`.
pub fn overall_score(error_count: usize) -> u8 {
    let penalty = u32::try_from(error_count)
        .unwrap_or(u32::MAX)
        .saturating_mul(POINTS_PER_ERROR);
    100u32.saturating_sub(penalty) as u8
}

/// Coaching sentence for an error category. Detection problems carry none.
pub fn advice(category: FormErrorCategory) -> Option<&'static str> {
    match category {
        FormErrorCategory::Stance => Some("Practice proper stance with feet shoulder-width apart"),
        FormErrorCategory::Draw => Some("Focus on slow, controlled draw with consistent back tension"),
        FormErrorCategory::Anchor => {
            Some("Establish a consistent anchor point and practice holding it steady")
        }
        FormErrorCategory::Release => Some("Work on surprise release using back-tension technique"),
        FormErrorCategory::Shoulder => Some("Keep shoulders level and relaxed throughout the shot"),
        FormErrorCategory::Detection => None,
    }
}

/// One recommendation per advisable error, in error order. Duplicates are
/// kept. Falls back to the positive message when nothing is advisable.
pub fn recommendations(errors: &[FormError]) -> Vec<String> {
    let recommendations: Vec<String> = errors
        .iter()
        .filter_map(|error| advice(error.category))
        .map(str::to_string)
        .collect();
    if recommendations.is_empty() {
        return vec![POSITIVE_RECOMMENDATION.to_string()];
    }
    recommendations
}

/// Build the shot critique from the phase split and the four analyzer reports.
pub fn aggregate(
    phases: Vec<PhaseRange>,
    stance: MetricReport,
    draw: MetricReport,
    anchor: MetricReport,
    release: MetricReport,
) -> ShotAnalysis {
    let errors: Vec<FormError> = [&stance, &draw, &anchor, &release]
        .into_iter()
        .flat_map(|report| report.errors.iter().cloned())
        .collect();

    let overall_score = overall_score(errors.len());
    let recommendations = recommendations(&errors);

    debug!(
        error_count = errors.len(),
        overall_score, "Aggregated form analysis"
    );

    ShotAnalysis {
        phases,
        stance_analysis: stance,
        draw_analysis: draw,
        anchor_analysis: anchor,
        release_analysis: release,
        errors,
        overall_score,
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segmenter::segment_phases;

    fn error(category: FormErrorCategory, message: &str) -> FormError {
        FormError::new(category, message)
    }

    #[test]
    fn test_overall_score() {
        assert_eq!(overall_score(0), 100);
        assert_eq!(overall_score(1), 85);
        assert_eq!(overall_score(6), 10);
        assert_eq!(overall_score(7), 0);
        assert_eq!(overall_score(usize::MAX), 0);
    }

    #[test]
    fn test_score_is_non_increasing() {
        let scores: Vec<u8> = (0..20).map(overall_score).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_positive_recommendation_without_errors() {
        assert_eq!(recommendations(&[]), vec![POSITIVE_RECOMMENDATION.to_string()]);
    }

    #[test]
    fn test_duplicate_recommendations_are_kept() {
        let errors = vec![
            error(FormErrorCategory::Anchor, "a"),
            error(FormErrorCategory::Anchor, "b"),
            error(FormErrorCategory::Release, "c"),
        ];
        let recs = recommendations(&errors);
        assert_eq!(recs.len(), 3);
        assert_eq!(recs[0], recs[1]);
        assert_eq!(Some(recs[2].as_str()), advice(FormErrorCategory::Release));
    }

    #[test]
    fn test_aggregate_preserves_analyzer_order() {
        let mut stance = MetricReport::new();
        stance.push_error(error(FormErrorCategory::Stance, "stance"));
        let mut draw = MetricReport::new();
        draw.push_error(error(FormErrorCategory::Draw, "draw"));
        draw.push_error(error(FormErrorCategory::Shoulder, "shoulder"));
        let anchor = MetricReport::new();
        let mut release = MetricReport::new();
        release.push_error(error(FormErrorCategory::Release, "release"));

        let analysis = aggregate(segment_phases(8).to_vec(), stance, draw, anchor, release);

        let messages: Vec<&str> = analysis.errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["stance", "draw", "shoulder", "release"]);
        assert_eq!(analysis.overall_score, 40);
        assert_eq!(
            analysis.recommendations,
            [
                FormErrorCategory::Stance,
                FormErrorCategory::Draw,
                FormErrorCategory::Shoulder,
                FormErrorCategory::Release,
            ]
            .into_iter()
            .filter_map(advice)
            .collect::<Vec<_>>()
        );
        assert_eq!(analysis.phases.len(), 4);
    }

    #[test]
    fn test_detection_error_has_no_advice() {
        let mut stance = MetricReport::new();
        stance.push_error(error(FormErrorCategory::Detection, "Incomplete pose detection"));

        let analysis = aggregate(
            segment_phases(8).to_vec(),
            stance,
            MetricReport::new(),
            MetricReport::new(),
            MetricReport::new(),
        );
        assert_eq!(analysis.errors.len(), 1);
        assert_eq!(analysis.overall_score, 85);
        assert_eq!(analysis.recommendations, vec![POSITIVE_RECOMMENDATION]);
    }

    #[test]
    fn test_detection_error_alongside_advisable_errors() {
        let errors = vec![
            error(FormErrorCategory::Detection, "Incomplete pose detection"),
            error(FormErrorCategory::Draw, "Insufficient frames for draw analysis"),
        ];
        assert_eq!(
            recommendations(&errors),
            vec!["Focus on slow, controlled draw with consistent back tension"]
        );
    }

    #[test]
    fn test_aggregate_clean_shot() {
        let analysis = aggregate(
            segment_phases(40).to_vec(),
            MetricReport::new(),
            MetricReport::new(),
            MetricReport::new(),
            MetricReport::new(),
        );
        assert!(analysis.errors.is_empty());
        assert_eq!(analysis.overall_score, 100);
        assert_eq!(analysis.recommendations, vec![POSITIVE_RECOMMENDATION]);
    }
}
