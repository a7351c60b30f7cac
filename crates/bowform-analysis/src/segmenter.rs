//! Shot phase segmentation.

use bowform_models::{PhaseRange, ShotPhase};

/// Split `frame_count` frames into setup, draw, anchor and release.
///
/// Boundaries are integer quarters (`0, n/4, n/2, 3n/4, n`); the release
/// phase absorbs any remainder. An empty sequence yields four empty ranges.
pub fn segment_phases(frame_count: usize) -> [PhaseRange; 4] {
    let bounds = [
        0,
        frame_count / 4,
        frame_count / 2,
        3 * frame_count / 4,
        frame_count,
    ];

    let mut phases = [PhaseRange::new(ShotPhase::Setup, 0, 0); 4];
    for (i, phase) in ShotPhase::ALL.iter().enumerate() {
        phases[i] = PhaseRange::new(*phase, bounds[i], bounds[i + 1]);
    }
    phases
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_for_any_length() {
        for n in 0..=101 {
            let phases = segment_phases(n);
            assert_eq!(phases[0].start_index, 0);
            assert_eq!(phases[3].end_index, n);
            for pair in phases.windows(2) {
                assert_eq!(pair[0].end_index, pair[1].start_index, "gap at n={n}");
            }
            let total: usize = phases.iter().map(|p| p.len()).sum();
            assert_eq!(total, n);
            let names: Vec<_> = phases.iter().map(|p| p.name).collect();
            assert_eq!(names, ShotPhase::ALL.to_vec());
        }
    }

    #[test]
    fn test_empty_sequence() {
        let phases = segment_phases(0);
        assert!(phases.iter().all(|p| p.is_empty()));
    }

    #[test]
    fn test_release_absorbs_remainder() {
        let phases = segment_phases(10);
        assert_eq!(phases[0].range(), 0..2);
        assert_eq!(phases[1].range(), 2..5);
        assert_eq!(phases[2].range(), 5..7);
        assert_eq!(phases[3].range(), 7..10);
    }
}
