//! Archery form analysis over extracted pose frames.
//!
//! Each analyzer is a pure function of the frame sequence it is handed. The
//! pipeline splits the sequence into shot phases and feeds the matching
//! slice to each analyzer, then [`aggregate`] folds the reports into a
//! [`ShotAnalysis`](bowform_models::ShotAnalysis).

pub mod aggregator;
pub mod anchor;
pub mod draw;
pub mod geometry;
pub mod release;
pub mod segmenter;
pub mod shoulder;
pub mod stance;

use bowform_models::{FrameRecord, MetricReport};

pub use aggregator::{advice, aggregate, overall_score, recommendations, POSITIVE_RECOMMENDATION};
pub use anchor::AnchorAnalyzer;
pub use draw::DrawAnalyzer;
pub use release::ReleaseAnalyzer;
pub use segmenter::segment_phases;
pub use shoulder::{shoulder_consistency, ShoulderConsistency};
pub use stance::StanceAnalyzer;

/// A single form check over a slice of frames.
pub trait FormAnalyzer: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Produce the errors and metrics for the given frames.
    fn analyze(&self, frames: &[FrameRecord]) -> MetricReport;
}
