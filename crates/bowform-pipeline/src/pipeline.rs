//! Video to shot critique orchestration.
//!
//! A run moves through `Opened → Sampled → Detected → Segmented → Analyzed →
//! Aggregated → Done`. Any failing stage ends the run; no partial result is
//! returned.

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::watch;
use tracing::debug;

use bowform_analysis::{
    aggregate, segment_phases, AnchorAnalyzer, DrawAnalyzer, FormAnalyzer, ReleaseAnalyzer,
    StanceAnalyzer,
};
use bowform_media::{LandmarkExtractor, PoseEstimator, VideoSource};
use bowform_models::{AnalysisId, AnalysisResult, FrameRecord, ShotAnalysis};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::logging::RunLogger;
use crate::metrics;

/// Pipeline stages in the order a run passes through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Opened,
    Sampled,
    Detected,
    Segmented,
    Analyzed,
    Aggregated,
    Done,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Opened => "opened",
            Self::Sampled => "sampled",
            Self::Detected => "detected",
            Self::Segmented => "segmented",
            Self::Analyzed => "analyzed",
            Self::Aggregated => "aggregated",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runs landmark extraction and form analysis for one video at a time.
///
/// Holds no per-run state, so one instance can serve concurrent runs; the
/// pose estimator is shared and guards itself.
#[derive(Clone)]
pub struct Pipeline {
    estimator: Arc<dyn PoseEstimator>,
    config: PipelineConfig,
    stance: StanceAnalyzer,
    draw: DrawAnalyzer,
    anchor: AnchorAnalyzer,
    release: ReleaseAnalyzer,
}

impl Pipeline {
    pub fn new(estimator: Arc<dyn PoseEstimator>, config: PipelineConfig) -> PipelineResult<Self> {
        config.validate()?;
        Ok(Self {
            estimator,
            stance: StanceAnalyzer,
            draw: DrawAnalyzer::new(config.draw_hand),
            anchor: AnchorAnalyzer::new(config.draw_hand),
            release: ReleaseAnalyzer::new(config.draw_hand),
            config,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Open `path` with the configured backend and analyze it.
    ///
    /// Log lines carry `id`, the identifier the caller stores the result
    /// under. The video handle is released before this returns, whatever
    /// the outcome.
    pub fn run_file(
        &self,
        id: &AnalysisId,
        path: &Path,
        cancel_rx: Option<watch::Receiver<bool>>,
    ) -> PipelineResult<AnalysisResult> {
        let logger = RunLogger::new(id, "analyze_file");
        self.instrumented(&logger, &path.display().to_string(), || {
            let mut source = self.config.video_backend.open(path)?;
            logger.log_stage(
                PipelineStage::Opened,
                &format!("{} via {}", path.display(), self.config.video_backend),
            );
            self.process(source.as_mut(), cancel_rx, &logger)
        })
    }

    /// Analyze an already opened source.
    pub fn run<S>(
        &self,
        source: &mut S,
        cancel_rx: Option<watch::Receiver<bool>>,
    ) -> PipelineResult<AnalysisResult>
    where
        S: VideoSource + ?Sized,
    {
        let logger = RunLogger::new(&AnalysisId::new(), "analyze_source");
        self.instrumented(&logger, "video source", || {
            logger.log_stage(PipelineStage::Opened, "caller-provided source");
            self.process(source, cancel_rx, &logger)
        })
    }

    /// Segment, analyze and aggregate pre-extracted frames.
    ///
    /// Fails with `NoPoseData` when `frames` is empty; the analyzers are not
    /// run in that case.
    pub fn analyze_frames(&self, frames: &[FrameRecord]) -> PipelineResult<ShotAnalysis> {
        let logger = RunLogger::new(&AnalysisId::new(), "analyze_frames");
        self.analyze_logged(frames, &logger)
    }

    fn instrumented<F>(&self, logger: &RunLogger, target: &str, run: F) -> PipelineResult<AnalysisResult>
    where
        F: FnOnce() -> PipelineResult<AnalysisResult>,
    {
        let _span = logger.create_span().entered();
        let start = Instant::now();
        metrics::record_run_started();
        logger.log_start(target);

        let result = run();
        let elapsed = start.elapsed().as_secs_f64();

        match &result {
            Ok(analysis) => {
                metrics::record_run_succeeded(elapsed, analysis.analysis.overall_score);
                for error in &analysis.analysis.errors {
                    metrics::record_form_error(error.category.as_str());
                }
                logger.log_stage(PipelineStage::Done, "result assembled");
                logger.log_completion(&format!(
                    "score {} with {} form errors in {:.2}s",
                    analysis.analysis.overall_score,
                    analysis.analysis.errors.len(),
                    elapsed
                ));
            }
            Err(e) if e.is_cancelled() => {
                metrics::record_run_failed(e.kind(), elapsed);
                logger.log_warning("cancelled");
            }
            Err(e) => {
                metrics::record_run_failed(e.kind(), elapsed);
                logger.log_error(&e.to_string());
            }
        }

        result
    }

    fn process<S>(
        &self,
        source: &mut S,
        cancel_rx: Option<watch::Receiver<bool>>,
        logger: &RunLogger,
    ) -> PipelineResult<AnalysisResult>
    where
        S: VideoSource + ?Sized,
    {
        let mut extractor =
            LandmarkExtractor::new(Arc::clone(&self.estimator)).with_stride(self.config.stride);
        if let Some(rx) = cancel_rx {
            extractor = extractor.with_cancel(rx);
        }

        let stage_start = Instant::now();
        let extraction = extractor.extract(source)?;
        metrics::record_stage_duration(PipelineStage::Sampled, stage_start.elapsed().as_secs_f64());
        metrics::record_frames(
            extraction.frames_decoded,
            extraction.frames_sampled,
            extraction.frames.len() as u64,
        );
        logger.log_stage(
            PipelineStage::Sampled,
            &format!(
                "{} of {} decoded frames sampled (stride {})",
                extraction.frames_sampled,
                extraction.frames_decoded,
                extractor.stride()
            ),
        );
        logger.log_stage(
            PipelineStage::Detected,
            &format!("{} frames with a pose", extraction.frames.len()),
        );

        let analysis = self.analyze_logged(&extraction.frames, logger)?;
        let metadata = extraction.metadata;

        Ok(AnalysisResult {
            total_frames: metadata.total_frames,
            fps: metadata.fps,
            duration: metadata.duration(),
            pose_data: extraction.frames,
            analysis,
        })
    }

    fn analyze_logged(&self, frames: &[FrameRecord], logger: &RunLogger) -> PipelineResult<ShotAnalysis> {
        if frames.is_empty() {
            return Err(PipelineError::NoPoseData);
        }

        let stage_start = Instant::now();
        let phases = segment_phases(frames.len());
        logger.log_stage(
            PipelineStage::Segmented,
            &format!(
                "setup {:?}, draw {:?}, anchor {:?}, release {:?}",
                phases[0].range(),
                phases[1].range(),
                phases[2].range(),
                phases[3].range()
            ),
        );

        let analyzers: [&dyn FormAnalyzer; 4] = [&self.stance, &self.draw, &self.anchor, &self.release];
        let [stance, draw, anchor, release] = analyzers.map(|analyzer| {
            let report = analyzer.analyze(frames);
            debug!(
                analyzer = analyzer.name(),
                errors = report.errors.len(),
                "Analyzer finished"
            );
            report
        });
        logger.log_stage(PipelineStage::Analyzed, "stance, draw, anchor, release");
        metrics::record_stage_duration(PipelineStage::Analyzed, stage_start.elapsed().as_secs_f64());

        let analysis = aggregate(phases.to_vec(), stance, draw, anchor, release);
        logger.log_stage(
            PipelineStage::Aggregated,
            &format!("overall score {}", analysis.overall_score),
        );
        Ok(analysis)
    }
}
