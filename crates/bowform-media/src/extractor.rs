//! Per-frame landmark extraction.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use bowform_models::FrameRecord;

use crate::error::{MediaError, MediaResult};
use crate::pose::PoseEstimator;
use crate::video::{StreamMetadata, VideoSource};

/// Default number of decoded frames per pose-estimated sample.
pub const DEFAULT_STRIDE: usize = 5;

/// Frames with landmarks plus the stream facts they were read under.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub metadata: StreamMetadata,
    /// Sampled frames where a pose was found, in decode order
    pub frames: Vec<FrameRecord>,
    /// Frames decoded, sampled or not
    pub frames_decoded: u64,
    /// Frames handed to the pose estimator
    pub frames_sampled: u64,
}

/// Runs pose estimation on every `stride`-th decoded frame.
#[derive(Clone)]
pub struct LandmarkExtractor {
    estimator: Arc<dyn PoseEstimator>,
    stride: usize,
    cancel_rx: Option<watch::Receiver<bool>>,
}

impl LandmarkExtractor {
    pub fn new(estimator: Arc<dyn PoseEstimator>) -> Self {
        Self {
            estimator,
            stride: DEFAULT_STRIDE,
            cancel_rx: None,
        }
    }

    /// Set the sampling stride. Values below 1 are treated as 1.
    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride.max(1);
        self
    }

    /// Set cancellation signal, checked before each decoded frame.
    pub fn with_cancel(mut self, cancel_rx: watch::Receiver<bool>) -> Self {
        self.cancel_rx = Some(cancel_rx);
        self
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    fn is_cancelled(&self) -> bool {
        self.cancel_rx.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Decode `source` to the end, collecting landmarks from sampled frames.
    ///
    /// Decode errors end the stream early and estimator errors skip the
    /// frame; both are logged and neither fails the extraction.
    pub fn extract<S>(&self, source: &mut S) -> MediaResult<Extraction>
    where
        S: VideoSource + ?Sized,
    {
        let metadata = *source.metadata();
        metadata.validate()?;
        let stride = self.stride as u64;
        let mut frames = Vec::new();
        let mut frame_index: u64 = 0;
        let mut frames_sampled: u64 = 0;

        loop {
            if self.is_cancelled() {
                debug!(frame_index, "Extraction cancelled");
                return Err(MediaError::Cancelled);
            }

            if frame_index % stride != 0 {
                match source.grab() {
                    Ok(true) => {}
                    Ok(false) => break,
                    Err(e) => {
                        warn!(frame_index, "Stopping at undecodable frame: {}", e);
                        break;
                    }
                }
                frame_index += 1;
                continue;
            }

            let image = match source.read() {
                Ok(Some(image)) => image,
                Ok(None) => break,
                Err(e) => {
                    warn!(frame_index, "Stopping at undecodable frame: {}", e);
                    break;
                }
            };
            frames_sampled += 1;

            match self.estimator.estimate(&image) {
                Ok(Some(detection)) if !detection.landmarks.is_empty() => {
                    let mut record = FrameRecord::new(
                        frame_index,
                        metadata.timestamp_of(frame_index),
                        detection.landmarks,
                    );
                    if let Some(world) = detection.world_landmarks {
                        record = record.with_world_landmarks(world);
                    }
                    frames.push(record);
                }
                Ok(_) => {}
                Err(e) => warn!(frame_index, "Pose estimation failed, skipping frame: {}", e),
            }

            frame_index += 1;
        }

        debug!(
            frames_decoded = frame_index,
            frames_sampled,
            frames_detected = frames.len(),
            "Extraction finished"
        );

        Ok(Extraction {
            metadata,
            frames,
            frames_decoded: frame_index,
            frames_sampled,
        })
    }
}
