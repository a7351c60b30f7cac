//! Video decoding and pose landmark extraction.
//!
//! This crate provides:
//! - A `VideoSource` trait with an ffmpeg pipe backend and an optional
//!   OpenCV backend
//! - FFprobe metadata parsing
//! - The `PoseEstimator` capability and its BlazePose ONNX implementation
//! - Strided landmark extraction with cancellation

pub mod blazepose;
pub mod error;
pub mod extractor;
pub mod ffmpeg_source;
#[cfg(feature = "opencv")]
pub mod opencv_source;
pub mod pose;
pub mod probe;
pub mod video;

pub use blazepose::{BlazePoseConfig, BlazePoseEstimator};
pub use error::{MediaError, MediaResult};
pub use extractor::{Extraction, LandmarkExtractor, DEFAULT_STRIDE};
pub use ffmpeg_source::FfmpegVideoSource;
#[cfg(feature = "opencv")]
pub use opencv_source::OpenCvVideoSource;
pub use pose::{PoseDetection, PoseEstimator};
pub use probe::{parse_frame_rate, probe_stream};
pub use video::{StreamMetadata, VideoBackend, VideoSource};
