//! Video source abstraction.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::error::{MediaError, MediaResult};
use crate::ffmpeg_source::FfmpegVideoSource;

/// Stream-level facts read once when a video is opened.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StreamMetadata {
    /// Frame count reported by the container
    pub total_frames: u64,
    /// Frames per second, always positive and finite
    pub fps: f64,
    pub width: u32,
    pub height: u32,
}

impl StreamMetadata {
    /// Validate raw container values.
    ///
    /// Rejects a frame rate that is zero, negative or not finite, and a frame
    /// count that is negative or not finite.
    pub fn from_raw(total_frames: f64, fps: f64, width: u32, height: u32) -> MediaResult<Self> {
        if !total_frames.is_finite() || total_frames < 0.0 {
            return Err(MediaError::invalid_metadata(format!(
                "frame count must be non-negative, got {total_frames}"
            )));
        }
        let metadata = Self {
            total_frames: total_frames.round() as u64,
            fps,
            width,
            height,
        };
        metadata.validate()?;
        Ok(metadata)
    }

    /// Check that timestamps and duration can be derived from the frame rate.
    pub fn validate(&self) -> MediaResult<()> {
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(MediaError::invalid_metadata(format!(
                "frame rate must be positive, got {}",
                self.fps
            )));
        }
        Ok(())
    }

    /// `total_frames / fps` in seconds.
    pub fn duration(&self) -> f64 {
        self.total_frames as f64 / self.fps
    }

    /// Timestamp in seconds of a decoded frame index.
    pub fn timestamp_of(&self, frame_index: u64) -> f64 {
        frame_index as f64 / self.fps
    }
}

/// A decodable video stream, read front to back.
///
/// Implementations release their underlying handle when dropped.
pub trait VideoSource: Send {
    fn metadata(&self) -> &StreamMetadata;

    /// Decode the next frame and discard it. Returns `false` at end of stream.
    fn grab(&mut self) -> MediaResult<bool>;

    /// Decode the next frame as RGB. Returns `None` at end of stream.
    fn read(&mut self) -> MediaResult<Option<RgbImage>>;
}

impl<S: VideoSource + ?Sized> VideoSource for Box<S> {
    fn metadata(&self) -> &StreamMetadata {
        (**self).metadata()
    }

    fn grab(&mut self) -> MediaResult<bool> {
        (**self).grab()
    }

    fn read(&mut self) -> MediaResult<Option<RgbImage>> {
        (**self).read()
    }
}

/// Decoder used to open video files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoBackend {
    /// `ffmpeg` rawvideo pipe with `ffprobe` metadata
    #[default]
    Ffmpeg,
    /// OpenCV `VideoCapture`
    OpenCv,
}

impl VideoBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ffmpeg => "ffmpeg",
            Self::OpenCv => "opencv",
        }
    }

    /// Open `path` with this backend.
    pub fn open(&self, path: &Path) -> MediaResult<Box<dyn VideoSource>> {
        match self {
            Self::Ffmpeg => Ok(Box::new(FfmpegVideoSource::open(path)?)),
            #[cfg(feature = "opencv")]
            Self::OpenCv => Ok(Box::new(crate::opencv_source::OpenCvVideoSource::open(path)?)),
            #[cfg(not(feature = "opencv"))]
            Self::OpenCv => Err(MediaError::BackendUnavailable(
                "built without the opencv feature".to_string(),
            )),
        }
    }
}

impl fmt::Display for VideoBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VideoBackend {
    type Err = MediaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ffmpeg" => Ok(Self::Ffmpeg),
            "opencv" | "open_cv" => Ok(Self::OpenCv),
            other => Err(MediaError::BackendUnavailable(format!(
                "unknown video backend '{other}'"
            ))),
        }
    }
}
