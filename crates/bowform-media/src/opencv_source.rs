//! OpenCV `VideoCapture` decoder.

use std::path::{Path, PathBuf};

use image::RgbImage;
use opencv::core::{AlgorithmHint, Mat};
use opencv::imgproc;
use opencv::prelude::{MatTraitConst, MatTraitConstManual, VideoCaptureTrait, VideoCaptureTraitConst};
use opencv::videoio::{
    VideoCapture, CAP_ANY, CAP_PROP_FPS, CAP_PROP_FRAME_COUNT, CAP_PROP_FRAME_HEIGHT,
    CAP_PROP_FRAME_WIDTH,
};
use tracing::{debug, warn};

use crate::error::{MediaError, MediaResult};
use crate::video::{StreamMetadata, VideoSource};

/// Video source backed by an OpenCV capture. Released on drop.
pub struct OpenCvVideoSource {
    path: PathBuf,
    metadata: StreamMetadata,
    cap: VideoCapture,
    bgr: Mat,
}

impl OpenCvVideoSource {
    pub fn open(path: impl AsRef<Path>) -> MediaResult<Self> {
        let path = path.as_ref();
        let path_str = path
            .to_str()
            .ok_or_else(|| MediaError::video_open(path, "path is not valid UTF-8"))?;

        let cap = VideoCapture::from_file(path_str, CAP_ANY)
            .map_err(|e| MediaError::video_open(path, e.to_string()))?;

        if !cap.is_opened().unwrap_or(false) {
            return Err(MediaError::video_open(path, "VideoCapture could not open the file"));
        }

        let prop = |id: i32| {
            cap.get(id)
                .map_err(|e| MediaError::invalid_metadata(format!("capture property {id}: {e}")))
        };
        let metadata = StreamMetadata::from_raw(
            prop(CAP_PROP_FRAME_COUNT)?,
            prop(CAP_PROP_FPS)?,
            prop(CAP_PROP_FRAME_WIDTH)?.max(0.0) as u32,
            prop(CAP_PROP_FRAME_HEIGHT)?.max(0.0) as u32,
        )?;

        debug!(
            path = %path.display(),
            width = metadata.width,
            height = metadata.height,
            fps = metadata.fps,
            total_frames = metadata.total_frames,
            "Opened video with OpenCV"
        );

        Ok(Self {
            path: path.to_path_buf(),
            metadata,
            cap,
            bgr: Mat::default(),
        })
    }
}

impl VideoSource for OpenCvVideoSource {
    fn metadata(&self) -> &StreamMetadata {
        &self.metadata
    }

    fn grab(&mut self) -> MediaResult<bool> {
        self.cap
            .grab()
            .map_err(|e| MediaError::decode(format!("{}: {e}", self.path.display())))
    }

    fn read(&mut self) -> MediaResult<Option<RgbImage>> {
        let ok = self
            .cap
            .read(&mut self.bgr)
            .map_err(|e| MediaError::decode(format!("{}: {e}", self.path.display())))?;
        if !ok || self.bgr.empty() {
            return Ok(None);
        }

        let mut rgb = Mat::default();
        imgproc::cvt_color(
            &self.bgr,
            &mut rgb,
            imgproc::COLOR_BGR2RGB,
            0,
            AlgorithmHint::ALGO_HINT_DEFAULT,
        )
        .map_err(|e| MediaError::decode(format!("BGR2RGB failed: {e}")))?;

        let (width, height) = (rgb.cols() as u32, rgb.rows() as u32);
        let bytes = rgb
            .data_bytes()
            .map_err(|e| MediaError::decode(format!("Mat data: {e}")))?;

        RgbImage::from_raw(width, height, bytes.to_vec())
            .map(Some)
            .ok_or_else(|| MediaError::decode(format!("unexpected Mat layout {width}x{height}")))
    }
}

impl Drop for OpenCvVideoSource {
    fn drop(&mut self) {
        if let Err(e) = self.cap.release() {
            warn!(path = %self.path.display(), "Failed to release capture: {}", e);
        }
    }
}
