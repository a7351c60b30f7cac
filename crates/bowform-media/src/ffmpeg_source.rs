//! FFmpeg rawvideo pipe decoder.
//!
//! Metadata comes from `ffprobe`; frames are decoded by an `ffmpeg` child
//! writing packed `rgb24` to stdout. The child is killed and reaped on drop.

use std::ffi::OsString;
use std::io::{BufReader, ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};

use image::RgbImage;
use tracing::{debug, warn};

use crate::error::{MediaError, MediaResult};
use crate::probe::probe_stream;
use crate::video::{StreamMetadata, VideoSource};

/// Arguments for decoding the first video stream of `path` to raw `rgb24`.
///
/// Display-matrix rotation is not applied, so every frame keeps the coded
/// size that `ffprobe` reports.
fn decode_args(path: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-v", "error", "-nostdin", "-noautorotate", "-i"]
        .into_iter()
        .map(OsString::from)
        .collect();
    args.push(path.as_os_str().to_os_string());
    args.extend(
        ["-map", "0:v:0", "-f", "rawvideo", "-pix_fmt", "rgb24", "-"]
            .into_iter()
            .map(OsString::from),
    );
    args
}

/// Video source backed by an `ffmpeg` child process.
pub struct FfmpegVideoSource {
    path: PathBuf,
    metadata: StreamMetadata,
    child: Child,
    stdout: BufReader<ChildStdout>,
    frame_bytes: usize,
    scratch: Vec<u8>,
}

impl FfmpegVideoSource {
    /// Probe and open `path` for sequential decoding.
    pub fn open(path: impl AsRef<Path>) -> MediaResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(MediaError::video_open(path, "file not found"));
        }

        which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)?;

        let metadata = probe_stream(path).map_err(|e| match e {
            MediaError::FfprobeFailed { .. } | MediaError::JsonParse(_) => {
                MediaError::video_open(path, e.to_string())
            }
            other => other,
        })?;

        if metadata.width == 0 || metadata.height == 0 {
            return Err(MediaError::video_open(path, "stream has no frame dimensions"));
        }

        let mut child = Command::new("ffmpeg")
            .args(decode_args(path))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| MediaError::video_open(path, format!("failed to spawn ffmpeg: {e}")))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| MediaError::video_open(path, "ffmpeg stdout unavailable"))?;

        let frame_bytes = metadata.width as usize * metadata.height as usize * 3;

        debug!(
            path = %path.display(),
            width = metadata.width,
            height = metadata.height,
            fps = metadata.fps,
            total_frames = metadata.total_frames,
            "Opened video with ffmpeg"
        );

        Ok(Self {
            path: path.to_path_buf(),
            metadata,
            child,
            stdout: BufReader::with_capacity(frame_bytes.min(8 << 20), stdout),
            frame_bytes,
            scratch: vec![0; frame_bytes],
        })
    }

    /// Fill the scratch buffer with the next frame. `false` on clean EOF.
    fn next_frame(&mut self) -> MediaResult<bool> {
        match self.stdout.read_exact(&mut self.scratch) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => Ok(false),
            Err(e) => Err(MediaError::decode(format!(
                "{}: {e}",
                self.path.display()
            ))),
        }
    }
}

impl VideoSource for FfmpegVideoSource {
    fn metadata(&self) -> &StreamMetadata {
        &self.metadata
    }

    fn grab(&mut self) -> MediaResult<bool> {
        self.next_frame()
    }

    fn read(&mut self) -> MediaResult<Option<RgbImage>> {
        if !self.next_frame()? {
            return Ok(None);
        }
        RgbImage::from_raw(self.metadata.width, self.metadata.height, self.scratch.clone())
            .map(Some)
            .ok_or_else(|| {
                MediaError::decode(format!(
                    "frame buffer of {} bytes does not match {}x{}",
                    self.frame_bytes, self.metadata.width, self.metadata.height
                ))
            })
    }
}

impl Drop for FfmpegVideoSource {
    fn drop(&mut self) {
        if let Ok(None) = self.child.try_wait() {
            if let Err(e) = self.child.kill() {
                warn!(path = %self.path.display(), "Failed to kill ffmpeg: {}", e);
            }
        }
        let _ = self.child.wait();
    }
}
