//! FFprobe stream metadata.

use serde::Deserialize;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{MediaError, MediaResult};
use crate::video::StreamMetadata;

/// FFprobe JSON output format.
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    format: Option<FfprobeFormat>,
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: String,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
    nb_frames: Option<String>,
    duration: Option<String>,
}

/// Probe a video file for frame rate, frame count and dimensions.
pub fn probe_stream(path: impl AsRef<Path>) -> MediaResult<StreamMetadata> {
    let path = path.as_ref();

    // Check FFprobe exists
    which::which("ffprobe").map_err(|_| MediaError::FfprobeNotFound)?;

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
            "-select_streams",
            "v:0",
        ])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()?;

    if !output.status.success() {
        return Err(MediaError::FfprobeFailed {
            message: "FFprobe failed".to_string(),
            stderr: Some(String::from_utf8_lossy(&output.stderr).to_string()),
        });
    }

    parse_probe_output(&output.stdout)
}

/// Build stream metadata from ffprobe's JSON report.
///
/// Containers that do not record `nb_frames` get a frame count estimated from
/// the stream (or container) duration.
pub fn parse_probe_output(json: &[u8]) -> MediaResult<StreamMetadata> {
    let probe: FfprobeOutput = serde_json::from_slice(json)?;

    let stream = probe
        .streams
        .iter()
        .find(|s| s.codec_type == "video")
        .ok_or_else(|| MediaError::FfprobeFailed {
            message: "No video stream found".to_string(),
            stderr: None,
        })?;

    let fps = stream
        .avg_frame_rate
        .as_deref()
        .and_then(parse_frame_rate)
        .filter(|fps| *fps > 0.0)
        .or_else(|| stream.r_frame_rate.as_deref().and_then(parse_frame_rate))
        .unwrap_or(0.0);

    let total_frames = match stream.nb_frames.as_deref().and_then(|n| n.parse::<f64>().ok()) {
        Some(frames) => frames,
        None => {
            let duration = stream
                .duration
                .as_deref()
                .or(probe.format.as_ref().and_then(|f| f.duration.as_deref()))
                .and_then(|d| d.parse::<f64>().ok())
                .unwrap_or(0.0);
            (duration * fps).round()
        }
    };

    StreamMetadata::from_raw(
        total_frames,
        fps,
        stream.width.unwrap_or(0),
        stream.height.unwrap_or(0),
    )
}

/// Parse frame rate string (e.g., "30/1" or "29.97").
pub fn parse_frame_rate(s: &str) -> Option<f64> {
    if let Some((num, den)) = s.split_once('/') {
        let num: f64 = num.parse().ok()?;
        let den: f64 = den.parse().ok()?;
        if den > 0.0 {
            return Some(num / den);
        }
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frame_rate() {
        assert!((parse_frame_rate("30/1").unwrap() - 30.0).abs() < 0.01);
        assert!((parse_frame_rate("30000/1001").unwrap() - 29.97).abs() < 0.01);
        assert!((parse_frame_rate("29.97").unwrap() - 29.97).abs() < 0.01);
        assert_eq!(parse_frame_rate("0/0"), None);
        assert_eq!(parse_frame_rate("abc"), None);
    }

    #[test]
    fn test_parse_probe_output() {
        let json = br#"{
            "streams": [
                {"codec_type": "video", "width": 1920, "height": 1080,
                 "r_frame_rate": "30/1", "avg_frame_rate": "30/1", "nb_frames": "300"}
            ],
            "format": {"duration": "10.000000"}
        }"#;
        let meta = parse_probe_output(json).unwrap();
        assert_eq!(meta.total_frames, 300);
        assert_eq!(meta.width, 1920);
        assert!((meta.fps - 30.0).abs() < 1e-9);
        assert!((meta.duration() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotated_stream_reports_coded_size() {
        // Phone portrait clip: coded landscape with a -90 display matrix
        let json = br#"{
            "streams": [
                {"codec_type": "video", "width": 1920, "height": 1080,
                 "avg_frame_rate": "30/1", "nb_frames": "60",
                 "side_data_list": [{"side_data_type": "Display Matrix", "rotation": -90}]}
            ]
        }"#;
        let meta = parse_probe_output(json).unwrap();
        assert_eq!((meta.width, meta.height), (1920, 1080));
    }

    #[test]
    fn test_frame_count_estimated_from_duration() {
        let json = br#"{
            "streams": [
                {"codec_type": "video", "width": 640, "height": 480,
                 "avg_frame_rate": "25/1", "duration": "4.0"}
            ]
        }"#;
        assert_eq!(parse_probe_output(json).unwrap().total_frames, 100);
    }

    #[test]
    fn test_zero_frame_rate_is_invalid() {
        let json = br#"{
            "streams": [
                {"codec_type": "video", "width": 640, "height": 480,
                 "avg_frame_rate": "0/0", "r_frame_rate": "0/0", "nb_frames": "10"}
            ]
        }"#;
        assert!(matches!(
            parse_probe_output(json),
            Err(MediaError::InvalidStreamMetadata(_))
        ));
    }

    #[test]
    fn test_audio_only_has_no_video_stream() {
        let json = br#"{"streams": [{"codec_type": "audio"}]}"#;
        assert!(matches!(
            parse_probe_output(json),
            Err(MediaError::FfprobeFailed { .. })
        ));
    }
}
