//! BlazePose landmark model inference through ONNX Runtime.
//!
//! The model sees the whole frame letterboxed to its square input, so small
//! or distant archers lose precision compared to a detector-cropped ROI.
//!
//! Notes:
//! - Input is NHWC `[1, S, S, 3]` RGB in `[0, 1]`.
//! - Landmark output is `[1, 39 * 5]`: x, y, z in input pixels plus
//!   visibility and presence logits. Only the first 33 points are body
//!   landmarks; the rest are ROI helpers.
//! - Pose presence is a single sigmoid score.
//! - World landmarks are `[1, 39 * 3]` in meters, hip-centered.

use std::path::Path;
use std::sync::Mutex;

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::{Tensor, Value};
use tracing::{debug, info};

use bowform_models::{Landmark, WorldLandmark, POSE_LANDMARK_COUNT};

use crate::error::{MediaError, MediaResult};
use crate::pose::{PoseDetection, PoseEstimator};

/// Values per landmark in the screen-space output.
const LANDMARK_STRIDE: usize = 5;
/// Values per landmark in the world output.
const WORLD_STRIDE: usize = 3;

/// Model input and output layout.
#[derive(Debug, Clone)]
pub struct BlazePoseConfig {
    /// Square input edge in pixels
    pub input_size: u32,
    /// Minimum pose presence score for a detection to count
    pub min_presence: f32,
    pub landmarks_output: String,
    pub presence_output: String,
    pub world_output: String,
}

impl Default for BlazePoseConfig {
    fn default() -> Self {
        Self {
            input_size: 256,
            min_presence: 0.5,
            landmarks_output: "Identity".to_string(),
            presence_output: "Identity_1".to_string(),
            world_output: "Identity_4".to_string(),
        }
    }
}

impl BlazePoseConfig {
    pub fn with_min_presence(mut self, min_presence: f32) -> Self {
        self.min_presence = min_presence;
        self
    }
}

/// Placement of the source frame inside the square model input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LetterboxMapping {
    pub scaled_width: f32,
    pub scaled_height: f32,
    pub pad_x: f32,
    pub pad_y: f32,
}

impl LetterboxMapping {
    /// Map an input-pixel position back to normalized source coordinates.
    pub fn to_normalized(&self, x: f32, y: f32) -> (f32, f32) {
        (
            (x - self.pad_x) / self.scaled_width,
            (y - self.pad_y) / self.scaled_height,
        )
    }

    /// Depth is scaled like x, matching the image-width normalization of z.
    pub fn depth_to_normalized(&self, z: f32) -> f32 {
        z / self.scaled_width
    }
}

/// Scale `frame` to fit a `size`x`size` black canvas, centered.
pub fn letterbox(frame: &RgbImage, size: u32) -> (RgbImage, LetterboxMapping) {
    let (w, h) = frame.dimensions();
    let scale = size as f32 / w.max(h).max(1) as f32;
    let new_w = ((w as f32 * scale).round() as u32).clamp(1, size);
    let new_h = ((h as f32 * scale).round() as u32).clamp(1, size);

    let resized = imageops::resize(frame, new_w, new_h, FilterType::Triangle);
    let mut canvas = RgbImage::from_pixel(size, size, Rgb([0, 0, 0]));
    let pad_x = (size - new_w) / 2;
    let pad_y = (size - new_h) / 2;
    imageops::replace(&mut canvas, &resized, pad_x as i64, pad_y as i64);

    (
        canvas,
        LetterboxMapping {
            scaled_width: new_w as f32,
            scaled_height: new_h as f32,
            pad_x: pad_x as f32,
            pad_y: pad_y as f32,
        },
    )
}

#[inline]
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Decode the 33 body landmarks from the flat screen-space output.
pub fn decode_landmarks(data: &[f32], mapping: &LetterboxMapping) -> MediaResult<Vec<Landmark>> {
    if data.len() < POSE_LANDMARK_COUNT * LANDMARK_STRIDE {
        return Err(MediaError::inference_failed(format!(
            "landmark output has {} values, expected at least {}",
            data.len(),
            POSE_LANDMARK_COUNT * LANDMARK_STRIDE
        )));
    }

    Ok(data
        .chunks_exact(LANDMARK_STRIDE)
        .take(POSE_LANDMARK_COUNT)
        .map(|p| {
            let (x, y) = mapping.to_normalized(p[0], p[1]);
            Landmark::new(
                x as f64,
                y as f64,
                mapping.depth_to_normalized(p[2]) as f64,
                sigmoid(p[3]) as f64,
            )
        })
        .collect())
}

/// Decode the 33 body world landmarks, if the output is large enough.
pub fn decode_world_landmarks(data: &[f32]) -> Option<Vec<WorldLandmark>> {
    if data.len() < POSE_LANDMARK_COUNT * WORLD_STRIDE {
        return None;
    }
    Some(
        data.chunks_exact(WORLD_STRIDE)
            .take(POSE_LANDMARK_COUNT)
            .map(|p| WorldLandmark::new(p[0] as f64, p[1] as f64, p[2] as f64))
            .collect(),
    )
}

/// Convert an RGB image to a `[1, H, W, 3]` tensor in `[0, 1]`.
fn image_to_nhwc_tensor(image: &RgbImage) -> MediaResult<Value> {
    let (w, h) = image.dimensions();
    let data: Vec<f32> = image.as_raw().iter().map(|&v| v as f32 / 255.0).collect();
    let shape = vec![1usize, h as usize, w as usize, 3];
    Tensor::from_array((shape, data.into_boxed_slice()))
        .map(Value::from)
        .map_err(|e| MediaError::inference_failed(format!("ORT tensor: {e}")))
}

/// ONNX Runtime-backed BlazePose estimator.
pub struct BlazePoseEstimator {
    session: Mutex<Session>,
    config: BlazePoseConfig,
}

impl BlazePoseEstimator {
    pub fn load(model_path: &Path, config: BlazePoseConfig) -> MediaResult<Self> {
        if !model_path.is_file() {
            return Err(MediaError::model_not_found(model_path.display().to_string()));
        }

        let model_bytes = std::fs::read(model_path)
            .map_err(|e| MediaError::inference_failed(format!("ORT read model file: {e}")))?;

        let session = Session::builder()
            .map_err(|e| MediaError::inference_failed(format!("ORT session builder: {e}")))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| MediaError::inference_failed(format!("ORT opt level: {e}")))?
            .commit_from_memory(model_bytes.as_slice())
            .map_err(|e| MediaError::inference_failed(format!("ORT load model: {e}")))?;

        info!(
            model = %model_path.display(),
            input_size = config.input_size,
            min_presence = config.min_presence,
            "Loaded BlazePose model"
        );

        Ok(Self {
            session: Mutex::new(session),
            config,
        })
    }

    pub fn config(&self) -> &BlazePoseConfig {
        &self.config
    }
}

impl PoseEstimator for BlazePoseEstimator {
    fn estimate(&self, frame: &RgbImage) -> MediaResult<Option<PoseDetection>> {
        let (input, mapping) = letterbox(frame, self.config.input_size);
        let tensor = image_to_nhwc_tensor(&input)?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| MediaError::inference_failed("ORT session poisoned"))?;

        let outputs = session
            .run(ort::inputs![tensor])
            .map_err(|e| MediaError::inference_failed(format!("ORT run failed: {e}")))?;

        let extract = |name: &str| -> MediaResult<Vec<f32>> {
            let value = outputs
                .get(name)
                .ok_or_else(|| MediaError::inference_failed(format!("ORT output '{name}' missing")))?;
            let (_, data) = value
                .try_extract_tensor::<f32>()
                .map_err(|e| MediaError::inference_failed(format!("ORT extract {name}: {e}")))?;
            Ok(data.to_vec())
        };

        let presence = extract(&self.config.presence_output)?
            .first()
            .copied()
            .unwrap_or(0.0);
        if presence < self.config.min_presence {
            debug!(presence, "No pose in frame");
            return Ok(None);
        }

        let landmarks = decode_landmarks(&extract(&self.config.landmarks_output)?, &mapping)?;
        let world = extract(&self.config.world_output)
            .ok()
            .and_then(|data| decode_world_landmarks(&data));

        let detection = PoseDetection::new(landmarks);
        Ok(Some(match world {
            Some(world) => detection.with_world_landmarks(world),
            None => detection,
        }))
    }
}
