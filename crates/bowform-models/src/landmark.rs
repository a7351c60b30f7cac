//! Body landmark layout and coordinates.
//!
//! The 33-point layout is the canonical BlazePose topology. Odd indices are
//! the subject's left side, even indices the right side.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of landmarks in a complete pose.
pub const POSE_LANDMARK_COUNT: usize = 33;

/// Named anatomical points of the 33-point pose layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(usize)]
pub enum PoseLandmark {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl PoseLandmark {
    /// All landmarks in index order.
    pub const ALL: [PoseLandmark; POSE_LANDMARK_COUNT] = [
        Self::Nose,
        Self::LeftEyeInner,
        Self::LeftEye,
        Self::LeftEyeOuter,
        Self::RightEyeInner,
        Self::RightEye,
        Self::RightEyeOuter,
        Self::LeftEar,
        Self::RightEar,
        Self::MouthLeft,
        Self::MouthRight,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftPinky,
        Self::RightPinky,
        Self::LeftIndex,
        Self::RightIndex,
        Self::LeftThumb,
        Self::RightThumb,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
        Self::LeftHeel,
        Self::RightHeel,
        Self::LeftFootIndex,
        Self::RightFootIndex,
    ];

    /// Position of this landmark in a frame's landmark list.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Look up a landmark by its canonical index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Side of the body that draws the string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum DrawHand {
    /// Right-handed archer: right elbow and wrist pull the string
    #[default]
    Right,
    /// Left-handed archer
    Left,
}

impl DrawHand {
    pub fn as_str(&self) -> &'static str {
        match self {
            DrawHand::Right => "right",
            DrawHand::Left => "left",
        }
    }

    /// Elbow of the drawing arm.
    pub fn elbow(&self) -> PoseLandmark {
        match self {
            DrawHand::Right => PoseLandmark::RightElbow,
            DrawHand::Left => PoseLandmark::LeftElbow,
        }
    }

    /// Wrist of the drawing arm.
    pub fn wrist(&self) -> PoseLandmark {
        match self {
            DrawHand::Right => PoseLandmark::RightWrist,
            DrawHand::Left => PoseLandmark::LeftWrist,
        }
    }
}

impl fmt::Display for DrawHand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown draw hand '{0}' (expected 'right' or 'left')")]
pub struct ParseDrawHandError(String);

impl FromStr for DrawHand {
    type Err = ParseDrawHandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "right" | "r" => Ok(DrawHand::Right),
            "left" | "l" => Ok(DrawHand::Left),
            _ => Err(ParseDrawHandError(s.to_string())),
        }
    }
}

/// A normalized image-space landmark.
///
/// `x` and `y` are in [0, 1] relative to frame width/height (origin top-left,
/// y grows downward). `z` is depth relative to the hips, roughly in the same
/// scale as `x`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Confidence that the point is visible and correctly placed (0.0-1.0)
    pub visibility: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64, z: f64, visibility: f64) -> Self {
        Self { x, y, z, visibility }
    }

    /// Fully visible landmark on the image plane.
    pub fn at(x: f64, y: f64) -> Self {
        Self::new(x, y, 0.0, 1.0)
    }

    /// Euclidean distance to another landmark in the image plane.
    pub fn distance_2d(&self, other: &Landmark) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A 3-D landmark in metric world space, origin at the hip center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WorldLandmark {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl WorldLandmark {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}
