//! Shot phases.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// One of the four temporal segments of a shot cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ShotPhase {
    Setup,
    Draw,
    Anchor,
    Release,
}

impl ShotPhase {
    /// Phases in shot order.
    pub const ALL: [ShotPhase; 4] = [
        ShotPhase::Setup,
        ShotPhase::Draw,
        ShotPhase::Anchor,
        ShotPhase::Release,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShotPhase::Setup => "setup",
            ShotPhase::Draw => "draw",
            ShotPhase::Anchor => "anchor",
            ShotPhase::Release => "release",
        }
    }
}

impl fmt::Display for ShotPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Half-open index range `[start_index, end_index)` of a phase within the
/// extracted frame sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PhaseRange {
    pub name: ShotPhase,
    pub start_index: usize,
    pub end_index: usize,
}

impl PhaseRange {
    pub fn new(name: ShotPhase, start_index: usize, end_index: usize) -> Self {
        Self {
            name,
            start_index,
            end_index,
        }
    }

    pub fn len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn range(&self) -> Range<usize> {
        self.start_index..self.end_index
    }
}
