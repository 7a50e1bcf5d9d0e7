use std::time::Duration;

use crate::error::{SpriteError, SpriteResult};

/// Playback speed in frames per second.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Speed(f64);

impl Speed {
    pub fn new(fps: f64) -> SpriteResult<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(SpriteError::validation("speed must be finite and > 0 fps"));
        }
        Ok(Self(fps))
    }

    pub fn fps(self) -> f64 {
        self.0
    }

    /// Wall-clock time one frame is held for at this speed.
    pub fn frame_interval(self) -> Duration {
        Duration::from_secs_f64(1.0 / self.0)
    }
}

impl TryFrom<f64> for Speed {
    type Error = SpriteError;

    fn try_from(fps: f64) -> SpriteResult<Self> {
        Self::new(fps)
    }
}

impl From<Speed> for f64 {
    fn from(s: Speed) -> f64 {
        s.0
    }
}

/// Axis-aligned pixel rectangle inside a sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    /// One past the rightmost column.
    pub fn right(self) -> u32 {
        self.x + self.width
    }

    /// One past the bottom row.
    pub fn bottom(self) -> u32 {
        self.y + self.height
    }
}

/// Iteration order for single-strip sheets whose orientation is ambiguous
/// from the image dimensions alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StripDirection {
    Horizontal,
    Vertical,
}
