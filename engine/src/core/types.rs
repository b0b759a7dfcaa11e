//! ReelCut Core Type Definitions
//!
//! Defines fundamental types used throughout the timeline core.

use serde::{Deserialize, Serialize};
use tracing::warn;

// =============================================================================
// ID Types
// =============================================================================

/// Clip unique identifier (ULID)
pub type ClipId = String;

/// Track unique identifier (ULID)
pub type TrackId = String;

/// Tool identifier (stable catalogue key, e.g. "split")
pub type ToolId = String;

/// Operation unique identifier (ULID)
pub type OpId = String;

/// Generates a fresh ULID string
pub fn new_id() -> String {
    ulid::Ulid::new().to_string()
}

// =============================================================================
// Time Types
// =============================================================================

/// Time in seconds (floating point)
pub type TimeSec = f64;

/// Horizontal screen offset in pixels
pub type Pixel = f64;

/// Returns true for finite, non-negative times
pub fn is_valid_time_sec(value: TimeSec) -> bool {
    value.is_finite() && value >= 0.0
}

// =============================================================================
// Spatial Types
// =============================================================================

/// 2D screen coordinates in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns this point moved by the difference between `to` and `from`
    pub fn translated(&self, from: Point2D, to: Point2D) -> Self {
        Self {
            x: self.x + (to.x - from.x),
            y: self.y + (to.y - from.y),
        }
    }
}

/// Color (RGBA)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red (0.0 ~ 1.0)
    pub r: f32,
    /// Green (0.0 ~ 1.0)
    pub g: f32,
    /// Blue (0.0 ~ 1.0)
    pub b: f32,
    /// Alpha (0.0 ~ 1.0, optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub a: Option<f32>,
}

impl Color {
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
            a: None,
        }
    }

    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    /// Parses a `#RRGGBB` or `#RGB` hex string.
    pub fn try_from_hex(hex: &str) -> Result<Self, String> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return Err(format!("Invalid hex color: {}", hex));
        }

        let expanded: String = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 => hex.to_string(),
            len => return Err(format!("Invalid hex color length: {}", len)),
        };

        let channel = |range: std::ops::Range<usize>| -> Result<f32, String> {
            u8::from_str_radix(&expanded[range], 16)
                .map(|v| v as f32 / 255.0)
                .map_err(|e| e.to_string())
        };

        Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Parses a hex color string, falling back to black on invalid input.
    pub fn from_hex(hex: &str) -> Self {
        match Self::try_from_hex(hex) {
            Ok(c) => c,
            Err(e) => {
                warn!(
                    "Failed to parse hex color '{}': {}, defaulting to black",
                    hex, e
                );
                Self::black()
            }
        }
    }

    /// Formats as `#rrggbb`; alpha is dropped
    pub fn to_hex(&self) -> String {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )
    }
}

// =============================================================================
// Time Range
// =============================================================================

/// Half-open time interval `[start, end)`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
    pub start_sec: TimeSec,
    pub end_sec: TimeSec,
}

impl TimeRange {
    pub fn new(start_sec: TimeSec, end_sec: TimeSec) -> Self {
        if start_sec > end_sec {
            warn!(
                "TimeRange created with start > end ({} > {}), swapping",
                start_sec, end_sec
            );
            return Self {
                start_sec: end_sec,
                end_sec: start_sec,
            };
        }
        Self { start_sec, end_sec }
    }

    /// Returns duration in seconds
    pub fn duration(&self) -> TimeSec {
        self.end_sec - self.start_sec
    }

    /// Checks if a time lies strictly between start and end
    pub fn contains_strictly(&self, time: TimeSec) -> bool {
        time > self.start_sec && time < self.end_sec
    }

    /// Checks if two half-open ranges intersect. Touching ranges do not.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start_sec < other.end_sec && self.end_sec > other.start_sec
    }
}

/// Largest duration `d` such that `start + d <= end` after rounding.
pub fn duration_between(start: TimeSec, end: TimeSec) -> TimeSec {
    let mut duration = end - start;
    while duration > 0.0 && start + duration > end {
        duration = step_down(duration);
    }
    duration
}

/// Largest start `s` such that `s + duration <= end` after rounding.
pub fn start_ending_by(end: TimeSec, duration: TimeSec) -> TimeSec {
    let mut start = end - duration;
    while start.is_finite() && start + duration > end {
        start = step_down(start);
    }
    start
}

/// Next representable value below `value`
fn step_down(value: f64) -> f64 {
    if value.is_nan() || value == f64::NEG_INFINITY {
        value
    } else if value == 0.0 {
        -f64::from_bits(1)
    } else if value > 0.0 {
        f64::from_bits(value.to_bits() - 1)
    } else {
        f64::from_bits(value.to_bits() + 1)
    }
}
