//! Time-Space Mapper
//!
//! Converts between timeline seconds and horizontal pixel offsets.
//! Zoom is expressed in pixels per second.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::{Pixel, TimeSec};

/// Lowest supported zoom (pixels per second)
pub const MIN_ZOOM: f64 = 0.5;

/// Highest supported zoom (pixels per second)
pub const MAX_ZOOM: f64 = 400.0;

/// Zoom used when nothing else is configured
pub const DEFAULT_ZOOM: f64 = 10.0;

/// Multiplier applied by a single zoom-in / zoom-out step
pub const ZOOM_STEP: f64 = 1.25;

/// Round-trip tolerance for `pixel_to_time(time_to_pixel(t))`
pub const MAPPING_TOLERANCE: f64 = 1e-9;

/// Supported zoom interval
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZoomRange {
    pub min: f64,
    pub max: f64,
}

impl ZoomRange {
    pub fn new(min: f64, max: f64) -> Self {
        if !(min.is_finite() && max.is_finite() && min > 0.0 && min <= max) {
            warn!("Invalid zoom range {}..{}, using defaults", min, max);
            return Self::default();
        }
        Self { min, max }
    }

    /// Clamps into range; non-finite or non-positive input falls back to `min`
    pub fn clamp(&self, zoom: f64) -> f64 {
        if !zoom.is_finite() || zoom <= 0.0 {
            return self.min;
        }
        zoom.clamp(self.min, self.max)
    }
}

impl Default for ZoomRange {
    fn default() -> Self {
        Self {
            min: MIN_ZOOM,
            max: MAX_ZOOM,
        }
    }
}

/// Visible window of the timeline
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    /// Pixels per second, always inside `range`
    pub zoom: f64,
    /// Time at the leftmost visible pixel column, `>= 0`
    pub scroll_offset: TimeSec,
    #[serde(default)]
    pub range: ZoomRange,
}

impl Viewport {
    pub fn new(zoom: f64, scroll_offset: TimeSec) -> Self {
        Self::with_range(zoom, scroll_offset, ZoomRange::default())
    }

    pub fn with_range(zoom: f64, scroll_offset: TimeSec, range: ZoomRange) -> Self {
        Self {
            zoom: range.clamp(zoom),
            scroll_offset: clamp_offset(scroll_offset),
            range,
        }
    }

    /// Re-applies the range and offset clamps, e.g. after deserializing
    pub fn normalized(self) -> Self {
        let range = ZoomRange::new(self.range.min, self.range.max);
        Self::with_range(self.zoom, self.scroll_offset, range)
    }

    pub fn time_to_pixel(&self, time: TimeSec) -> Pixel {
        time_to_pixel(time, self)
    }

    pub fn pixel_to_time(&self, pixel: Pixel) -> TimeSec {
        pixel_to_time(pixel, self)
    }

    /// Converts a pixel distance into a time distance at the current zoom
    pub fn pixels_to_duration(&self, pixels: Pixel) -> TimeSec {
        pixels / self.zoom
    }

    pub fn set_scroll_offset(&mut self, offset: TimeSec) {
        self.scroll_offset = clamp_offset(offset);
    }

    /// Changes zoom keeping `anchor` at the same screen column.
    ///
    /// The offset is clamped at zero, so when zooming out near the origin the
    /// anchor drifts right instead of exposing negative time.
    pub fn zoom_around(&mut self, new_zoom: f64, anchor: TimeSec) {
        let zoom = self.range.clamp(new_zoom);
        let anchor_pixel = self.time_to_pixel(anchor);
        self.zoom = zoom;
        self.scroll_offset = clamp_offset(anchor - anchor_pixel / zoom);
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(DEFAULT_ZOOM, 0.0)
    }
}

fn clamp_offset(offset: TimeSec) -> TimeSec {
    if offset.is_finite() {
        offset.max(0.0)
    } else {
        0.0
    }
}

/// `pixel = (t - scroll_offset) * zoom`
pub fn time_to_pixel(time: TimeSec, viewport: &Viewport) -> Pixel {
    (time - viewport.scroll_offset) * viewport.zoom
}

/// Inverse of [`time_to_pixel`]
pub fn pixel_to_time(pixel: Pixel, viewport: &Viewport) -> TimeSec {
    pixel / viewport.zoom + viewport.scroll_offset
}
