//! Interaction Controller
//!
//! Turns discrete pointer messages into Timeline Model operations and floating
//! palette moves. One gesture is active at a time; a pointer-down while a
//! gesture is in progress is ignored until the matching pointer-up.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::{
    settings::EditorSettings,
    timeline::{snap::snap_clip_start, Timeline, Track},
    tools::ToolRegistry,
    ClipId, CoreError, Pixel, Point2D, TimeSec,
};

/// Height of the time ruler above the first lane
pub const DEFAULT_RULER_HEIGHT: Pixel = 24.0;

/// Height of one track lane
pub const DEFAULT_TRACK_HEIGHT: Pixel = 64.0;

/// Default snap distance in pixels
pub const DEFAULT_SNAP_TOLERANCE_PX: Pixel = 10.0;

// =============================================================================
// Messages
// =============================================================================

/// What the pointer landed on when a gesture starts
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "clipId")]
pub enum PointerTarget {
    Clip(ClipId),
    Ruler,
    ToolbarHandle,
    Empty,
}

/// Pointer message. Timeline coordinates are relative to the lane area origin
/// (x = 0 at the left edge of the lanes, y = 0 at the top of the ruler); toolbar
/// drags use screen coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum PointerEvent {
    Down { x: Pixel, y: Pixel, target: PointerTarget },
    Move { x: Pixel, y: Pixel },
    Up { x: Pixel, y: Pixel },
    /// Wheel zoom by `factor`, anchored at the time under `x`
    Zoom { x: Pixel, factor: f64 },
}

/// Active gesture
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    DraggingClip {
        clip_id: ClipId,
        /// Time between the clip start and the grab point
        pointer_offset: TimeSec,
    },
    Scrubbing,
    DraggingPanel {
        start_pointer: Point2D,
        start_panel: Point2D,
    },
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }
}

/// Result of handling one pointer message
#[derive(Debug)]
pub enum EventOutcome {
    /// Event not applicable in the current state
    Ignored,
    GestureStarted,
    /// The model or the palette changed
    Applied,
    /// A speculative move was refused; the clip stays at its last valid place
    Rejected(CoreError),
    GestureEnded,
}

// =============================================================================
// Lane Layout
// =============================================================================

/// Vertical layout of the lanes, used to resolve the track under the pointer
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneLayout {
    pub ruler_height: Pixel,
    pub track_height: Pixel,
}

impl Default for LaneLayout {
    fn default() -> Self {
        Self {
            ruler_height: DEFAULT_RULER_HEIGHT,
            track_height: DEFAULT_TRACK_HEIGHT,
        }
    }
}

impl LaneLayout {
    /// Lane index under `y`, or `None` over the ruler or below the last lane
    pub fn track_index_at_y(&self, y: Pixel, track_count: usize) -> Option<usize> {
        if !y.is_finite() || self.track_height <= 0.0 || y < self.ruler_height {
            return None;
        }
        let index = ((y - self.ruler_height) / self.track_height).floor() as usize;
        (index < track_count).then_some(index)
    }

    pub fn track_at_y<'a>(&self, y: Pixel, timeline: &'a Timeline) -> Option<&'a Track> {
        self.track_index_at_y(y, timeline.tracks().len())
            .map(|i| &timeline.tracks()[i])
    }

    /// Top edge of a lane
    pub fn lane_top(&self, index: usize) -> Pixel {
        self.ruler_height + index as f64 * self.track_height
    }
}

// =============================================================================
// Controller
// =============================================================================

/// Gesture state machine over the timeline and the tool palette
#[derive(Clone, Debug, PartialEq)]
pub struct InteractionController {
    gesture: Gesture,
    layout: LaneLayout,
    snapping: bool,
    snap_tolerance_px: Pixel,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self {
            gesture: Gesture::Idle,
            layout: LaneLayout::default(),
            snapping: true,
            snap_tolerance_px: DEFAULT_SNAP_TOLERANCE_PX,
        }
    }
}

impl InteractionController {
    pub fn new(layout: LaneLayout) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    /// Takes snapping preferences from the editor settings
    pub fn from_settings(settings: &EditorSettings) -> Self {
        Self {
            snapping: settings.snap_enabled,
            snap_tolerance_px: settings.snap_tolerance_px,
            ..Self::default()
        }
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn layout(&self) -> &LaneLayout {
        &self.layout
    }

    pub fn snapping(&self) -> bool {
        self.snapping
    }

    pub fn set_snapping(&mut self, enabled: bool) {
        self.snapping = enabled;
        debug!("Snapping {}", if enabled { "enabled" } else { "disabled" });
    }

    pub fn set_snap_tolerance(&mut self, tolerance_px: Pixel) {
        if tolerance_px.is_finite() && tolerance_px >= 0.0 {
            self.snap_tolerance_px = tolerance_px;
        }
    }

    /// Abandons the current gesture. Committed moves stay committed.
    pub fn cancel(&mut self) {
        self.gesture = Gesture::Idle;
    }

    /// Handles one pointer message
    pub fn handle(
        &mut self,
        event: &PointerEvent,
        timeline: &mut Timeline,
        tools: &mut ToolRegistry,
    ) -> EventOutcome {
        trace!("Pointer event {:?} in {:?}", event, self.gesture);
        match event {
            PointerEvent::Down { x, y, target } => {
                self.pointer_down(*x, *y, target, timeline, tools)
            }
            PointerEvent::Move { x, y } => self.pointer_move(*x, *y, timeline, tools),
            PointerEvent::Up { .. } => {
                if self.gesture.is_idle() {
                    return EventOutcome::Ignored;
                }
                self.gesture = Gesture::Idle;
                EventOutcome::GestureEnded
            }
            PointerEvent::Zoom { x, factor } => {
                if !factor.is_finite() || *factor <= 0.0 {
                    return EventOutcome::Ignored;
                }
                let anchor = timeline.viewport().pixel_to_time(*x).max(0.0);
                let zoom = timeline.viewport().zoom * factor;
                timeline.set_zoom(zoom, anchor);
                EventOutcome::Applied
            }
        }
    }

    fn pointer_down(
        &mut self,
        x: Pixel,
        y: Pixel,
        target: &PointerTarget,
        timeline: &mut Timeline,
        tools: &ToolRegistry,
    ) -> EventOutcome {
        if !self.gesture.is_idle() {
            debug!("Ignoring pointer-down during active gesture");
            return EventOutcome::Ignored;
        }

        match target {
            PointerTarget::Clip(clip_id) => {
                let Some((_, clip)) = timeline.find_clip(clip_id) else {
                    return EventOutcome::Ignored;
                };
                let pointer_offset = timeline.viewport().pixel_to_time(x) - clip.start_time;
                self.gesture = Gesture::DraggingClip {
                    clip_id: clip_id.clone(),
                    pointer_offset,
                };
                EventOutcome::GestureStarted
            }
            PointerTarget::Ruler => {
                self.gesture = Gesture::Scrubbing;
                timeline.set_playhead(timeline.viewport().pixel_to_time(x));
                EventOutcome::GestureStarted
            }
            PointerTarget::ToolbarHandle => {
                self.gesture = Gesture::DraggingPanel {
                    start_pointer: Point2D::new(x, y),
                    start_panel: tools.toolbar_position(),
                };
                EventOutcome::GestureStarted
            }
            PointerTarget::Empty => EventOutcome::Ignored,
        }
    }

    fn pointer_move(
        &mut self,
        x: Pixel,
        y: Pixel,
        timeline: &mut Timeline,
        tools: &mut ToolRegistry,
    ) -> EventOutcome {
        match &self.gesture {
            Gesture::Idle => EventOutcome::Ignored,
            Gesture::Scrubbing => {
                timeline.set_playhead(timeline.viewport().pixel_to_time(x));
                EventOutcome::Applied
            }
            Gesture::DraggingPanel {
                start_pointer,
                start_panel,
            } => {
                let position = start_panel.translated(*start_pointer, Point2D::new(x, y));
                tools.set_toolbar_position(position);
                EventOutcome::Applied
            }
            Gesture::DraggingClip {
                clip_id,
                pointer_offset,
            } => {
                let clip_id = clip_id.clone();
                let pointer_offset = *pointer_offset;
                self.drag_clip(&clip_id, pointer_offset, x, y, timeline)
            }
        }
    }

    fn drag_clip(
        &mut self,
        clip_id: &str,
        pointer_offset: TimeSec,
        x: Pixel,
        y: Pixel,
        timeline: &mut Timeline,
    ) -> EventOutcome {
        let Some((current_track, clip)) = timeline.find_clip(clip_id) else {
            // Clip deleted mid-drag
            self.gesture = Gesture::Idle;
            return EventOutcome::GestureEnded;
        };
        let duration = clip.duration;

        let track_id = self
            .layout
            .track_at_y(y, timeline)
            .unwrap_or(current_track)
            .id
            .clone();

        let pointer_time = timeline.viewport().pixel_to_time(x);
        if !pointer_time.is_finite() {
            return EventOutcome::Ignored;
        }
        let mut start = (pointer_time - pointer_offset).max(0.0);
        if self.snapping {
            start = snap_clip_start(timeline, clip_id, start, duration, self.snap_tolerance_px);
        }

        match timeline.move_clip(clip_id, &track_id, start) {
            Ok(()) => EventOutcome::Applied,
            Err(e) => {
                trace!("Speculative move of {} refused: {}", clip_id, e);
                EventOutcome::Rejected(e)
            }
        }
    }
}
