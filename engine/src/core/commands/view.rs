//! View Commands Module
//!
//! Playhead, zoom and selection. These touch only ephemeral view state.

use serde::{Deserialize, Serialize};

use crate::core::{
    commands::{Command, CommandResult, StateChange},
    new_id,
    timeline::{SelectMode, Timeline},
    ClipId, CoreResult, TimeSec,
};

// =============================================================================
// SetPlayheadCommand
// =============================================================================

/// Command to move the playhead (clamped at zero)
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPlayheadCommand {
    #[serde(alias = "time")]
    pub time_sec: TimeSec,
}

impl Command for SetPlayheadCommand {
    fn execute(&mut self, timeline: &mut Timeline) -> CoreResult<CommandResult> {
        let time_sec = timeline.set_playhead(self.time_sec);
        Ok(CommandResult::new(&new_id()).with_change(StateChange::PlayheadMoved { time_sec }))
    }

    fn type_name(&self) -> &'static str {
        "SetPlayhead"
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::json!({}))
    }
}

// =============================================================================
// SetZoomCommand
// =============================================================================

/// Command to change zoom, anchored at a time (the playhead when absent)
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetZoomCommand {
    pub zoom: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor_time: Option<TimeSec>,
}

impl Command for SetZoomCommand {
    fn execute(&mut self, timeline: &mut Timeline) -> CoreResult<CommandResult> {
        let anchor = self.anchor_time.unwrap_or_else(|| timeline.playhead());
        timeline.set_zoom(self.zoom, anchor);

        let viewport = timeline.viewport();
        Ok(
            CommandResult::new(&new_id()).with_change(StateChange::ViewportChanged {
                zoom: viewport.zoom,
                scroll_offset: viewport.scroll_offset,
            }),
        )
    }

    fn type_name(&self) -> &'static str {
        "SetZoom"
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::json!({}))
    }
}

// =============================================================================
// SelectCommand
// =============================================================================

/// Command to update the clip selection
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectCommand {
    pub clip_ids: Vec<ClipId>,
    #[serde(default = "default_select_mode")]
    pub mode: SelectMode,
}

fn default_select_mode() -> SelectMode {
    SelectMode::Replace
}

impl Command for SelectCommand {
    fn execute(&mut self, timeline: &mut Timeline) -> CoreResult<CommandResult> {
        timeline.select(self.clip_ids.iter().map(String::as_str), self.mode);
        Ok(
            CommandResult::new(&new_id()).with_change(StateChange::SelectionChanged {
                count: timeline.selection().len(),
            }),
        )
    }

    fn type_name(&self) -> &'static str {
        "Select"
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::json!({}))
    }
}
