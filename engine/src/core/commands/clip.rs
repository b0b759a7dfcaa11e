//! Clip Commands Module
//!
//! Add, move, split and delete clips through the Timeline Model operations.

use serde::{Deserialize, Serialize};

use crate::core::{
    commands::{Command, CommandResult, StateChange},
    new_id,
    timeline::{Clip, MediaKind, Timeline},
    ClipId, Color, CoreError, CoreResult, TimeSec, TrackId,
};

// =============================================================================
// AddClipCommand
// =============================================================================

/// Command to place a new clip on a track
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddClipCommand {
    pub track_id: TrackId,
    pub kind: MediaKind,
    pub label: String,
    pub start_time: TimeSec,
    pub duration: TimeSec,
    /// Hex color override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Text body, for text clips
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip)]
    created_clip_id: Option<ClipId>,
}

impl AddClipCommand {
    pub fn new(
        track_id: &str,
        kind: MediaKind,
        label: &str,
        start_time: TimeSec,
        duration: TimeSec,
    ) -> Self {
        Self {
            track_id: track_id.to_string(),
            kind,
            label: label.to_string(),
            start_time,
            duration,
            color: None,
            text: None,
            created_clip_id: None,
        }
    }

    /// Places an existing clip template (e.g. built from an asset)
    pub fn from_clip(track_id: &str, clip: &Clip) -> Self {
        let mut cmd = Self::new(track_id, clip.kind, &clip.label, clip.start_time, clip.duration);
        cmd.text = clip.text.clone();
        cmd.color = clip.color.as_ref().map(Color::to_hex);
        cmd
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn with_color(mut self, hex: &str) -> Self {
        self.color = Some(hex.to_string());
        self
    }

    /// ID of the clip created by the last successful execution
    pub fn created_clip_id(&self) -> Option<&str> {
        self.created_clip_id.as_deref()
    }

    fn build_clip(&self) -> CoreResult<Clip> {
        let mut clip = Clip::new(self.kind, &self.label, self.start_time, self.duration);
        if let Some(hex) = &self.color {
            let color = Color::try_from_hex(hex).map_err(CoreError::ValidationError)?;
            clip = clip.with_color(color);
        }
        if let Some(text) = &self.text {
            if self.kind != MediaKind::Text {
                return Err(CoreError::ValidationError(format!(
                    "text body given for a {} clip",
                    self.kind
                )));
            }
            clip = clip.with_text(text);
        }
        Ok(clip)
    }
}

impl Command for AddClipCommand {
    fn execute(&mut self, timeline: &mut Timeline) -> CoreResult<CommandResult> {
        let clip = self.build_clip()?;
        let clip_id = timeline.add_clip(&self.track_id, clip)?;
        self.created_clip_id = Some(clip_id.clone());

        let op_id = new_id();
        Ok(CommandResult::new(&op_id)
            .with_change(StateChange::ClipCreated {
                clip_id: clip_id.clone(),
            })
            .with_created_id(&clip_id))
    }

    fn type_name(&self) -> &'static str {
        "AddClip"
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::json!({}))
    }
}

// =============================================================================
// MoveClipCommand
// =============================================================================

/// Command to move a clip in time, optionally onto another track
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveClipCommand {
    pub clip_id: ClipId,
    pub new_start_time: TimeSec,
    /// Destination track; the clip stays on its track when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_track_id: Option<TrackId>,
}

impl MoveClipCommand {
    pub fn new(clip_id: &str, new_start_time: TimeSec) -> Self {
        Self {
            clip_id: clip_id.to_string(),
            new_start_time,
            new_track_id: None,
        }
    }

    pub fn to_track(mut self, track_id: &str) -> Self {
        self.new_track_id = Some(track_id.to_string());
        self
    }
}

impl Command for MoveClipCommand {
    fn execute(&mut self, timeline: &mut Timeline) -> CoreResult<CommandResult> {
        let track_id = match &self.new_track_id {
            Some(id) => id.clone(),
            None => timeline
                .find_clip(&self.clip_id)
                .map(|(track, _)| track.id.clone())
                .ok_or_else(|| CoreError::ClipNotFound(self.clip_id.clone()))?,
        };
        timeline.move_clip(&self.clip_id, &track_id, self.new_start_time)?;

        let op_id = new_id();
        Ok(CommandResult::new(&op_id).with_change(StateChange::ClipModified {
            clip_id: self.clip_id.clone(),
        }))
    }

    fn type_name(&self) -> &'static str {
        "MoveClip"
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::json!({}))
    }
}

// =============================================================================
// SplitClipCommand
// =============================================================================

/// Command to split a clip in two at a timeline time
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitClipCommand {
    pub clip_id: ClipId,
    #[serde(alias = "splitTime")]
    pub at_time: TimeSec,
}

impl SplitClipCommand {
    pub fn new(clip_id: &str, at_time: TimeSec) -> Self {
        Self {
            clip_id: clip_id.to_string(),
            at_time,
        }
    }
}

impl Command for SplitClipCommand {
    fn execute(&mut self, timeline: &mut Timeline) -> CoreResult<CommandResult> {
        let (left, right) = timeline.split_clip(&self.clip_id, self.at_time)?;

        let op_id = new_id();
        Ok(CommandResult::new(&op_id)
            .with_change(StateChange::ClipDeleted {
                clip_id: self.clip_id.clone(),
            })
            .with_change(StateChange::ClipCreated {
                clip_id: left.clone(),
            })
            .with_change(StateChange::ClipCreated {
                clip_id: right.clone(),
            })
            .with_deleted_id(&self.clip_id)
            .with_created_id(&left)
            .with_created_id(&right))
    }

    fn type_name(&self) -> &'static str {
        "SplitClip"
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::json!({}))
    }
}

// =============================================================================
// DeleteClipCommand
// =============================================================================

/// Command to delete a clip. Deleting a missing clip succeeds with no changes.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteClipCommand {
    pub clip_id: ClipId,
}

impl DeleteClipCommand {
    pub fn new(clip_id: &str) -> Self {
        Self {
            clip_id: clip_id.to_string(),
        }
    }
}

impl Command for DeleteClipCommand {
    fn execute(&mut self, timeline: &mut Timeline) -> CoreResult<CommandResult> {
        let op_id = new_id();
        let mut result = CommandResult::new(&op_id);
        if timeline.delete_clip(&self.clip_id).is_some() {
            result = result
                .with_change(StateChange::ClipDeleted {
                    clip_id: self.clip_id.clone(),
                })
                .with_deleted_id(&self.clip_id);
        }
        Ok(result)
    }

    fn type_name(&self) -> &'static str {
        "DeleteClip"
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::json!({}))
    }
}

// =============================================================================
// Tests
// =============================================================================
