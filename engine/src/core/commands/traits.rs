//! Command Trait Definition
//!
//! Defines the trait that all edit commands implement.

use serde::{Deserialize, Serialize};

use crate::core::{timeline::Timeline, CoreResult, OpId, TimeSec};

/// Command execution result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult {
    /// Generated Operation ID
    pub op_id: OpId,

    /// List of state changes
    pub changes: Vec<StateChange>,

    /// Newly created IDs (clips, tracks)
    pub created_ids: Vec<String>,

    /// Deleted IDs
    pub deleted_ids: Vec<String>,
}

impl CommandResult {
    /// Creates a new empty command result with the given operation ID
    pub fn new(op_id: &str) -> Self {
        Self {
            op_id: op_id.to_string(),
            changes: vec![],
            created_ids: vec![],
            deleted_ids: vec![],
        }
    }

    pub fn with_change(mut self, change: StateChange) -> Self {
        self.changes.push(change);
        self
    }

    pub fn with_created_id(mut self, id: &str) -> Self {
        self.created_ids.push(id.to_string());
        self
    }

    pub fn with_deleted_id(mut self, id: &str) -> Self {
        self.deleted_ids.push(id.to_string());
        self
    }

    /// True when the command left the timeline untouched
    pub fn is_noop(&self) -> bool {
        self.changes.is_empty()
    }
}

/// State change types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum StateChange {
    ClipCreated { clip_id: String },
    ClipModified { clip_id: String },
    ClipDeleted { clip_id: String },
    TrackCreated { track_id: String },
    PlayheadMoved { time_sec: TimeSec },
    ViewportChanged { zoom: f64, scroll_offset: TimeSec },
    SelectionChanged { count: usize },
}

/// Trait that all edit commands implement
///
/// # Core Principles
/// - Timeline mutations requested by scripts or the host go through Commands.
/// - On failure the timeline must remain unchanged.
/// - Commands must be serializable (for the operation log).
pub trait Command: Send + Sync {
    /// Execute the command
    ///
    /// Uses &mut self so commands can remember the ids they created.
    fn execute(&mut self, timeline: &mut Timeline) -> CoreResult<CommandResult>;

    /// Command type name, used for logging
    fn type_name(&self) -> &'static str;

    /// JSON form stored in the operation log
    fn to_json(&self) -> serde_json::Value;
}
