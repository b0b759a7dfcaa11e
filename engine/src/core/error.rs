//! ReelCut Error Definitions
//!
//! Defines error types used throughout the timeline core.

use thiserror::Error;

use super::{timeline::MediaKind, ClipId, TimeSec, ToolId, TrackId};

/// Core engine error types
#[derive(Error, Debug)]
pub enum CoreError {
    // =========================================================================
    // Timeline Errors
    // =========================================================================
    #[error("Clip not found: {0}")]
    ClipNotFound(ClipId),

    #[error("Track not found: {0}")]
    TrackNotFound(TrackId),

    #[error("Incompatible kind: {clip_kind} clip cannot be placed on a {track_kind} track")]
    IncompatibleKind {
        clip_kind: MediaKind,
        track_kind: MediaKind,
    },

    #[error(
        "Clip overlap on track {track_id}: {new_start:.3}~{new_end:.3}s conflicts with clip {existing_clip_id}"
    )]
    ClipOverlap {
        track_id: TrackId,
        existing_clip_id: ClipId,
        new_start: TimeSec,
        new_end: TimeSec,
    },

    #[error("Invalid split point: {at:.3}s is not inside {start:.3}~{end:.3}s")]
    InvalidSplitPoint {
        at: TimeSec,
        start: TimeSec,
        end: TimeSec,
    },

    // =========================================================================
    // Tool Errors
    // =========================================================================
    #[error("Tool not found: {0}")]
    ToolNotFound(ToolId),

    #[error("Tool palette is full ({capacity} tools)")]
    CapacityExceeded { capacity: usize },

    #[error("Tool already on the palette: {0}")]
    AlreadyPresent(ToolId),

    // =========================================================================
    // Command Errors
    // =========================================================================
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    // =========================================================================
    // AI Errors
    // =========================================================================
    #[error("AI request failed: {0}")]
    AIRequestFailed(String),

    // =========================================================================
    // General Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Core engine result type
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Whether the failure should be reported to the user when it comes from a
    /// discrete action. Drag gestures swallow every error regardless.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            CoreError::IncompatibleKind { .. }
                | CoreError::CapacityExceeded { .. }
                | CoreError::AlreadyPresent(_)
        )
    }
}
