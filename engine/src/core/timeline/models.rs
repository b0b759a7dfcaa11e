//! Timeline Model Definitions
//!
//! Defines Track, Clip and the media kind shared between them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{new_id, ClipId, Color, CoreError, CoreResult, TimeRange, TimeSec, TrackId};

// =============================================================================
// Media Kind
// =============================================================================

/// Kind of media carried by a clip, and accepted by a track
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MediaKind {
    Video,
    Audio,
    Text,
}

impl MediaKind {
    pub const ALL: [MediaKind; 3] = [MediaKind::Video, MediaKind::Audio, MediaKind::Text];

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
            MediaKind::Text => "text",
        }
    }

    /// Color used for clips of this kind when none is given
    pub fn default_color(&self) -> Color {
        match self {
            MediaKind::Video => Color::from_hex("#3b82f6"),
            MediaKind::Audio => Color::from_hex("#10b981"),
            MediaKind::Text => Color::from_hex("#a855f7"),
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Clip
// =============================================================================

/// Clip (media, audio or text segment placed on a track)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    pub id: ClipId,
    pub kind: MediaKind,
    /// Start time on timeline (seconds)
    pub start_time: TimeSec,
    /// Duration on timeline (seconds), always > 0 once placed
    pub duration: TimeSec,
    /// Display name
    pub label: String,
    /// Optional color override for UI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    /// Text content for text clips (titles, subtitles)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Clip {
    /// Creates a new clip with a fresh id
    pub fn new(kind: MediaKind, label: &str, start_time: TimeSec, duration: TimeSec) -> Self {
        Self {
            id: new_id(),
            kind,
            start_time,
            duration,
            label: label.to_string(),
            color: None,
            text: None,
        }
    }

    pub fn new_video(label: &str, start_time: TimeSec, duration: TimeSec) -> Self {
        Self::new(MediaKind::Video, label, start_time, duration)
    }

    pub fn new_audio(label: &str, start_time: TimeSec, duration: TimeSec) -> Self {
        Self::new(MediaKind::Audio, label, start_time, duration)
    }

    pub fn new_text(label: &str, start_time: TimeSec, duration: TimeSec) -> Self {
        Self::new(MediaKind::Text, label, start_time, duration)
    }

    /// Places the clip at a specific timeline position
    pub fn place_at(mut self, start_time: TimeSec) -> Self {
        self.start_time = start_time;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Color to draw the clip with
    pub fn display_color(&self) -> Color {
        self.color.clone().unwrap_or_else(|| self.kind.default_color())
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    /// Returns the timeline end position
    pub fn end_time(&self) -> TimeSec {
        self.start_time + self.duration
    }

    /// Returns the half-open interval covered on the timeline
    pub fn range(&self) -> TimeRange {
        TimeRange {
            start_sec: self.start_time,
            end_sec: self.end_time(),
        }
    }

    /// Checks the placement invariants: finite, `start >= 0`, `duration > 0`, `end > start`
    pub fn validate(&self) -> CoreResult<()> {
        if !self.start_time.is_finite() || self.start_time < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "clip {} start time must be finite and non-negative, got {}",
                self.id, self.start_time
            )));
        }
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "clip {} duration must be finite and > 0, got {}",
                self.id, self.duration
            )));
        }
        let end = self.end_time();
        if !end.is_finite() || end <= self.start_time {
            return Err(CoreError::ValidationError(format!(
                "clip {} end time must be finite and after its start, got {}",
                self.id, end
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Track
// =============================================================================

/// Track (ordered lane of same-kind, non-overlapping clips)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: TrackId,
    pub kind: MediaKind,
    pub name: String,
    /// Clips ordered by start time. Mutated only through the timeline model.
    #[serde(default)]
    pub(crate) clips: Vec<Clip>,
}

impl Track {
    /// Creates a new track with the given name and kind
    pub fn new(name: &str, kind: MediaKind) -> Self {
        Self {
            id: new_id(),
            kind,
            name: name.to_string(),
            clips: vec![],
        }
    }

    pub fn new_video(name: &str) -> Self {
        Self::new(name, MediaKind::Video)
    }

    pub fn new_audio(name: &str) -> Self {
        Self::new(name, MediaKind::Audio)
    }

    pub fn new_text(name: &str) -> Self {
        Self::new(name, MediaKind::Text)
    }

    /// Clips in start-time order
    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    /// Gets a clip by ID
    pub fn get_clip(&self, clip_id: &str) -> Option<&Clip> {
        self.clips.iter().find(|c| c.id == clip_id)
    }

    pub(crate) fn get_clip_mut(&mut self, clip_id: &str) -> Option<&mut Clip> {
        self.clips.iter_mut().find(|c| c.id == clip_id)
    }

    pub(crate) fn position_of(&self, clip_id: &str) -> Option<usize> {
        self.clips.iter().position(|c| c.id == clip_id)
    }

    /// Returns the clip covering `time`, if any
    pub fn clip_at(&self, time: TimeSec) -> Option<&Clip> {
        self.clips
            .iter()
            .find(|c| time >= c.start_time && time < c.end_time())
    }

    /// Checks that a clip of `kind` may be placed on this track
    pub fn check_kind(&self, kind: MediaKind) -> CoreResult<()> {
        if kind != self.kind {
            return Err(CoreError::IncompatibleKind {
                clip_kind: kind,
                track_kind: self.kind,
            });
        }
        Ok(())
    }

    /// Finds a clip whose interval intersects `candidate`, skipping `ignore_clip_id`
    pub fn find_overlap(
        &self,
        candidate: &TimeRange,
        ignore_clip_id: Option<&str>,
    ) -> Option<&Clip> {
        self.clips.iter().find(|existing| {
            if ignore_clip_id.is_some_and(|id| id == existing.id) {
                return false;
            }
            existing.range().overlaps(candidate)
        })
    }

    pub(crate) fn check_no_overlap(
        &self,
        candidate: &TimeRange,
        ignore_clip_id: Option<&str>,
    ) -> CoreResult<()> {
        if let Some(conflict) = self.find_overlap(candidate, ignore_clip_id) {
            return Err(CoreError::ClipOverlap {
                track_id: self.id.clone(),
                existing_clip_id: conflict.id.clone(),
                new_start: candidate.start_sec,
                new_end: candidate.end_sec,
            });
        }
        Ok(())
    }

    /// Inserts keeping clips ordered by start time
    pub(crate) fn insert_sorted(&mut self, clip: Clip) {
        let idx = self
            .clips
            .partition_point(|existing| existing.start_time.total_cmp(&clip.start_time).is_le());
        self.clips.insert(idx, clip);
    }

    pub(crate) fn remove_clip(&mut self, clip_id: &str) -> Option<Clip> {
        self.position_of(clip_id).map(|pos| self.clips.remove(pos))
    }

    /// Returns true if no two clips intersect and the order is by start time
    pub fn is_consistent(&self) -> bool {
        self.clips
            .windows(2)
            .all(|pair| pair[0].end_time() <= pair[1].start_time)
    }
}

// =============================================================================
// Tests
// =============================================================================
