//! Export Manifest
//!
//! Flattened description of the timeline handed to the external encoding job.
//! The core never encodes anything itself.

use serde::{Deserialize, Serialize};

use crate::core::{
    settings::ExportSettings,
    timeline::{Clip, MediaKind, Timeline, Track},
    ClipId, CoreResult, TimeSec, TrackId,
};

/// One clip as the encoder sees it
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestClip {
    pub id: ClipId,
    pub kind: MediaKind,
    pub label: String,
    pub start_sec: TimeSec,
    pub end_sec: TimeSec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl From<&Clip> for ManifestClip {
    fn from(clip: &Clip) -> Self {
        Self {
            id: clip.id.clone(),
            kind: clip.kind,
            label: clip.label.clone(),
            start_sec: clip.start_time,
            end_sec: clip.end_time(),
            text: clip.text.clone(),
        }
    }
}

/// One lane, clips in timeline order
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestTrack {
    pub id: TrackId,
    pub name: String,
    pub kind: MediaKind,
    pub clips: Vec<ManifestClip>,
}

impl From<&Track> for ManifestTrack {
    fn from(track: &Track) -> Self {
        Self {
            id: track.id.clone(),
            name: track.name.clone(),
            kind: track.kind,
            clips: track.clips().iter().map(ManifestClip::from).collect(),
        }
    }
}

/// Export manifest
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportManifest {
    /// Container format, e.g. "mp4"
    pub format: String,
    pub video_codec: String,
    /// End of the last clip
    pub duration_sec: TimeSec,
    pub tracks: Vec<ManifestTrack>,
    /// RFC 3339 creation time
    pub generated_at: String,
}

impl ExportManifest {
    pub fn from_timeline(timeline: &Timeline, settings: &ExportSettings) -> Self {
        Self {
            format: settings.default_format.clone(),
            video_codec: settings.default_video_codec.clone(),
            duration_sec: timeline.duration(),
            tracks: timeline.tracks().iter().map(ManifestTrack::from).collect(),
            generated_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn clip_count(&self) -> usize {
        self.tracks.iter().map(|t| t.clips.len()).sum()
    }

    /// Nothing to render
    pub fn is_empty(&self) -> bool {
        self.clip_count() == 0
    }

    pub fn to_json_pretty(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
