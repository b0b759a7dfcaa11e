//! Asset Records
//!
//! Records supplied by the media provider to populate the library panel, and
//! the clip template built when an asset is dropped onto a track.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::{
    timeline::{Clip, MediaKind},
    CoreError, CoreResult, TimeSec,
};

/// Duration given to still images and unlabelled assets
pub const DEFAULT_STILL_DURATION_SEC: TimeSec = 5.0;

/// Asset type enumeration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssetKind {
    Video,
    Audio,
    Image,
    Text,
    Folder,
}

impl AssetKind {
    /// Media kind of the clip an asset becomes; folders never become clips
    pub fn media_kind(&self) -> Option<MediaKind> {
        match self {
            AssetKind::Video | AssetKind::Image => Some(MediaKind::Video),
            AssetKind::Audio => Some(MediaKind::Audio),
            AssetKind::Text => Some(MediaKind::Text),
            AssetKind::Folder => None,
        }
    }
}

/// Library entry from the media provider
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    pub id: String,
    #[serde(alias = "type")]
    pub kind: AssetKind,
    /// Thumbnail or preview source; absent for audio and text
    #[serde(default, alias = "src", skip_serializing_if = "Option::is_none")]
    pub display_source: Option<String>,
    /// Human-readable length, "mm:ss" or "hh:mm:ss"
    #[serde(default, alias = "duration", skip_serializing_if = "Option::is_none")]
    pub duration_label: Option<String>,
    pub name: String,
    /// Number of children, folders only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_count: Option<u32>,
}

impl AssetRecord {
    pub fn new(id: &str, kind: AssetKind, name: &str) -> Self {
        Self {
            id: id.to_string(),
            kind,
            display_source: None,
            duration_label: None,
            name: name.to_string(),
            item_count: None,
        }
    }

    pub fn with_duration_label(mut self, label: &str) -> Self {
        self.duration_label = Some(label.to_string());
        self
    }

    pub fn with_display_source(mut self, src: &str) -> Self {
        self.display_source = Some(src.to_string());
        self
    }

    /// Parsed duration, if the record carries a valid label
    pub fn duration_sec(&self) -> Option<TimeSec> {
        let label = self.duration_label.as_deref()?;
        match parse_duration_label(label) {
            Ok(d) => Some(d),
            Err(e) => {
                warn!("Asset {} has unusable duration label: {}", self.id, e);
                None
            }
        }
    }

    /// Builds the clip placed when this asset is dropped at `start_time`.
    ///
    /// Images become video clips, text assets become text clips titled with
    /// the asset name. Folders and zero-length assets yield `None`.
    pub fn clip_template(&self, start_time: TimeSec) -> Option<Clip> {
        let kind = self.kind.media_kind()?;
        let duration = self.duration_sec().unwrap_or(DEFAULT_STILL_DURATION_SEC);
        if duration <= 0.0 {
            return None;
        }
        let clip = Clip::new(kind, &self.name, start_time.max(0.0), duration);
        Some(match kind {
            MediaKind::Text => clip.with_text(&self.name),
            _ => clip,
        })
    }
}

/// Parses "mm:ss" or "hh:mm:ss" into seconds. Seconds may carry a fraction.
pub fn parse_duration_label(label: &str) -> CoreResult<TimeSec> {
    let invalid = || CoreError::ValidationError(format!("Invalid duration label: '{}'", label));

    let parts: Vec<&str> = label.trim().split(':').collect();
    let (hours, minutes, seconds) = match parts.as_slice() {
        [m, s] => ("0", *m, *s),
        [h, m, s] => (*h, *m, *s),
        _ => return Err(invalid()),
    };

    let hours: u32 = hours.parse().map_err(|_| invalid())?;
    let minutes: u32 = minutes.parse().map_err(|_| invalid())?;
    let seconds: f64 = seconds.parse().map_err(|_| invalid())?;
    if !seconds.is_finite()
        || !(0.0..60.0).contains(&seconds)
        || (parts.len() == 3 && minutes >= 60)
    {
        return Err(invalid());
    }

    Ok(hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds)
}
