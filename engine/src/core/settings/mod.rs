//! Editor Settings
//!
//! Read-only application settings consumed by the timeline core:
//! - Schema defaults for every field (old or partial files still load)
//! - Normalization that corrects bad values instead of failing
//!
//! The core reads settings but never writes them; persistence belongs to the
//! host shell.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::core::{
    timeline::{Viewport, ZoomRange, DEFAULT_ZOOM, MAX_ZOOM, MIN_ZOOM},
    CoreResult,
};

/// Settings schema version
pub const SETTINGS_VERSION: u32 = 1;

/// Settings file name
pub const SETTINGS_FILE: &str = "settings.json";

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    /// Schema version
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub general: GeneralSettings,

    #[serde(default)]
    pub editor: EditorSettings,

    #[serde(default)]
    pub export: ExportSettings,

    #[serde(default)]
    pub auto_save: AutoSaveSettings,

    #[serde(default)]
    pub performance: PerformanceSettings,

    #[serde(default)]
    pub ai: AISettings,
}

fn default_version() -> u32 {
    SETTINGS_VERSION
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            general: GeneralSettings::default(),
            editor: EditorSettings::default(),
            export: ExportSettings::default(),
            auto_save: AutoSaveSettings::default(),
            performance: PerformanceSettings::default(),
            ai: AISettings::default(),
        }
    }
}

impl AppSettings {
    /// Parses settings JSON and normalizes it
    pub fn from_json_str(json: &str) -> CoreResult<Self> {
        let mut settings: AppSettings = serde_json::from_str(json)?;
        settings.normalize();
        Ok(settings)
    }

    /// Loads settings from disk, returning defaults if the file doesn't exist
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            info!("Settings file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Normalizes and clamps settings so the core always sees valid values.
    pub fn normalize(&mut self) {
        self.version = SETTINGS_VERSION;

        self.general.theme = normalize_enum(
            &self.general.theme,
            &["dark", "light", "auto"],
            default_theme(),
        );
        self.general.language =
            normalize_enum(&self.general.language, &["en", "bn"], default_language());

        self.editor.default_timeline_zoom =
            clamp_f64(self.editor.default_timeline_zoom, MIN_ZOOM, MAX_ZOOM);
        self.editor.snap_tolerance_px = clamp_f64(self.editor.snap_tolerance_px, 0.0, 200.0);

        self.export.default_format = normalize_enum(
            &self.export.default_format,
            &["mp4", "webm", "mov", "gif"],
            default_export_format(),
        );
        self.export.default_video_codec = normalize_enum(
            &self.export.default_video_codec,
            &["h264", "h265", "vp9", "prores"],
            default_video_codec(),
        );

        self.auto_save.interval_seconds = self.auto_save.interval_seconds.clamp(30, 3600);
        self.auto_save.backup_count = self.auto_save.backup_count.clamp(1, 20);

        self.performance.preview_quality = normalize_enum(
            &self.performance.preview_quality,
            &["360p", "720p", "1080p", "native"],
            default_preview_quality(),
        );
        // 0 means "unlimited".
        if self.performance.memory_limit_mb != 0 {
            self.performance.memory_limit_mb = self.performance.memory_limit_mb.clamp(512, 65_536);
        }
        self.performance.cache_size_mb = self.performance.cache_size_mb.clamp(128, 16_384);

        if self.ai.model.trim().is_empty() {
            warn!("Empty AI model name in settings, using default");
            self.ai.model = default_ai_model();
        }
        self.ai.request_timeout_secs = self.ai.request_timeout_secs.clamp(5, 300);
    }

    /// Initial viewport for a freshly opened project
    pub fn initial_viewport(&self) -> Viewport {
        Viewport::with_range(
            self.editor.default_timeline_zoom,
            0.0,
            ZoomRange::new(MIN_ZOOM, MAX_ZOOM),
        )
    }
}

fn clamp_f64(value: f64, min: f64, max: f64) -> f64 {
    if !value.is_finite() {
        return min;
    }
    value.clamp(min, max)
}

fn normalize_enum(value: &str, allowed: &[&str], fallback: String) -> String {
    if allowed.iter().any(|v| v.eq_ignore_ascii_case(value)) {
        value.to_ascii_lowercase()
    } else {
        fallback
    }
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeneralSettings {
    /// Theme: "dark", "light", "auto"
    #[serde(default = "default_theme")]
    pub theme: String,

    /// Language code: "en", "bn"
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            language: default_language(),
        }
    }
}

fn default_theme() -> String {
    "dark".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_true() -> bool {
    true
}

/// Timeline editor settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EditorSettings {
    /// Default timeline zoom in pixels per second
    #[serde(default = "default_zoom")]
    pub default_timeline_zoom: f64,

    /// Snap dragged clips to clip edges and the playhead
    #[serde(default = "default_true")]
    pub snap_enabled: bool,

    /// Snap tolerance in pixels
    #[serde(default = "default_snap_tolerance")]
    pub snap_tolerance_px: f64,

    #[serde(default = "default_true")]
    pub show_clip_thumbnails: bool,

    #[serde(default = "default_true")]
    pub show_audio_waveforms: bool,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            default_timeline_zoom: default_zoom(),
            snap_enabled: true,
            snap_tolerance_px: default_snap_tolerance(),
            show_clip_thumbnails: true,
            show_audio_waveforms: true,
        }
    }
}

fn default_zoom() -> f64 {
    DEFAULT_ZOOM
}

fn default_snap_tolerance() -> f64 {
    10.0
}

/// Export settings handed to the external encoder with the manifest
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportSettings {
    /// Default export format: "mp4", "webm", "mov", "gif"
    #[serde(default = "default_export_format")]
    pub default_format: String,

    /// Default video codec: "h264", "h265", "vp9", "prores"
    #[serde(default = "default_video_codec")]
    pub default_video_codec: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            default_format: default_export_format(),
            default_video_codec: default_video_codec(),
        }
    }
}

fn default_export_format() -> String {
    "mp4".to_string()
}

fn default_video_codec() -> String {
    "h264".to_string()
}

/// Auto-save settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AutoSaveSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Auto-save interval in seconds
    #[serde(default = "default_auto_save_interval")]
    pub interval_seconds: u32,

    /// Number of backup versions to keep
    #[serde(default = "default_backup_count")]
    pub backup_count: u32,
}

impl Default for AutoSaveSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_seconds: default_auto_save_interval(),
            backup_count: default_backup_count(),
        }
    }
}

fn default_auto_save_interval() -> u32 {
    60
}

fn default_backup_count() -> u32 {
    10
}

/// Performance settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSettings {
    /// Preview quality: "360p", "720p", "1080p", "native"
    #[serde(default = "default_preview_quality")]
    pub preview_quality: String,

    #[serde(default = "default_true")]
    pub hardware_acceleration: bool,

    #[serde(default = "default_true")]
    pub frame_skipping: bool,

    #[serde(default)]
    pub background_rendering: bool,

    /// Memory limit in MB (0 = unlimited)
    #[serde(default = "default_memory_limit")]
    pub memory_limit_mb: u32,

    /// Cache size in MB
    #[serde(default = "default_cache_size")]
    pub cache_size_mb: u32,
}

impl Default for PerformanceSettings {
    fn default() -> Self {
        Self {
            preview_quality: default_preview_quality(),
            hardware_acceleration: true,
            frame_skipping: true,
            background_rendering: false,
            memory_limit_mb: default_memory_limit(),
            cache_size_mb: default_cache_size(),
        }
    }
}

fn default_preview_quality() -> String {
    "720p".to_string()
}

fn default_memory_limit() -> u32 {
    4096
}

fn default_cache_size() -> u32 {
    2048
}

/// Text-generation settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AISettings {
    /// Model name passed to the text-generation service
    #[serde(default = "default_ai_model")]
    pub model: String,

    /// Seconds before an outstanding generation request is abandoned
    #[serde(default = "default_ai_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for AISettings {
    fn default() -> Self {
        Self {
            model: default_ai_model(),
            request_timeout_secs: default_ai_timeout(),
        }
    }
}

fn default_ai_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_ai_timeout() -> u64 {
    30
}
