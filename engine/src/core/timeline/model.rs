//! Timeline Model
//!
//! Owns the tracks, the playhead, the viewport and the selection. Every
//! mutation validates against a candidate first, so a failed operation leaves
//! the model exactly as it was.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{
    selection::{SelectMode, Selection},
    viewport::{Viewport, ZOOM_STEP},
    Clip, MediaKind, Track,
};
use crate::core::{
    duration_between, is_valid_time_sec, new_id, ClipId, CoreError, CoreResult, TimeRange, TimeSec,
    TrackId,
};

/// Timeline editing model
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    #[serde(default)]
    tracks: Vec<Track>,
    #[serde(default)]
    playhead_time: TimeSec,
    #[serde(default)]
    viewport: Viewport,
    #[serde(skip)]
    selection: Selection,
}

impl Timeline {
    /// Creates an empty timeline with the given viewport
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    /// Creates a timeline with the standard lanes: two video, one text, one audio
    pub fn with_default_tracks(viewport: Viewport) -> Self {
        let mut timeline = Self::new(viewport);
        for track in [
            Track::new_video("Video 1"),
            Track::new_video("Video 2"),
            Track::new_text("Text"),
            Track::new_audio("Audio 1"),
        ] {
            timeline.tracks.push(track);
        }
        timeline
    }

    /// Parses a timeline document and re-validates every placement.
    ///
    /// Clips are re-inserted one by one, so unsorted input is reordered and any
    /// kind mismatch or overlap in the document is rejected.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let raw: Timeline = serde_json::from_str(json)?;

        let mut timeline = Timeline::new(raw.viewport.normalized());
        timeline.set_playhead(raw.playhead_time);
        for mut track in raw.tracks {
            let clips = std::mem::take(&mut track.clips);
            let track_id = timeline.add_track(track)?;
            for clip in clips {
                timeline.add_clip(&track_id, clip)?;
            }
        }
        Ok(timeline)
    }

    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn get_track(&self, track_id: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == track_id)
    }

    /// Finds a clip and the track holding it
    pub fn find_clip(&self, clip_id: &str) -> Option<(&Track, &Clip)> {
        self.tracks
            .iter()
            .find_map(|track| track.get_clip(clip_id).map(|clip| (track, clip)))
    }

    pub fn contains_clip(&self, clip_id: &str) -> bool {
        self.locate(clip_id).is_some()
    }

    pub fn clips(&self) -> impl Iterator<Item = &Clip> {
        self.tracks.iter().flat_map(|t| t.clips.iter())
    }

    /// Clip on `track_id` covering `time`, if any
    pub fn clip_at(&self, track_id: &str, time: TimeSec) -> Option<&Clip> {
        self.get_track(track_id)?.clip_at(time)
    }

    /// End of the last clip on any track
    pub fn duration(&self) -> TimeSec {
        self.clips().map(Clip::end_time).fold(0.0, f64::max)
    }

    pub fn playhead(&self) -> TimeSec {
        self.playhead_time
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    fn locate(&self, clip_id: &str) -> Option<(usize, usize)> {
        self.tracks.iter().enumerate().find_map(|(t_idx, track)| {
            track.position_of(clip_id).map(|c_idx| (t_idx, c_idx))
        })
    }

    fn track_index(&self, track_id: &str) -> CoreResult<usize> {
        self.tracks
            .iter()
            .position(|t| t.id == track_id)
            .ok_or_else(|| CoreError::TrackNotFound(track_id.to_string()))
    }

    // =========================================================================
    // Tracks
    // =========================================================================

    /// Appends a track. Clips already on it are validated like `add_clip`.
    pub fn add_track(&mut self, mut track: Track) -> CoreResult<TrackId> {
        if self.get_track(&track.id).is_some() {
            return Err(CoreError::ValidationError(format!(
                "track id already in use: {}",
                track.id
            )));
        }

        let clips = std::mem::take(&mut track.clips);
        let mut candidate = self.clone();
        let track_id = track.id.clone();
        candidate.tracks.push(track);
        for clip in clips {
            candidate.add_clip(&track_id, clip)?;
        }
        *self = candidate;

        debug!("Added track {}", track_id);
        Ok(track_id)
    }

    /// Removes a track with all its clips; their ids leave the selection
    pub fn remove_track(&mut self, track_id: &str) -> Option<Track> {
        let pos = self.tracks.iter().position(|t| t.id == track_id)?;
        let track = self.tracks.remove(pos);
        for clip in &track.clips {
            self.selection.remove(&clip.id);
        }
        debug!("Removed track {} ({} clips)", track_id, track.clips.len());
        Some(track)
    }

    // =========================================================================
    // Clip Operations
    // =========================================================================

    /// Places a new clip on a track, keeping the track ordered by start time
    pub fn add_clip(&mut self, track_id: &str, clip: Clip) -> CoreResult<ClipId> {
        clip.validate()?;
        if self.contains_clip(&clip.id) {
            return Err(CoreError::ValidationError(format!(
                "clip id already in use: {}",
                clip.id
            )));
        }

        let track_idx = self.track_index(track_id)?;
        let track = &self.tracks[track_idx];
        track.check_kind(clip.kind)?;
        track.check_no_overlap(&clip.range(), None)?;

        let clip_id = clip.id.clone();
        debug!(
            "Adding clip {} to track {} at {:.3}s",
            clip_id, track_id, clip.start_time
        );
        self.tracks[track_idx].insert_sorted(clip);
        Ok(clip_id)
    }

    /// Relocates a clip, possibly to another track. Atomic: nothing changes on failure.
    pub fn move_clip(
        &mut self,
        clip_id: &str,
        new_track_id: &str,
        new_start_time: TimeSec,
    ) -> CoreResult<()> {
        if !is_valid_time_sec(new_start_time) {
            return Err(CoreError::ValidationError(format!(
                "new start time must be finite and non-negative, got {}",
                new_start_time
            )));
        }

        let (src_idx, clip_idx) = self
            .locate(clip_id)
            .ok_or_else(|| CoreError::ClipNotFound(clip_id.to_string()))?;
        let dest_idx = self.track_index(new_track_id)?;

        // Validate BEFORE mutating state.
        let (kind, duration) = {
            let clip = &self.tracks[src_idx].clips[clip_idx];
            (clip.kind, clip.duration)
        };
        let candidate = TimeRange {
            start_sec: new_start_time,
            end_sec: new_start_time + duration,
        };
        if !candidate.end_sec.is_finite() || candidate.end_sec <= candidate.start_sec {
            return Err(CoreError::ValidationError(format!(
                "clip {} would end at {} when moved to {}",
                clip_id, candidate.end_sec, new_start_time
            )));
        }
        let dest = &self.tracks[dest_idx];
        dest.check_kind(kind)?;
        dest.check_no_overlap(&candidate, Some(clip_id))?;

        let mut clip = self.tracks[src_idx].clips.remove(clip_idx);
        clip.start_time = new_start_time;
        self.tracks[dest_idx].insert_sorted(clip);

        debug!(
            "Moved clip {} to track {} at {:.3}s",
            clip_id, new_track_id, new_start_time
        );
        Ok(())
    }

    /// Splits a clip in two contiguous clips at `at_time`.
    ///
    /// Returns the ids of the left and right halves. Both get fresh ids; if the
    /// original was selected, both halves are selected instead.
    pub fn split_clip(&mut self, clip_id: &str, at_time: TimeSec) -> CoreResult<(ClipId, ClipId)> {
        let (track_idx, clip_idx) = self
            .locate(clip_id)
            .ok_or_else(|| CoreError::ClipNotFound(clip_id.to_string()))?;

        let original = &self.tracks[track_idx].clips[clip_idx];
        if !original.range().contains_strictly(at_time) {
            return Err(CoreError::InvalidSplitPoint {
                at: at_time,
                start: original.start_time,
                end: original.end_time(),
            });
        }

        let left_duration = duration_between(original.start_time, at_time);
        let right_duration = duration_between(at_time, original.end_time());
        if left_duration <= 0.0 || right_duration <= 0.0 {
            return Err(CoreError::InvalidSplitPoint {
                at: at_time,
                start: original.start_time,
                end: original.end_time(),
            });
        }

        let mut left = original.clone();
        left.id = new_id();
        left.duration = left_duration;

        let mut right = original.clone();
        right.id = new_id();
        right.start_time = at_time;
        right.duration = right_duration;

        let ids = (left.id.clone(), right.id.clone());

        let track = &mut self.tracks[track_idx];
        track.clips.remove(clip_idx);
        track.clips.insert(clip_idx, right);
        track.clips.insert(clip_idx, left);
        self.selection.replace(clip_id, &[&ids.0, &ids.1]);

        debug!(
            "Split clip {} at {:.3}s into {} and {}",
            clip_id, at_time, ids.0, ids.1
        );
        Ok(ids)
    }

    /// Splits every selected clip that the playhead lies strictly inside
    pub fn split_selected_at_playhead(&mut self) -> Vec<(ClipId, ClipId)> {
        let at = self.playhead_time;
        let targets: Vec<ClipId> = self
            .selection
            .iter()
            .filter(|id| {
                self.find_clip(id)
                    .is_some_and(|(_, clip)| clip.range().contains_strictly(at))
            })
            .cloned()
            .collect();

        targets
            .iter()
            .filter_map(|id| self.split_clip(id, at).ok())
            .collect()
    }

    /// Removes a clip from its track and from the selection. Unknown ids are a no-op.
    pub fn delete_clip(&mut self, clip_id: &str) -> Option<Clip> {
        let (track_idx, _) = self.locate(clip_id)?;
        let removed = self.tracks[track_idx].remove_clip(clip_id);
        self.selection.remove(clip_id);
        debug!("Deleted clip {}", clip_id);
        removed
    }

    /// Replaces the text content of a text clip
    pub fn set_clip_text(&mut self, clip_id: &str, text: &str) -> CoreResult<()> {
        let (track_idx, _) = self
            .locate(clip_id)
            .ok_or_else(|| CoreError::ClipNotFound(clip_id.to_string()))?;
        let clip = self.tracks[track_idx]
            .get_clip_mut(clip_id)
            .ok_or_else(|| CoreError::ClipNotFound(clip_id.to_string()))?;
        if clip.kind != MediaKind::Text {
            return Err(CoreError::ValidationError(format!(
                "clip {} is a {} clip and has no text content",
                clip_id, clip.kind
            )));
        }
        clip.text = Some(text.to_string());
        Ok(())
    }

    // =========================================================================
    // Playhead, Viewport, Selection
    // =========================================================================

    /// Moves the playhead. Negative times clamp to zero; there is no upper bound.
    pub fn set_playhead(&mut self, time: TimeSec) -> TimeSec {
        let time = if time.is_finite() {
            time.max(0.0)
        } else {
            warn!("Ignoring non-finite playhead time {}", time);
            self.playhead_time
        };
        self.playhead_time = time;
        time
    }

    /// Sets zoom (clamped to the supported range), keeping `anchor_time` on screen
    pub fn set_zoom(&mut self, new_zoom: f64, anchor_time: TimeSec) {
        self.viewport.zoom_around(new_zoom, anchor_time);
        debug!(
            "Zoom set to {:.3}px/s, scroll offset {:.3}s",
            self.viewport.zoom, self.viewport.scroll_offset
        );
    }

    /// One zoom step in, anchored at the playhead
    pub fn zoom_in(&mut self) {
        self.set_zoom(self.viewport.zoom * ZOOM_STEP, self.playhead_time);
    }

    /// One zoom step out, anchored at the playhead
    pub fn zoom_out(&mut self) {
        self.set_zoom(self.viewport.zoom / ZOOM_STEP, self.playhead_time);
    }

    pub fn set_scroll_offset(&mut self, offset: TimeSec) {
        self.viewport.set_scroll_offset(offset);
    }

    /// Updates the selection; ids of clips not in the model are ignored
    pub fn select<'a, I>(&mut self, clip_ids: I, mode: SelectMode)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let tracks = &self.tracks;
        self.selection.apply(clip_ids, mode, |id| {
            tracks.iter().any(|t| t.position_of(id).is_some())
        });
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Resets the ephemeral UI state (selection, viewport) after a project load
    pub fn reset_view_state(&mut self, viewport: Viewport) {
        self.selection.clear();
        self.viewport = viewport;
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn timeline_with_track(kind: MediaKind) -> (Timeline, TrackId) {
        let mut timeline = Timeline::default();
        let track_id = timeline.add_track(Track::new("Lane", kind)).unwrap();
        (timeline, track_id)
    }

    #[test]
    fn test_default_tracks() {
        let timeline = Timeline::with_default_tracks(Viewport::default());
        let kinds: Vec<MediaKind> = timeline.tracks().iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                MediaKind::Video,
                MediaKind::Video,
                MediaKind::Text,
                MediaKind::Audio
            ]
        );
    }

    #[test]
    fn test_add_clip_keeps_order() {
        let (mut timeline, track_id) = timeline_with_track(MediaKind::Video);
        timeline
            .add_clip(&track_id, Clip::new_video("b", 20.0, 5.0))
            .unwrap();
        timeline
            .add_clip(&track_id, Clip::new_video("a", 0.0, 10.0))
            .unwrap();

        let track = timeline.get_track(&track_id).unwrap();
        assert_eq!(track.clips()[0].label, "a");
        assert_eq!(track.clips()[1].label, "b");
        assert_eq!(timeline.duration(), 25.0);
    }

    #[test]
    fn test_clip_at_uses_half_open_ranges() {
        let (mut timeline, track_id) = timeline_with_track(MediaKind::Video);
        let a = timeline
            .add_clip(&track_id, Clip::new_video("a", 0.0, 10.0))
            .unwrap();
        let b = timeline
            .add_clip(&track_id, Clip::new_video("b", 10.0, 5.0))
            .unwrap();

        let id_at = |time: f64| timeline.clip_at(&track_id, time).map(|c| c.id.clone());
        assert_eq!(id_at(9.99), Some(a));
        assert_eq!(id_at(10.0), Some(b));
        assert!(timeline.clip_at(&track_id, 15.0).is_none());
        assert!(timeline.clip_at("ghost", 1.0).is_none());
    }

    #[test]
    fn test_add_overlapping_clip_fails_unchanged() {
        let (mut timeline, track_id) = timeline_with_track(MediaKind::Video);
        timeline
            .add_clip(&track_id, Clip::new_video("first", 0.0, 10.0))
            .unwrap();
        let before = timeline.clone();

        let result = timeline.add_clip(&track_id, Clip::new_video("second", 5.0, 10.0));

        assert!(matches!(result, Err(CoreError::ClipOverlap { .. })));
        assert_eq!(timeline, before);
    }

    #[test]
    fn test_add_touching_clip_is_allowed() {
        let (mut timeline, track_id) = timeline_with_track(MediaKind::Video);
        timeline
            .add_clip(&track_id, Clip::new_video("first", 0.0, 10.0))
            .unwrap();
        assert!(timeline
            .add_clip(&track_id, Clip::new_video("second", 10.0, 5.0))
            .is_ok());
    }

    #[test]
    fn test_add_clip_wrong_kind() {
        let (mut timeline, track_id) = timeline_with_track(MediaKind::Audio);
        let result = timeline.add_clip(&track_id, Clip::new_video("v", 0.0, 1.0));
        assert!(matches!(result, Err(CoreError::IncompatibleKind { .. })));
    }

    #[test]
    fn test_add_clip_unknown_track() {
        let mut timeline = Timeline::default();
        let result = timeline.add_clip("missing", Clip::new_video("v", 0.0, 1.0));
        assert!(matches!(result, Err(CoreError::TrackNotFound(_))));
    }

    #[test]
    fn test_add_clip_rejects_invalid_placement() {
        let (mut timeline, track_id) = timeline_with_track(MediaKind::Video);
        assert!(matches!(
            timeline.add_clip(&track_id, Clip::new_video("neg", -1.0, 2.0)),
            Err(CoreError::ValidationError(_))
        ));
        assert!(matches!(
            timeline.add_clip(&track_id, Clip::new_video("empty", 1.0, 0.0)),
            Err(CoreError::ValidationError(_))
        ));
    }

    #[test]
    fn test_move_within_track_ignores_own_placement() {
        let (mut timeline, track_id) = timeline_with_track(MediaKind::Video);
        let clip_id = timeline
            .add_clip(&track_id, Clip::new_video("a", 0.0, 10.0))
            .unwrap();

        timeline.move_clip(&clip_id, &track_id, 5.0).unwrap();

        let (_, clip) = timeline.find_clip(&clip_id).unwrap();
        assert_eq!(clip.start_time, 5.0);
    }

    #[test]
    fn test_move_across_tracks() {
        let mut timeline = Timeline::with_default_tracks(Viewport::default());
        let v1 = timeline.tracks()[0].id.clone();
        let v2 = timeline.tracks()[1].id.clone();
        let clip_id = timeline
            .add_clip(&v1, Clip::new_video("a", 0.0, 10.0))
            .unwrap();

        timeline.move_clip(&clip_id, &v2, 30.0).unwrap();

        let (track, clip) = timeline.find_clip(&clip_id).unwrap();
        assert_eq!(track.id, v2);
        assert_eq!(clip.start_time, 30.0);
        assert!(timeline.get_track(&v1).unwrap().clips().is_empty());
    }

    #[test]
    fn test_move_to_incompatible_track_is_atomic() {
        let mut timeline = Timeline::with_default_tracks(Viewport::default());
        let video = timeline.tracks()[0].id.clone();
        let audio = timeline.tracks()[3].id.clone();
        let clip_id = timeline
            .add_clip(&video, Clip::new_video("a", 3.0, 10.0))
            .unwrap();
        let before = timeline.clone();

        let result = timeline.move_clip(&clip_id, &audio, 0.0);

        assert!(matches!(result, Err(CoreError::IncompatibleKind { .. })));
        assert_eq!(timeline, before);
        let (track, clip) = timeline.find_clip(&clip_id).unwrap();
        assert_eq!(track.id, video);
        assert_eq!(clip.start_time, 3.0);
    }

    #[test]
    fn test_move_into_overlap_is_atomic() {
        let (mut timeline, track_id) = timeline_with_track(MediaKind::Video);
        let a = timeline
            .add_clip(&track_id, Clip::new_video("a", 0.0, 10.0))
            .unwrap();
        timeline
            .add_clip(&track_id, Clip::new_video("b", 20.0, 10.0))
            .unwrap();
        let before = timeline.clone();

        assert!(matches!(
            timeline.move_clip(&a, &track_id, 15.0),
            Err(CoreError::ClipOverlap { .. })
        ));
        assert_eq!(timeline, before);
    }

    #[test]
    fn test_move_rejects_start_that_absorbs_duration() {
        let (mut timeline, track_id) = timeline_with_track(MediaKind::Video);
        let a = timeline
            .add_clip(&track_id, Clip::new_video("a", 0.0, 1.0))
            .unwrap();
        let before = timeline.clone();

        assert!(matches!(
            timeline.move_clip(&a, &track_id, 1.0e300),
            Err(CoreError::ValidationError(_))
        ));
        assert!(matches!(
            timeline.move_clip(&a, &track_id, f64::MAX),
            Err(CoreError::ValidationError(_))
        ));
        assert_eq!(timeline, before);
    }

    #[test]
    fn test_move_missing_clip_or_track() {
        let (mut timeline, track_id) = timeline_with_track(MediaKind::Video);
        let a = timeline
            .add_clip(&track_id, Clip::new_video("a", 0.0, 10.0))
            .unwrap();

        assert!(matches!(
            timeline.move_clip("ghost", &track_id, 1.0),
            Err(CoreError::ClipNotFound(_))
        ));
        assert!(matches!(
            timeline.move_clip(&a, "ghost", 1.0),
            Err(CoreError::TrackNotFound(_))
        ));
        assert!(matches!(
            timeline.move_clip(&a, &track_id, -1.0),
            Err(CoreError::ValidationError(_))
        ));
    }

    #[test]
    fn test_split_clip() {
        let (mut timeline, track_id) = timeline_with_track(MediaKind::Video);
        let clip_id = timeline
            .add_clip(&track_id, Clip::new_video("a", 0.0, 10.0))
            .unwrap();
        timeline.select([clip_id.as_str()], SelectMode::Replace);

        let (left, right) = timeline.split_clip(&clip_id, 4.0).unwrap();

        let track = timeline.get_track(&track_id).unwrap();
        assert_eq!(track.clips().len(), 2);
        let (_, l) = timeline.find_clip(&left).unwrap();
        let (_, r) = timeline.find_clip(&right).unwrap();
        assert_eq!((l.start_time, l.end_time()), (0.0, 4.0));
        assert_eq!((r.start_time, r.end_time()), (4.0, 10.0));
        assert_eq!(l.kind, MediaKind::Video);
        assert_eq!(r.kind, MediaKind::Video);
        assert_eq!(l.duration + r.duration, 10.0);
        assert!(!timeline.contains_clip(&clip_id));

        assert!(timeline.selection().contains(&left));
        assert!(timeline.selection().contains(&right));
        assert!(!timeline.selection().contains(&clip_id));
    }

    #[test]
    fn test_split_halves_never_overlap_after_rounding() {
        let (mut timeline, track_id) = timeline_with_track(MediaKind::Video);
        let clip_id = timeline
            .add_clip(&track_id, Clip::new_video("a", 0.1, 0.7))
            .unwrap();
        let original_end = timeline.find_clip(&clip_id).unwrap().1.end_time();

        let (left, right) = timeline.split_clip(&clip_id, 0.3).unwrap();

        let (_, l) = timeline.find_clip(&left).unwrap();
        let (_, r) = timeline.find_clip(&right).unwrap();
        assert!(l.end_time() <= 0.3);
        assert_eq!(r.start_time, 0.3);
        assert!(r.end_time() <= original_end);
        assert!(timeline.get_track(&track_id).unwrap().is_consistent());
    }

    #[test]
    fn test_split_out_of_range() {
        let (mut timeline, track_id) = timeline_with_track(MediaKind::Video);
        let clip_id = timeline
            .add_clip(&track_id, Clip::new_video("a", 2.0, 8.0))
            .unwrap();
        let before = timeline.clone();

        for at in [2.0, 10.0, 0.0, 11.0] {
            assert!(matches!(
                timeline.split_clip(&clip_id, at),
                Err(CoreError::InvalidSplitPoint { .. })
            ));
        }
        assert_eq!(timeline, before);
    }

    #[test]
    fn test_split_unselected_leaves_selection() {
        let (mut timeline, track_id) = timeline_with_track(MediaKind::Video);
        let clip_id = timeline
            .add_clip(&track_id, Clip::new_video("a", 0.0, 10.0))
            .unwrap();

        timeline.split_clip(&clip_id, 5.0).unwrap();
        assert!(timeline.selection().is_empty());
    }

    #[test]
    fn test_split_selected_at_playhead() {
        let (mut timeline, track_id) = timeline_with_track(MediaKind::Video);
        let a = timeline
            .add_clip(&track_id, Clip::new_video("a", 0.0, 10.0))
            .unwrap();
        let b = timeline
            .add_clip(&track_id, Clip::new_video("b", 10.0, 10.0))
            .unwrap();
        timeline.select([a.as_str(), b.as_str()], SelectMode::Replace);
        timeline.set_playhead(6.0);

        let splits = timeline.split_selected_at_playhead();

        assert_eq!(splits.len(), 1);
        assert_eq!(timeline.get_track(&track_id).unwrap().clips().len(), 3);
        assert!(timeline.selection().contains(&b));
        assert_eq!(timeline.selection().len(), 3);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let (mut timeline, track_id) = timeline_with_track(MediaKind::Audio);
        let clip_id = timeline
            .add_clip(&track_id, Clip::new_audio("a", 0.0, 60.0))
            .unwrap();
        timeline.select([clip_id.as_str()], SelectMode::Replace);

        assert!(timeline.delete_clip(&clip_id).is_some());
        let once = timeline.clone();
        assert!(timeline.delete_clip(&clip_id).is_none());

        assert_eq!(timeline, once);
        assert!(timeline.selection().is_empty());
    }

    #[test]
    fn test_remove_track_clears_selection() {
        let (mut timeline, track_id) = timeline_with_track(MediaKind::Video);
        let clip_id = timeline
            .add_clip(&track_id, Clip::new_video("a", 0.0, 10.0))
            .unwrap();
        timeline.select([clip_id.as_str()], SelectMode::Replace);

        assert!(timeline.remove_track(&track_id).is_some());
        assert!(timeline.selection().is_empty());
        assert!(timeline.remove_track(&track_id).is_none());
    }

    #[test]
    fn test_add_track_rejects_duplicate_id_and_bad_clips() {
        let (mut timeline, track_id) = timeline_with_track(MediaKind::Video);
        let mut dup = Track::new_video("Dup");
        dup.id = track_id;
        assert!(timeline.add_track(dup).is_err());

        let mut bad = Track::new_video("Bad");
        bad.clips.push(Clip::new_video("a", 0.0, 10.0));
        bad.clips.push(Clip::new_video("b", 5.0, 10.0));
        let before = timeline.clone();
        assert!(matches!(
            timeline.add_track(bad),
            Err(CoreError::ClipOverlap { .. })
        ));
        assert_eq!(timeline, before);
    }

    #[test]
    fn test_playhead_clamps_at_zero_only() {
        let mut timeline = Timeline::default();
        assert_eq!(timeline.set_playhead(-5.0), 0.0);
        assert_eq!(timeline.set_playhead(10_000.0), 10_000.0);
        assert_eq!(timeline.set_playhead(f64::NAN), 10_000.0);
    }

    #[test]
    fn test_set_zoom_is_anchored() {
        let mut timeline = Timeline::new(Viewport::new(10.0, 2.0));
        let anchor = 12.0;
        let before = timeline.viewport().time_to_pixel(anchor);

        timeline.set_zoom(25.0, anchor);

        assert_eq!(timeline.viewport().zoom, 25.0);
        assert!((timeline.viewport().time_to_pixel(anchor) - before).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_steps_anchor_on_playhead() {
        let mut timeline = Timeline::new(Viewport::new(10.0, 0.0));
        timeline.set_playhead(30.0);
        let before = timeline.viewport().time_to_pixel(30.0);

        timeline.zoom_in();
        assert!(timeline.viewport().zoom > 10.0);
        assert!((timeline.viewport().time_to_pixel(30.0) - before).abs() < 1e-9);

        timeline.zoom_out();
        assert!((timeline.viewport().zoom - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_select_ignores_unknown_ids() {
        let (mut timeline, track_id) = timeline_with_track(MediaKind::Video);
        let a = timeline
            .add_clip(&track_id, Clip::new_video("a", 0.0, 1.0))
            .unwrap();

        timeline.select([a.as_str(), "ghost"], SelectMode::Replace);
        assert_eq!(timeline.selection().len(), 1);
    }

    #[test]
    fn test_set_clip_text() {
        let mut timeline = Timeline::with_default_tracks(Viewport::default());
        let text_track = timeline.tracks()[2].id.clone();
        let video_track = timeline.tracks()[0].id.clone();
        let title = timeline
            .add_clip(&text_track, Clip::new_text("Title Overlay", 10.0, 10.0))
            .unwrap();
        let video = timeline
            .add_clip(&video_track, Clip::new_video("IMG_4901.MOV", 0.0, 45.0))
            .unwrap();

        timeline.set_clip_text(&title, "Hello").unwrap();
        assert_eq!(
            timeline.find_clip(&title).unwrap().1.text.as_deref(),
            Some("Hello")
        );
        assert!(timeline.set_clip_text(&video, "nope").is_err());
        assert!(matches!(
            timeline.set_clip_text("ghost", "nope"),
            Err(CoreError::ClipNotFound(_))
        ));
    }

    #[test]
    fn test_json_round_trip_revalidates() {
        let mut timeline = Timeline::with_default_tracks(Viewport::new(20.0, 0.0));
        let v1 = timeline.tracks()[0].id.clone();
        timeline
            .add_clip(&v1, Clip::new_video("IMG_4901.MOV", 0.0, 45.0))
            .unwrap();
        timeline.set_playhead(12.0);

        let json = timeline.to_json().unwrap();
        let parsed = Timeline::from_json(&json).unwrap();

        assert_eq!(parsed.tracks().len(), 4);
        assert_eq!(parsed.playhead(), 12.0);
        assert_eq!(parsed.viewport().zoom, 20.0);
        assert_eq!(parsed.get_track(&v1).unwrap().clips().len(), 1);
    }

    #[test]
    fn test_from_json_rejects_overlapping_document() {
        let json = r#"{
            "tracks": [{
                "id": "t1", "kind": "video", "name": "Video 1",
                "clips": [
                    {"id": "c1", "kind": "video", "startTime": 0.0, "duration": 10.0, "label": "a"},
                    {"id": "c2", "kind": "video", "startTime": 5.0, "duration": 10.0, "label": "b"}
                ]
            }]
        }"#;
        assert!(matches!(
            Timeline::from_json(json),
            Err(CoreError::ClipOverlap { .. })
        ));
    }
}
