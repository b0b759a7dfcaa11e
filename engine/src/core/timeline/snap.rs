//! Snapping of dragged clip positions to nearby boundaries.

use super::Timeline;
use crate::core::{start_ending_by, ClipId, Pixel, TimeSec};

/// Equal-distance ties closer than this are decided by target priority
const TIE_EPSILON: TimeSec = 1e-9;

/// Category of snap target used for tie-breaking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnapTargetKind {
    /// Clip start or end edge.
    ClipEdge,
    /// Playhead position.
    Playhead,
}

impl SnapTargetKind {
    fn priority(self) -> i32 {
        match self {
            SnapTargetKind::ClipEdge => 2,
            SnapTargetKind::Playhead => 1,
        }
    }
}

/// A boundary a dragged clip may snap to
#[derive(Clone, Debug, PartialEq)]
pub struct SnapTarget {
    pub time: TimeSec,
    pub kind: SnapTargetKind,
    /// Clip id if this target comes from a clip edge.
    pub clip_id: Option<ClipId>,
}

impl SnapTarget {
    pub fn clip_edge(time: TimeSec, clip_id: &str) -> Self {
        Self {
            time,
            kind: SnapTargetKind::ClipEdge,
            clip_id: Some(clip_id.to_string()),
        }
    }

    pub fn playhead(time: TimeSec) -> Self {
        Self {
            time,
            kind: SnapTargetKind::Playhead,
            clip_id: None,
        }
    }
}

/// Result of a snap query.
#[derive(Clone, Debug, PartialEq)]
pub struct SnapMatch {
    /// Delta that should be applied to the source position.
    pub delta: TimeSec,
    /// Index into the `sources` slice that matched.
    pub source_index: usize,
    pub target: SnapTarget,
}

/// Collects every clip edge (except those of `exclude_clip_id`) and the playhead
pub fn collect_targets(timeline: &Timeline, exclude_clip_id: Option<&str>) -> Vec<SnapTarget> {
    let mut targets: Vec<SnapTarget> = timeline
        .clips()
        .filter(|clip| exclude_clip_id != Some(clip.id.as_str()))
        .flat_map(|clip| {
            [
                SnapTarget::clip_edge(clip.start_time, &clip.id),
                SnapTarget::clip_edge(clip.end_time(), &clip.id),
            ]
        })
        .collect();
    targets.push(SnapTarget::playhead(timeline.playhead()));
    targets
}

/// Finds the closest target to any source within `threshold`.
pub fn best_snap(
    sources: &[TimeSec],
    targets: &[SnapTarget],
    threshold: TimeSec,
) -> Option<SnapMatch> {
    if sources.is_empty() || targets.is_empty() || threshold.is_nan() || threshold <= 0.0 {
        return None;
    }

    let mut best: Option<SnapMatch> = None;
    let mut best_distance = f64::INFINITY;
    let mut best_priority = i32::MIN;

    for (source_index, &source) in sources.iter().enumerate() {
        for target in targets {
            let delta = target.time - source;
            let distance = delta.abs();
            if distance > threshold {
                continue;
            }
            let priority = target.kind.priority();
            let should_take = distance + TIE_EPSILON < best_distance
                || ((distance - best_distance).abs() <= TIE_EPSILON && priority > best_priority);
            if should_take {
                best_distance = distance;
                best_priority = priority;
                best = Some(SnapMatch {
                    delta,
                    source_index,
                    target: target.clone(),
                });
            }
        }
    }

    best
}

/// Snaps a dragged clip's start so its start or end lands on a nearby boundary.
///
/// `threshold_px` is converted to time with the timeline's current zoom. The
/// result is never negative.
pub fn snap_clip_start(
    timeline: &Timeline,
    clip_id: &str,
    start: TimeSec,
    duration: TimeSec,
    threshold_px: Pixel,
) -> TimeSec {
    let threshold = timeline.viewport().pixels_to_duration(threshold_px);
    let targets = collect_targets(timeline, Some(clip_id));
    match best_snap(&[start, start + duration], &targets, threshold) {
        Some(hit) if hit.source_index == 0 => hit.target.time.max(0.0),
        Some(hit) => start_ending_by(hit.target.time, duration).max(0.0),
        None => start,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::timeline::{Clip, Viewport};

    #[test]
    fn test_best_snap_prefers_closest() {
        let targets = vec![
            SnapTarget::clip_edge(10.0, "a"),
            SnapTarget::clip_edge(12.0, "b"),
        ];
        let hit = best_snap(&[11.5], &targets, 1.0).unwrap();
        assert_eq!(hit.target.time, 12.0);
        assert!((hit.delta - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_best_snap_tie_prefers_clip_edge() {
        let targets = vec![SnapTarget::playhead(9.0), SnapTarget::clip_edge(11.0, "a")];
        let hit = best_snap(&[10.0], &targets, 2.0).unwrap();
        assert_eq!(hit.target.kind, SnapTargetKind::ClipEdge);
    }

    #[test]
    fn test_best_snap_outside_threshold() {
        let targets = vec![SnapTarget::playhead(5.0)];
        assert!(best_snap(&[10.0], &targets, 1.0).is_none());
        assert!(best_snap(&[10.0], &targets, 0.0).is_none());
        assert!(best_snap(&[], &targets, 10.0).is_none());
    }

    #[test]
    fn test_snap_clip_start_to_neighbour_end() {
        let mut timeline = Timeline::with_default_tracks(Viewport::new(10.0, 0.0));
        let track_id = timeline.tracks()[0].id.clone();
        timeline
            .add_clip(&track_id, Clip::new_video("a", 0.0, 10.0))
            .unwrap();
        let b = timeline
            .add_clip(&track_id, Clip::new_video("b", 30.0, 5.0))
            .unwrap();
        timeline.set_playhead(100.0);

        // 10px at 10px/s is one second of tolerance.
        let snapped = snap_clip_start(&timeline, &b, 10.4, 5.0, 10.0);
        assert!((snapped - 10.0).abs() < 1e-9);
        assert_eq!(snap_clip_start(&timeline, &b, 12.0, 5.0, 10.0), 12.0);
    }

    #[test]
    fn test_snap_clip_end_to_playhead() {
        let mut timeline = Timeline::with_default_tracks(Viewport::new(10.0, 0.0));
        let track_id = timeline.tracks()[0].id.clone();
        let a = timeline
            .add_clip(&track_id, Clip::new_video("a", 0.0, 5.0))
            .unwrap();
        timeline.set_playhead(20.0);

        // End would land at 19.8, snaps to the playhead at 20.
        let snapped = snap_clip_start(&timeline, &a, 14.8, 5.0, 5.0);
        assert!((snapped - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_snapped_end_never_passes_target() {
        let mut timeline = Timeline::with_default_tracks(Viewport::new(10.0, 0.0));
        let track_id = timeline.tracks()[0].id.clone();
        let a = timeline
            .add_clip(&track_id, Clip::new_video("a", 0.0, 0.1))
            .unwrap();
        timeline.set_playhead(0.3);

        let snapped = snap_clip_start(&timeline, &a, 0.21, 0.1, 1.0);
        assert!(snapped + 0.1 <= 0.3);
        assert!((snapped - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_own_edges_are_not_targets() {
        let mut timeline = Timeline::with_default_tracks(Viewport::new(10.0, 0.0));
        let track_id = timeline.tracks()[0].id.clone();
        let a = timeline
            .add_clip(&track_id, Clip::new_video("a", 0.0, 5.0))
            .unwrap();
        timeline.set_playhead(50.0);

        let targets = collect_targets(&timeline, Some(&a));
        assert_eq!(targets, vec![SnapTarget::playhead(50.0)]);
    }
}
