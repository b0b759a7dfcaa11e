//! Destructive and Edge Case Tests for Core Models
//!
//! Randomized operation sequences and hostile inputs. The pseudo-random
//! sequences come from a fixed-seed LCG so failures are reproducible.

use crate::core::commands::CommandPayload;
use crate::core::timeline::{
    pixel_to_time, time_to_pixel, Clip, MediaKind, SelectMode, Timeline, Viewport, MAX_ZOOM,
    MIN_ZOOM,
};
use crate::core::tools::{all_tools, ToolRegistry, MAX_PALETTE_TOOLS};
use crate::core::{Color, CoreError, TimeRange};

/// Deterministic linear congruential generator (Knuth MMIX constants)
struct Lcg(u64);

impl Lcg {
    fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.0 >> 11
    }

    /// Uniform in [0, 1)
    fn next_f64(&mut self) -> f64 {
        self.next_u64() as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn index(&mut self, len: usize) -> usize {
        (self.next_u64() % len as u64) as usize
    }
}

fn assert_model_invariants(timeline: &Timeline) {
    for track in timeline.tracks() {
        assert!(
            track.is_consistent(),
            "track {} has overlapping or unsorted clips",
            track.name
        );
        for clip in track.clips() {
            assert_eq!(clip.kind, track.kind);
            assert!(clip.start_time >= 0.0);
            assert!(clip.duration > 0.0);
            assert!(clip.end_time().is_finite() && clip.end_time() > clip.start_time);
        }
    }
    for id in timeline.selection().iter() {
        assert!(timeline.contains_clip(id), "selection holds deleted clip {id}");
    }
    assert!(timeline.playhead() >= 0.0);
    assert!(timeline.viewport().scroll_offset >= 0.0);
}

#[test]
fn test_destructive_random_edit_sequences_never_overlap() {
    for seed in 1..=8u64 {
        let mut rng = Lcg(seed);
        let mut timeline = Timeline::with_default_tracks(Viewport::default());

        for _ in 0..400 {
            let clip_ids: Vec<String> = timeline.clips().map(|c| c.id.clone()).collect();
            let track_count = timeline.tracks().len();

            match rng.index(6) {
                0 | 1 => {
                    let track = &timeline.tracks()[rng.index(track_count)];
                    // Random kind so kind mismatches are exercised too
                    let kind = MediaKind::ALL[rng.index(MediaKind::ALL.len())];
                    let track_id = track.id.clone();
                    let clip = Clip::new(kind, "r", rng.range(0.0, 120.0), rng.range(0.1, 20.0));
                    let before = timeline.clone();
                    if timeline.add_clip(&track_id, clip).is_err() {
                        assert_eq!(timeline, before);
                    }
                }
                2 if !clip_ids.is_empty() => {
                    let id = &clip_ids[rng.index(clip_ids.len())];
                    let track_id = timeline.tracks()[rng.index(track_count)].id.clone();
                    let before = timeline.clone();
                    if timeline.move_clip(id, &track_id, rng.range(0.0, 120.0)).is_err() {
                        assert_eq!(timeline, before);
                    }
                }
                3 if !clip_ids.is_empty() => {
                    let id = clip_ids[rng.index(clip_ids.len())].clone();
                    let (_, clip) = timeline.find_clip(&id).unwrap();
                    let original = clip.duration;
                    let at = rng.range(clip.start_time - 1.0, clip.end_time() + 1.0);
                    let before = timeline.clone();
                    match timeline.split_clip(&id, at) {
                        Ok((left, right)) => {
                            let l = timeline.find_clip(&left).unwrap().1.duration;
                            let r = timeline.find_clip(&right).unwrap().1.duration;
                            assert!((l + r - original).abs() <= 1e-9 * original.max(1.0));
                        }
                        Err(e) => {
                            assert!(matches!(e, CoreError::InvalidSplitPoint { .. }));
                            assert_eq!(timeline, before);
                        }
                    }
                }
                4 if !clip_ids.is_empty() => {
                    let id = &clip_ids[rng.index(clip_ids.len())];
                    timeline.delete_clip(id);
                    let after_once = timeline.clone();
                    timeline.delete_clip(id);
                    assert_eq!(timeline, after_once);
                }
                _ => {
                    let picks: Vec<&str> = clip_ids
                        .iter()
                        .filter(|_| rng.next_f64() < 0.3)
                        .map(String::as_str)
                        .collect();
                    timeline.select(picks, SelectMode::Toggle);
                    timeline.set_playhead(rng.range(-10.0, 130.0));
                    timeline.split_selected_at_playhead();
                }
            }

            assert_model_invariants(&timeline);
        }
    }
}

#[test]
fn test_destructive_mapper_round_trip_across_zoom_range() {
    let mut rng = Lcg(42);
    for _ in 0..2_000 {
        let zoom = rng.range(MIN_ZOOM, MAX_ZOOM);
        let viewport = Viewport::new(zoom, rng.range(0.0, 3_600.0));
        let t = rng.range(0.0, 7_200.0);

        let px = time_to_pixel(t, &viewport);
        assert!(px.is_finite());
        if t >= viewport.scroll_offset {
            assert!(px >= 0.0);
        }
        let back = pixel_to_time(px, &viewport);
        assert!((back - t).abs() <= 1e-9 * t.abs().max(1.0), "t={t} back={back}");
    }
}

#[test]
fn test_destructive_zoom_anchor_holds_when_offset_allows() {
    let mut rng = Lcg(7);
    for _ in 0..1_000 {
        let viewport = Viewport::new(rng.range(MIN_ZOOM, MAX_ZOOM), rng.range(0.0, 600.0));
        let mut timeline = Timeline::new(viewport);
        let anchor = timeline.viewport().scroll_offset + rng.range(0.0, 60.0);
        let before_px = timeline.viewport().time_to_pixel(anchor);
        let target = rng.range(MIN_ZOOM, MAX_ZOOM);

        timeline.set_zoom(target, anchor);

        let zoom = timeline.viewport().zoom;
        assert!((MIN_ZOOM..=MAX_ZOOM).contains(&zoom));
        if anchor - before_px / zoom >= 0.0 {
            let after_px = timeline.viewport().time_to_pixel(anchor);
            assert!((after_px - before_px).abs() <= 1e-6 * before_px.abs().max(1.0));
        }
    }
}

#[test]
fn test_destructive_hostile_numbers() {
    let mut timeline = Timeline::with_default_tracks(Viewport::default());
    let track_id = timeline.tracks()[0].id.clone();

    for (start, duration) in [
        (f64::NAN, 1.0),
        (0.0, f64::NAN),
        (-1.0, 5.0),
        (0.0, 0.0),
        (0.0, -3.0),
        (f64::INFINITY, 1.0),
        (0.0, f64::INFINITY),
        (1.0e308, 1.0e308),
        (1.0e300, 1.0),
    ] {
        let result = timeline.add_clip(&track_id, Clip::new_video("bad", start, duration));
        assert!(
            matches!(result, Err(CoreError::ValidationError(_))),
            "accepted start={start} duration={duration}"
        );
    }

    let id = timeline
        .add_clip(&track_id, Clip::new_video("ok", 0.0, 5.0))
        .unwrap();
    assert!(timeline.move_clip(&id, &track_id, f64::NAN).is_err());
    assert!(timeline.move_clip(&id, &track_id, -0.5).is_err());
    assert!(matches!(
        timeline.move_clip(&id, &track_id, 1.0e300),
        Err(CoreError::ValidationError(_))
    ));
    assert_eq!(timeline.find_clip(&id).map(|(_, clip)| clip.start_time), Some(0.0));
    assert!(timeline.split_clip(&id, f64::NAN).is_err());

    timeline.set_playhead(3.0);
    timeline.set_playhead(f64::NAN);
    assert_eq!(timeline.playhead(), 3.0);

    timeline.set_zoom(f64::INFINITY, 0.0);
    assert_eq!(timeline.viewport().zoom, MIN_ZOOM);
    timeline.set_zoom(1e12, 0.0);
    assert_eq!(timeline.viewport().zoom, MAX_ZOOM);

    assert_model_invariants(&timeline);
}

#[test]
fn test_destructive_palette_never_exceeds_capacity() {
    let mut rng = Lcg(99);
    let catalogue = all_tools();
    let mut registry = ToolRegistry::new();

    for _ in 0..500 {
        let tool = catalogue[rng.index(catalogue.len())].id;
        if rng.next_f64() < 0.7 {
            let _ = registry.add_to_selection(tool);
        } else {
            registry.remove_from_selection(tool);
        }
        let ids = registry.selected_tool_ids();
        assert!(ids.len() <= MAX_PALETTE_TOOLS);
        let mut unique: Vec<&String> = ids.iter().collect();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), ids.len());
    }
}

#[test]
fn test_destructive_invalid_payload_injection() {
    // A string where a number is expected must be rejected, not coerced to 0
    let payload = serde_json::json!({
        "trackId": "track_1",
        "kind": "video",
        "label": "x",
        "startTime": "NOT_A_NUMBER",
        "duration": 5.0
    });
    let result = CommandPayload::parse("addClip", payload);
    match result {
        Err(CoreError::InvalidCommand(msg)) => assert!(msg.contains("invalid type"), "{msg}"),
        other => panic!("expected InvalidCommand, got {other:?}"),
    }

    let missing = CommandPayload::parse("moveClip", serde_json::json!({ "clipId": "c" }));
    match missing {
        Err(CoreError::InvalidCommand(msg)) => assert!(msg.contains("missing field"), "{msg}"),
        other => panic!("expected InvalidCommand, got {other:?}"),
    }

    let bad_kind = CommandPayload::parse(
        "addTrack",
        serde_json::json!({ "name": "T", "kind": "hologram" }),
    );
    assert!(matches!(bad_kind, Err(CoreError::InvalidCommand(_))));
}

#[test]
fn test_destructive_corrupt_timeline_documents() {
    assert!(matches!(
        Timeline::from_json("{ not json"),
        Err(CoreError::JsonError(_))
    ));

    // Overlapping clips in a document are rejected on load
    let json = r#"{
        "tracks": [{
            "id": "t1", "kind": "video", "name": "Video 1",
            "clips": [
                { "id": "a", "kind": "video", "startTime": 0.0, "duration": 10.0, "label": "A" },
                { "id": "b", "kind": "video", "startTime": 5.0, "duration": 10.0, "label": "B" }
            ]
        }]
    }"#;
    assert!(matches!(
        Timeline::from_json(json),
        Err(CoreError::ClipOverlap { .. })
    ));
}

#[test]
fn test_destructive_color_parsing() {
    assert_eq!(Color::from_hex("invalid"), Color::black());
    assert_eq!(Color::from_hex("12345"), Color::black());
    assert_eq!(Color::from_hex(""), Color::black());
    assert_eq!(Color::from_hex("#ééé"), Color::black());
    assert!(Color::try_from_hex("#FFF").is_ok());
}

#[test]
fn test_destructive_time_range_inversion() {
    let range = TimeRange::new(10.0, 5.0);
    assert_eq!(range.start_sec, 5.0);
    assert_eq!(range.end_sec, 10.0);
}
