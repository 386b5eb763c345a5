// Host-side tests for the stage table and the edge-triggered controller.

use morph_core::{Gesture, Rgb, ShapeKind, Stage, StageController};

fn started() -> StageController {
    let mut c = StageController::new();
    assert_eq!(c.observe(Gesture::Closed), Some(Stage::Earth));
    c
}

#[test]
fn stage_table_is_in_presentation_order() {
    for (i, stage) in Stage::ALL.iter().enumerate() {
        assert_eq!(stage.index(), i);
        assert_eq!(Stage::from_index(i), Some(*stage));
    }
    assert_eq!(Stage::from_index(Stage::ALL.len()), None);
    assert_eq!(Stage::Intro.shape(), ShapeKind::Cloud);
    assert_eq!(Stage::Earth.shape(), ShapeKind::Sphere);
    assert_eq!(Stage::Message.shape(), ShapeKind::Glyph);
    assert_eq!(Stage::Fireworks.shape(), ShapeKind::LaunchPad);
}

#[test]
fn default_colors_match_palette() {
    assert_eq!(Stage::Earth.default_color(), Rgb::from_hex("#3a8dff").unwrap());
    assert_eq!(Stage::Heart.default_color().to_hex(), "#ff3366");
    for stage in Stage::ALL {
        assert!(!stage.label().is_empty());
    }
}

#[test]
fn intro_ignores_open_and_none() {
    let mut c = StageController::new();
    assert_eq!(c.observe(Gesture::Open), None);
    assert_eq!(c.observe(Gesture::None), None);
    assert_eq!(c.stage(), Stage::Intro);
    assert!(!c.is_started());
}

#[test]
fn first_closed_starts_at_earth() {
    let c = started();
    assert!(c.is_started());
    assert_eq!(c.index(), 1);
    assert_eq!(c.last_gesture(), Gesture::Closed);
}

#[test]
fn open_then_closed_advances_exactly_one() {
    let mut c = started();
    assert_eq!(c.observe(Gesture::Open), None);
    assert_eq!(c.observe(Gesture::Closed), Some(Stage::Everest));
    assert_eq!(c.index(), 2);
}

#[test]
fn repeated_closed_does_not_advance() {
    let mut c = started();
    c.observe(Gesture::Open);
    c.observe(Gesture::Closed);
    assert_eq!(c.observe(Gesture::Closed), None);
    assert_eq!(c.observe(Gesture::Closed), None);
    assert_eq!(c.stage(), Stage::Everest);
}

#[test]
fn none_between_open_and_closed_breaks_the_edge() {
    let mut c = started();
    c.observe(Gesture::Open);
    c.observe(Gesture::None);
    assert_eq!(c.observe(Gesture::Closed), None);
    assert_eq!(c.stage(), Stage::Earth);
}

#[test]
fn wraps_to_earth_never_intro() {
    let mut c = started();
    let mut seen = vec![c.stage()];
    for _ in 0..Stage::ALL.len() - 1 {
        c.observe(Gesture::Open);
        if let Some(stage) = c.observe(Gesture::Closed) {
            seen.push(stage);
        }
    }
    assert_eq!(
        seen,
        vec![
            Stage::Earth,
            Stage::Everest,
            Stage::Heart,
            Stage::Message,
            Stage::Fireworks,
            Stage::Earth,
        ]
    );
    assert!(!seen.contains(&Stage::Intro));
}

#[test]
fn manual_start_is_one_shot() {
    let mut c = StageController::new();
    assert_eq!(c.start(), Some(Stage::Earth));
    assert_eq!(c.start(), None);
    // a CLOSED after a manual start is not an edge
    assert_eq!(c.observe(Gesture::Closed), None);
    assert_eq!(c.stage(), Stage::Earth);
}
