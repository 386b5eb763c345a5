// Host-side tests for landmark classification and the detector pipeline.

use glam::Vec2;
use morph_core::gesture::*;
use morph_core::MorphError;

/// Upright hand: wrist at the bottom, middle knuckle 0.2 above it.
fn hand_with_tips(tip_distance: [f32; 4]) -> HandLandmarks {
    let wrist = Vec2::new(0.5, 0.9);
    let mut points = [wrist; LANDMARK_COUNT];
    points[MIDDLE_MCP] = Vec2::new(0.5, 0.7);
    points[INDEX_MCP] = Vec2::new(0.45, 0.72);
    points[THUMB_TIP] = Vec2::new(0.3, 0.75);
    let xs = [0.42, 0.48, 0.54, 0.6];
    for ((tip, x), d) in FINGERTIPS.iter().zip(xs).zip(tip_distance) {
        let dx = x - wrist.x;
        let dy = (d * d - dx * dx).max(0.0).sqrt();
        points[*tip] = Vec2::new(x, wrist.y - dy);
    }
    HandLandmarks::new(points)
}

fn open_hand() -> HandLandmarks {
    hand_with_tips([0.42, 0.45, 0.43, 0.38])
}

fn fist() -> HandLandmarks {
    hand_with_tips([0.12, 0.11, 0.12, 0.13])
}

#[test]
fn no_hand_is_none() {
    assert_eq!(classify(None, &ClassifierParams::default()), Gesture::None);
}

#[test]
fn extended_fingers_classify_as_open() {
    let params = ClassifierParams::default();
    assert_eq!(folded_fingers(&open_hand(), &params), 0);
    assert_eq!(classify(Some(&open_hand()), &params), Gesture::Open);
}

#[test]
fn curled_fingers_classify_as_closed() {
    let params = ClassifierParams::default();
    assert_eq!(folded_fingers(&fist(), &params), 4);
    assert_eq!(classify(Some(&fist()), &params), Gesture::Closed);
}

#[test]
fn three_folded_fingers_are_enough_for_a_fist() {
    let params = ClassifierParams::default();
    // pointing: index extended, the rest curled
    let pointing = hand_with_tips([0.45, 0.11, 0.12, 0.13]);
    assert_eq!(folded_fingers(&pointing, &params), 3);
    assert_eq!(classify(Some(&pointing), &params), Gesture::Closed);

    let two_folded = hand_with_tips([0.45, 0.44, 0.12, 0.13]);
    assert_eq!(classify(Some(&two_folded), &params), Gesture::Open);
}

#[test]
fn thumb_is_ignored() {
    let params = ClassifierParams::default();
    let mut hand = open_hand();
    hand.points[THUMB_TIP] = hand.points[WRIST];
    assert_eq!(classify(Some(&hand), &params), Gesture::Open);
}

#[test]
fn classification_is_scale_invariant() {
    let params = ClassifierParams::default();
    for hand in [open_hand(), fist()] {
        let expected = classify(Some(&hand), &params);
        let mut scaled = hand.clone();
        for p in scaled.points.iter_mut() {
            *p = (*p - Vec2::new(0.5, 0.9)) * 0.3 + Vec2::new(0.2, 0.4);
        }
        assert_eq!(classify(Some(&scaled), &params), expected);
    }
}

#[test]
fn from_flat_accepts_xy_and_xyz() {
    let xy: Vec<f32> = (0..LANDMARK_COUNT * 2).map(|i| i as f32).collect();
    let hand = HandLandmarks::from_flat(&xy).expect("42 floats");
    assert_eq!(hand.points[1], Vec2::new(2.0, 3.0));

    let xyz: Vec<f32> = (0..LANDMARK_COUNT * 3).map(|i| i as f32).collect();
    let hand = HandLandmarks::from_flat(&xyz).expect("63 floats");
    assert_eq!(hand.points[1], Vec2::new(3.0, 4.0));
}

#[test]
fn from_flat_rejects_other_lengths() {
    assert_eq!(
        HandLandmarks::from_flat(&[0.0; 10]),
        Err(MorphError::LandmarkCount(10))
    );
}

#[test]
fn classifier_reports_changes_only() {
    let mut c = GestureClassifier::default();
    assert_eq!(c.observe(None), None);
    assert_eq!(c.observe(Some(&open_hand())), Some(Gesture::Open));
    assert_eq!(c.observe(Some(&open_hand())), None);
    assert_eq!(c.observe(Some(&fist())), Some(Gesture::Closed));
    assert_eq!(c.observe(Some(&fist())), None);
    assert_eq!(c.observe(None), Some(Gesture::None));
    assert_eq!(c.last(), Gesture::None);
}

/// Replays a scripted sequence of observations.
struct ScriptedDetector {
    script: Vec<Option<HandLandmarks>>,
    cursor: usize,
}

impl LandmarkDetector for ScriptedDetector {
    type Frame = ();

    fn detect(&mut self, _frame: &()) -> Option<HandLandmarks> {
        let hand = self.script.get(self.cursor).cloned().flatten();
        self.cursor += 1;
        hand
    }

    fn close(&mut self) {}
}

#[test]
fn pipeline_emits_on_change_then_goes_quiet() {
    let detector = ScriptedDetector {
        script: vec![Some(open_hand()), Some(open_hand()), Some(fist()), None],
        cursor: 0,
    };
    let mut pipeline = GesturePipeline::new(detector, ClassifierParams::default());
    let emitted: Vec<_> = (0..4).filter_map(|_| pipeline.poll(&())).collect();
    assert_eq!(emitted, vec![Gesture::Open, Gesture::Closed, Gesture::None]);
    assert_eq!(pipeline.current(), Gesture::None);

    pipeline.close();
    pipeline.close();
    assert!(pipeline.is_closed());
    assert_eq!(pipeline.poll(&()), None);
}

#[test]
fn pipeline_close_releases_detector_exactly_once() {
    use std::cell::Cell;
    use std::rc::Rc;

    struct Counting(Rc<Cell<usize>>);
    impl LandmarkDetector for Counting {
        type Frame = ();
        fn detect(&mut self, _frame: &()) -> Option<HandLandmarks> {
            None
        }
        fn close(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    let closes = Rc::new(Cell::new(0));
    let mut pipeline = GesturePipeline::new(Counting(closes.clone()), ClassifierParams::default());
    pipeline.close();
    pipeline.close();
    assert_eq!(closes.get(), 1);
}
