//! Open/closed hand classification from 21 hand landmarks.
//!
//! The landmark model itself is an external collaborator reached through
//! [`LandmarkDetector`]; everything here is plain geometry on its output.

use crate::constants::{FOLDED_FINGERS_FOR_FIST, FOLD_THRESHOLD_SCALE};
use crate::MorphError;
use glam::Vec2;

pub const WRIST: usize = 0;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_TIP: usize = 12;
pub const RING_TIP: usize = 16;
pub const PINKY_TIP: usize = 20;
pub const LANDMARK_COUNT: usize = 21;

/// Fingertips checked for folding (the thumb is ignored).
pub const FINGERTIPS: [usize; 4] = [INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Gesture {
    #[default]
    None,
    Open,
    Closed,
}

/// Normalized image-space landmarks for one tracked hand.
#[derive(Clone, Debug, PartialEq)]
pub struct HandLandmarks {
    pub points: [Vec2; LANDMARK_COUNT],
}

impl HandLandmarks {
    pub fn new(points: [Vec2; LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    /// Accepts a flat `x,y` (42 floats) or `x,y,z` (63 floats) array; z is dropped.
    pub fn from_flat(flat: &[f32]) -> Result<Self, MorphError> {
        let stride = match flat.len() {
            n if n == LANDMARK_COUNT * 2 => 2,
            n if n == LANDMARK_COUNT * 3 => 3,
            n => return Err(MorphError::LandmarkCount(n)),
        };
        let mut points = [Vec2::ZERO; LANDMARK_COUNT];
        for (p, chunk) in points.iter_mut().zip(flat.chunks_exact(stride)) {
            *p = Vec2::new(chunk[0], chunk[1]);
        }
        Ok(Self { points })
    }

    #[inline]
    pub fn wrist_distance(&self, index: usize) -> f32 {
        self.points[WRIST].distance(self.points[index])
    }
}

#[derive(Clone, Debug)]
pub struct ClassifierParams {
    /// Multiplier on the wrist→middle-MCP distance below which a fingertip counts as folded.
    pub fold_threshold_scale: f32,
    pub folded_for_fist: usize,
}

impl Default for ClassifierParams {
    fn default() -> Self {
        Self {
            fold_threshold_scale: FOLD_THRESHOLD_SCALE,
            folded_for_fist: FOLDED_FINGERS_FOR_FIST,
        }
    }
}

/// Number of the four fingertips closer to the wrist than the fold threshold.
pub fn folded_fingers(hand: &HandLandmarks, params: &ClassifierParams) -> usize {
    let reference = hand.wrist_distance(MIDDLE_MCP);
    let threshold = reference * params.fold_threshold_scale;
    FINGERTIPS
        .iter()
        .filter(|&&tip| hand.wrist_distance(tip) < threshold)
        .count()
}

/// Stateless classification of a single observation.
pub fn classify(hand: Option<&HandLandmarks>, params: &ClassifierParams) -> Gesture {
    match hand {
        None => Gesture::None,
        Some(h) if folded_fingers(h, params) >= params.folded_for_fist => Gesture::Closed,
        Some(_) => Gesture::Open,
    }
}

/// Classifier that only reports changes.
#[derive(Clone, Debug, Default)]
pub struct GestureClassifier {
    pub params: ClassifierParams,
    last: Gesture,
}

impl GestureClassifier {
    pub fn new(params: ClassifierParams) -> Self {
        Self {
            params,
            last: Gesture::None,
        }
    }

    pub fn last(&self) -> Gesture {
        self.last
    }

    /// Returns `Some` only when the classification differs from the previous one.
    pub fn observe(&mut self, hand: Option<&HandLandmarks>) -> Option<Gesture> {
        let g = classify(hand, &self.params);
        if g == self.last {
            return None;
        }
        log::debug!("gesture {:?} -> {:?}", self.last, g);
        self.last = g;
        Some(g)
    }
}

/// Capability for the hand-landmark model. Implementations own whatever camera
/// or inference handles they need and release them in [`close`](Self::close).
pub trait LandmarkDetector {
    type Frame;
    fn detect(&mut self, frame: &Self::Frame) -> Option<HandLandmarks>;
    fn close(&mut self);
}

/// Detector + de-duplicating classifier, polled once per camera frame.
pub struct GesturePipeline<D: LandmarkDetector> {
    detector: D,
    classifier: GestureClassifier,
    closed: bool,
}

impl<D: LandmarkDetector> GesturePipeline<D> {
    pub fn new(detector: D, params: ClassifierParams) -> Self {
        Self {
            detector,
            classifier: GestureClassifier::new(params),
            closed: false,
        }
    }

    pub fn poll(&mut self, frame: &D::Frame) -> Option<Gesture> {
        if self.closed {
            return None;
        }
        let hand = self.detector.detect(frame);
        self.classifier.observe(hand.as_ref())
    }

    pub fn current(&self) -> Gesture {
        self.classifier.last()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Releases the detector. Idempotent; later polls report nothing.
    pub fn close(&mut self) {
        if !self.closed {
            self.detector.close();
            self.closed = true;
        }
    }
}
