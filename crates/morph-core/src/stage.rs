use crate::color::Rgb;
use crate::gesture::Gesture;
use crate::shapes::ShapeKind;

/// The scripted slideshow, in presentation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    Intro,
    Earth,
    Everest,
    Heart,
    Message,
    Fireworks,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::Intro,
        Stage::Earth,
        Stage::Everest,
        Stage::Heart,
        Stage::Message,
        Stage::Fireworks,
    ];

    pub fn index(self) -> usize {
        Stage::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    pub fn from_index(i: usize) -> Option<Stage> {
        Stage::ALL.get(i).copied()
    }

    pub fn shape(self) -> ShapeKind {
        match self {
            Stage::Intro => ShapeKind::Cloud,
            Stage::Earth => ShapeKind::Sphere,
            Stage::Everest => ShapeKind::Mountain,
            Stage::Heart => ShapeKind::Heart,
            Stage::Message => ShapeKind::Glyph,
            Stage::Fireworks => ShapeKind::LaunchPad,
        }
    }

    pub fn default_color(self) -> Rgb {
        match self {
            Stage::Intro => Rgb::from_u8(0xc8, 0xd2, 0xff),
            Stage::Earth => Rgb::from_u8(0x3a, 0x8d, 0xff),
            Stage::Everest => Rgb::from_u8(0xe8, 0xf4, 0xff),
            Stage::Heart => Rgb::from_u8(0xff, 0x33, 0x66),
            Stage::Message => Rgb::from_u8(0xff, 0xd1, 0x66),
            Stage::Fireworks => Rgb::from_u8(0xff, 0x8a, 0x3d),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Stage::Intro => "Intro",
            Stage::Earth => "Earth",
            Stage::Everest => "Everest",
            Stage::Heart => "Heart",
            Stage::Message => "Message",
            Stage::Fireworks => "Fireworks",
        }
    }
}

/// Edge-triggered stage sequencer.
///
/// Stages advance on an OPEN→CLOSED edge only. Index 0 (intro) is left on the
/// first CLOSED (or manual start) and never re-entered: wrapping goes to index 1.
#[derive(Clone, Debug, Default)]
pub struct StageController {
    index: usize,
    last_gesture: Gesture,
    started: bool,
}

impl StageController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> Stage {
        Stage::ALL[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn last_gesture(&self) -> Gesture {
        self.last_gesture
    }

    /// Manual start. Returns the entered stage, or `None` if already running.
    pub fn start(&mut self) -> Option<Stage> {
        if self.started {
            return None;
        }
        self.started = true;
        self.index = 1;
        log::info!("experience started at {:?}", self.stage());
        Some(self.stage())
    }

    /// Feed the next gesture value; returns the new stage when one was entered.
    pub fn observe(&mut self, gesture: Gesture) -> Option<Stage> {
        let previous = std::mem::replace(&mut self.last_gesture, gesture);
        if !self.started {
            return match gesture {
                Gesture::Closed => {
                    self.started = true;
                    self.index = 1;
                    log::info!("experience started by gesture at {:?}", self.stage());
                    Some(self.stage())
                }
                _ => None,
            };
        }
        if previous == Gesture::Open && gesture == Gesture::Closed {
            self.index = if self.index + 1 >= Stage::ALL.len() {
                1
            } else {
                self.index + 1
            };
            log::info!("stage -> {:?}", self.stage());
            return Some(self.stage());
        }
        None
    }
}
