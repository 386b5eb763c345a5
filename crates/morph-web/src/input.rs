use morph_core::{Gesture, Rgb, Stage};

/// What a key press asks the experience to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Gesture(Gesture),
    Start,
    ToggleOverlay,
}

/// Keyboard fallback for the camera: o/c/n push a gesture, Enter starts, h toggles the overlay.
#[inline]
pub fn key_action(key: &str) -> Option<KeyAction> {
    match key {
        "o" | "O" => Some(KeyAction::Gesture(Gesture::Open)),
        "c" | "C" => Some(KeyAction::Gesture(Gesture::Closed)),
        "n" | "N" => Some(KeyAction::Gesture(Gesture::None)),
        "Enter" => Some(KeyAction::Start),
        "h" | "H" => Some(KeyAction::ToggleOverlay),
        _ => None,
    }
}

/// Parse the value of an `<input type="color">`. Bad input is logged and ignored.
#[inline]
pub fn parse_color_input(value: &str) -> Option<Rgb> {
    match Rgb::from_hex(value) {
        Ok(c) => Some(c),
        Err(e) => {
            log::warn!("[color] {}", e);
            None
        }
    }
}

/// Text for the `#stage-label` element, e.g. `Earth (1/5)`. The intro has no number.
pub fn stage_caption(stage: Stage) -> String {
    let total = Stage::ALL.len() - 1;
    match stage.index() {
        0 => stage.label().to_string(),
        i => format!("{} ({}/{})", stage.label(), i, total),
    }
}
