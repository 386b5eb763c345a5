use morph_core::{Gesture, Rgb, Stage};
use winit::event::ElementState;
use winit::keyboard::KeyCode;

/// What a key event asks the experience to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCommand {
    Gesture(Gesture),
    Start,
    NextColor,
    Quit,
}

/// Desktop stand-in for the camera: holding Space is a fist, letting go opens
/// the hand, N drops the hand out of view.
pub fn key_command(code: KeyCode, state: ElementState, repeat: bool) -> Option<KeyCommand> {
    if repeat {
        return None;
    }
    match (code, state) {
        (KeyCode::Space, ElementState::Pressed) => Some(KeyCommand::Gesture(Gesture::Closed)),
        (KeyCode::Space, ElementState::Released) => Some(KeyCommand::Gesture(Gesture::Open)),
        (KeyCode::KeyN, ElementState::Pressed) => Some(KeyCommand::Gesture(Gesture::None)),
        (KeyCode::Enter | KeyCode::NumpadEnter, ElementState::Pressed) => Some(KeyCommand::Start),
        (KeyCode::KeyP, ElementState::Pressed) => Some(KeyCommand::NextColor),
        (KeyCode::Escape, ElementState::Pressed) => Some(KeyCommand::Quit),
        _ => None,
    }
}

/// The P key walks the stage colours in order.
pub fn palette_color(step: usize) -> Rgb {
    Stage::ALL[step % Stage::ALL.len()].default_color()
}

pub fn window_title(stage: Stage) -> String {
    let total = Stage::ALL.len() - 1;
    match stage.index() {
        0 => format!("Particle Morph: {} (Enter to begin)", stage.label()),
        i => format!("Particle Morph: {} ({}/{})", stage.label(), i, total),
    }
}
