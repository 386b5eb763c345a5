use thiserror::Error;

/// Construction and parsing failures. The per-frame path never produces these.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MorphError {
    #[error("particle field must hold at least one particle")]
    EmptyField,
    #[error("expected {expected} positions, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("invalid colour {0:?}, expected #rrggbb")]
    InvalidColor(String),
    #[error("expected 21 hand landmarks as x,y or x,y,z values, got {0} floats")]
    LandmarkCount(usize),
    #[error("animator parameter `{0}` is out of range")]
    InvalidParameter(&'static str),
}
