pub mod animator;
pub mod audio;
pub mod color;
pub mod constants;
pub mod error;
pub mod experience;
pub mod gesture;
pub mod glyph;
pub mod shapes;
pub mod stage;
pub mod state;

pub use animator::*;
pub use audio::*;
pub use color::*;
pub use constants::*;
pub use error::*;
pub use experience::*;
pub use gesture::*;
pub use glyph::*;
pub use shapes::{ShapeKind, ShapeParams};
pub use stage::*;
pub use state::*;

// Shaders bundled as string constants
pub static POINTS_WGSL: &str = include_str!("../shaders/points.wgsl");
