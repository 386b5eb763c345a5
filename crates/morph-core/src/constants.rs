// Shared shape/animation tuning constants used by both web and native frontends.
// The parameter structs in `shapes`, `gesture` and `animator` default to these.

// Field size
pub const PARTICLE_COUNT: usize = 4000;
pub const DEFAULT_SEED: u64 = 42;
pub const POINT_SIZE: f32 = 0.05; // world-space billboard edge length

// Sphere ("planet")
pub const SPHERE_RADIUS: f32 = 2.5;
pub const SPHERE_TERRAIN_AMPLITUDE: f32 = 0.12; // max radial push for continents

// Mountain
pub const MOUNTAIN_RADIUS: f32 = 3.5;
pub const MOUNTAIN_PEAK_HEIGHT: f32 = 3.4;
pub const MOUNTAIN_FALLOFF: f32 = 1.3; // exponential decay per world unit of radius
pub const MOUNTAIN_JITTER: f32 = 0.18;
pub const MOUNTAIN_BASE_Y: f32 = -1.6;

// Heart
pub const HEART_SCALE: f32 = 0.16; // 16 sin^3 t spans +-2.56 world units
pub const HEART_DEPTH_RATIO: f32 = 0.35; // z jitter per unit of |x|

// Glyph rasterization
pub const GLYPH_BITMAP_WIDTH: u32 = 256;
pub const GLYPH_BITMAP_HEIGHT: u32 = 128;
pub const GLYPH_FONT: &str = "bold 72px sans-serif";
pub const GLYPH_BRIGHTNESS_THRESHOLD: u8 = 128;
pub const GLYPH_WORLD_SCALE: f32 = 0.025; // world units per bitmap pixel
pub const GLYPH_DEPTH_JITTER: f32 = 0.2;
pub const MESSAGE_TEXT: &str = "HELLO";

// Random cloud
pub const CLOUD_HALF_WIDTH: f32 = 5.0;
pub const LAUNCH_PAD_HALF_WIDTH: f32 = 0.4;
pub const LAUNCH_PAD_Y: f32 = -2.5;

// Gesture classification
pub const FOLD_THRESHOLD_SCALE: f32 = 1.15; // empirically 1.1..1.2
pub const FOLDED_FINGERS_FOR_FIST: usize = 3;

// Morphing rates (lerp factor per second)
pub const CONVERGE_SPEED: f32 = 4.0;
pub const DIVERGE_SPEED: f32 = 2.2;
pub const INTRO_JITTER: f32 = 0.05;
pub const DIVERGE_EXPANSION: f32 = 1.6;
pub const PLANET_SPIN_PER_SEC: f32 = 0.25; // radians
pub const DRIFT_SPIN_PER_SEC: f32 = 0.08; // radians
pub const MAX_FRAME_DT: f32 = 0.1;

// Finale projectile simulation
pub const LAUNCH_DURATION_SEC: f32 = 0.6;
pub const BURST_WINDOW_END_SEC: f32 = 0.7;
pub const LAUNCH_SPEED_MIN: f32 = 5.0;
pub const LAUNCH_SPEED_MAX: f32 = 10.0;
pub const LAUNCH_DRIFT: f32 = 1.0;
pub const GRAVITY: f32 = 4.0;
pub const BURST_SPREAD_RATE: f32 = 6.0; // horizontal velocity growth per second inside the burst window
pub const BURST_DAMP_RATE: f32 = 8.0; // upward velocity decay per second inside the burst window
pub const HORIZONTAL_SPEED_SCALE: f32 = 3.0;
pub const FLOOR_Y: f32 = -4.0;
pub const FLOOR_FRICTION: f32 = 0.9;

// Camera
pub const CAMERA_Z: f32 = 9.0;
pub const CAMERA_FOVY: f32 = std::f32::consts::FRAC_PI_4;

// Background
pub const CLEAR_COLOR: [f64; 3] = [0.01, 0.01, 0.03];
