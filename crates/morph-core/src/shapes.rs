//! Target point sets for each stage.
//!
//! Every generator returns exactly `n` positions and never fails. Randomness is
//! injected so a seeded `StdRng` reproduces the same silhouette.

use crate::constants::*;
use crate::glyph::GlyphRaster;
use glam::Vec3;
use rand::Rng;
use std::f32::consts::{PI, TAU};

/// The fixed set of silhouettes the field can morph into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Cloud,
    Sphere,
    Mountain,
    Heart,
    Glyph,
    LaunchPad,
}

#[derive(Clone, Debug)]
pub struct ShapeParams {
    pub sphere_radius: f32,
    pub terrain_amplitude: f32,
    pub mountain_radius: f32,
    pub mountain_peak: f32,
    pub mountain_falloff: f32,
    pub mountain_jitter: f32,
    pub mountain_base_y: f32,
    pub heart_scale: f32,
    pub heart_depth_ratio: f32,
    pub glyph_threshold: u8,
    pub glyph_world_scale: f32,
    pub glyph_depth_jitter: f32,
    pub cloud_half_width: f32,
    pub launch_pad_half_width: f32,
    pub launch_pad_y: f32,
}

impl Default for ShapeParams {
    fn default() -> Self {
        Self {
            sphere_radius: SPHERE_RADIUS,
            terrain_amplitude: SPHERE_TERRAIN_AMPLITUDE,
            mountain_radius: MOUNTAIN_RADIUS,
            mountain_peak: MOUNTAIN_PEAK_HEIGHT,
            mountain_falloff: MOUNTAIN_FALLOFF,
            mountain_jitter: MOUNTAIN_JITTER,
            mountain_base_y: MOUNTAIN_BASE_Y,
            heart_scale: HEART_SCALE,
            heart_depth_ratio: HEART_DEPTH_RATIO,
            glyph_threshold: GLYPH_BRIGHTNESS_THRESHOLD,
            glyph_world_scale: GLYPH_WORLD_SCALE,
            glyph_depth_jitter: GLYPH_DEPTH_JITTER,
            cloud_half_width: CLOUD_HALF_WIDTH,
            launch_pad_half_width: LAUNCH_PAD_HALF_WIDTH,
            launch_pad_y: LAUNCH_PAD_Y,
        }
    }
}

/// Generate the silhouette for `kind`. `text` and `raster` are only consulted for [`ShapeKind::Glyph`].
pub fn generate<R: Rng>(
    kind: ShapeKind,
    n: usize,
    params: &ShapeParams,
    text: &str,
    raster: &dyn GlyphRaster,
    rng: &mut R,
) -> Vec<Vec3> {
    match kind {
        ShapeKind::Cloud => cloud(n, params.cloud_half_width, Vec3::ZERO, rng),
        ShapeKind::Sphere => sphere(n, params.sphere_radius, params.terrain_amplitude),
        ShapeKind::Mountain => mountain(n, params, rng),
        ShapeKind::Heart => heart(n, params.heart_scale, params.heart_depth_ratio, rng),
        ShapeKind::Glyph => glyph(n, text, raster, params, rng),
        ShapeKind::LaunchPad => cloud(
            n,
            params.launch_pad_half_width,
            Vec3::new(0.0, params.launch_pad_y, 0.0),
            rng,
        ),
    }
}

/// Fibonacci lattice sphere with a bounded "continent" bump.
///
/// Point `i` sits at inclination `y = 1 - 2i/(n-1)` and azimuth `i * golden angle`.
/// The radius is `radius + terrain` where `terrain` lies in `[0, terrain_amplitude]`.
pub fn sphere(n: usize, radius: f32, terrain_amplitude: f32) -> Vec<Vec3> {
    let denom = n.saturating_sub(1).max(1) as f32;
    let golden_angle = PI * (3.0 - 5f32.sqrt());
    (0..n)
        .map(|i| {
            let y = if n == 1 { 0.0 } else { 1.0 - 2.0 * i as f32 / denom };
            let ring = (1.0 - y * y).max(0.0).sqrt();
            let theta = i as f32 * golden_angle;
            let dir = Vec3::new(theta.cos() * ring, y, theta.sin() * ring);
            dir * (radius + terrain(dir) * terrain_amplitude)
        })
        .collect()
}

/// Deterministic pseudo-noise on the unit sphere, in `[0, 1]`. Only the positive
/// lobes are kept so oceans stay at the base radius.
pub fn terrain(dir: Vec3) -> f32 {
    let n = (dir.x * 3.1 + 0.7).sin() * (dir.y * 2.3).cos()
        + (dir.z * 4.2 + dir.x * 1.3).sin() * 0.6
        + (dir.y * 5.7 - dir.z * 2.1).sin() * 0.4;
    (n / 2.0).clamp(0.0, 1.0)
}

/// Area-uniform disk sampling with an exponentially decaying height profile.
pub fn mountain<R: Rng>(n: usize, params: &ShapeParams, rng: &mut R) -> Vec<Vec3> {
    (0..n)
        .map(|_| {
            let r = params.mountain_radius * rng.gen::<f32>().sqrt();
            let angle = rng.gen::<f32>() * TAU;
            let height = params.mountain_peak * (-params.mountain_falloff * r).exp();
            let rugged = (rng.gen::<f32>() - 0.5) * 2.0 * params.mountain_jitter;
            Vec3::new(
                r * angle.cos(),
                params.mountain_base_y + height + rugged,
                r * angle.sin(),
            )
        })
        .collect()
}

/// Classic parametric heart curve with depth proportional to |x|.
pub fn heart<R: Rng>(n: usize, scale: f32, depth_ratio: f32, rng: &mut R) -> Vec<Vec3> {
    (0..n)
        .map(|_| {
            let t = rng.gen::<f32>() * TAU;
            let x = 16.0 * t.sin().powi(3);
            let y = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();
            let x = x * scale;
            let z = (rng.gen::<f32>() * 2.0 - 1.0) * x.abs() * depth_ratio;
            Vec3::new(x, y * scale, z)
        })
        .collect()
}

/// Sample bright pixels of the rasterized `text`, centred on the origin.
///
/// Falls back to `n` zero vectors when the rasterizer is unavailable or nothing
/// lights up above the threshold.
pub fn glyph<R: Rng>(
    n: usize,
    text: &str,
    raster: &dyn GlyphRaster,
    params: &ShapeParams,
    rng: &mut R,
) -> Vec<Vec3> {
    let Some(bitmap) = raster.rasterize(text) else {
        log::warn!("glyph rasterization unavailable; message stage collapses to origin");
        return vec![Vec3::ZERO; n];
    };
    let lit = bitmap.bright_pixels(params.glyph_threshold);
    if lit.is_empty() {
        log::warn!("glyph bitmap for {text:?} has no bright pixels");
        return vec![Vec3::ZERO; n];
    }
    let half_w = bitmap.width as f32 / 2.0;
    let half_h = bitmap.height as f32 / 2.0;
    (0..n)
        .map(|_| {
            let (px, py) = lit[rng.gen_range(0..lit.len())];
            let depth = (rng.gen::<f32>() - 0.5) * 2.0 * params.glyph_depth_jitter;
            Vec3::new(
                (px as f32 - half_w) * params.glyph_world_scale,
                (half_h - py as f32) * params.glyph_world_scale,
                depth,
            )
        })
        .collect()
}

/// Uniform positions in an axis-aligned cube of `half_width` around `center`.
pub fn cloud<R: Rng>(n: usize, half_width: f32, center: Vec3, rng: &mut R) -> Vec<Vec3> {
    let mut axis = || (rng.gen::<f32>() * 2.0 - 1.0) * half_width;
    (0..n)
        .map(|_| center + Vec3::new(axis(), axis(), axis()))
        .collect()
}
