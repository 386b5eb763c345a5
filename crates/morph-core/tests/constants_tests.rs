// Host-side sanity checks on tuning constants and their relationships.

use morph_core::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn constants_are_within_reasonable_bounds() {
    assert!(PARTICLE_COUNT > 0);
    assert!(POINT_SIZE > 0.0);

    // Convergence must settle well inside two seconds at 60 fps
    assert!(CONVERGE_SPEED / 60.0 < 1.0);
    assert!((1.0 - CONVERGE_SPEED / 60.0).powi(90) < 0.01);

    // Diverging expands, never contracts
    assert!(DIVERGE_EXPANSION > 1.0);

    // Fist needs a majority of the four checked fingers
    assert!(FOLDED_FINGERS_FOR_FIST > 2 && FOLDED_FINGERS_FOR_FIST <= 4);
    assert!(FOLD_THRESHOLD_SCALE > 1.0 && FOLD_THRESHOLD_SCALE < 1.5);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn finale_phases_are_ordered() {
    assert!(LAUNCH_DURATION_SEC > 0.0);
    assert!(BURST_WINDOW_END_SEC > LAUNCH_DURATION_SEC);
    assert!(LAUNCH_SPEED_MIN > 0.0 && LAUNCH_SPEED_MAX >= LAUNCH_SPEED_MIN);
    assert!(FLOOR_Y < LAUNCH_PAD_Y - LAUNCH_PAD_HALF_WIDTH);
    assert!(FLOOR_FRICTION > 0.0 && FLOOR_FRICTION <= 1.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn shapes_fit_in_view() {
    // Half-height visible at the origin plane
    let half_h = CAMERA_Z * (CAMERA_FOVY / 2.0).tan();
    assert!(SPHERE_RADIUS + SPHERE_TERRAIN_AMPLITUDE < half_h);
    assert!(MOUNTAIN_BASE_Y + MOUNTAIN_PEAK_HEIGHT < half_h);
    assert!(16.0 * HEART_SCALE < half_h * 16.0 / 9.0);
    let glyph_half_w = GLYPH_BITMAP_WIDTH as f32 / 2.0 * GLYPH_WORLD_SCALE;
    assert!(glyph_half_w < half_h * 16.0 / 9.0);
}
