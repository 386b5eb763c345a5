// Host-side tests for colour parsing and the camera/uniform helpers.

use glam::{Vec3, Vec4};
use morph_core::*;

#[test]
fn hex_parsing_accepts_common_forms() {
    let c = Rgb::from_hex("#ff8000").unwrap();
    assert_eq!(c, Rgb::from_u8(255, 128, 0));
    assert_eq!(Rgb::from_hex("  FF8000 ").unwrap(), c);
    assert_eq!(c.to_hex(), "#ff8000");
    assert_eq!(c.to_string(), "#ff8000");
}

#[test]
fn hex_parsing_rejects_garbage() {
    for bad in ["", "#fff", "#gg0000", "#12345678", "#ééé"] {
        assert_eq!(
            Rgb::from_hex(bad),
            Err(MorphError::InvalidColor(bad.to_string())),
            "{bad:?}"
        );
    }
}

#[test]
fn stage_palette_round_trips_through_hex() {
    for stage in Stage::ALL {
        let c = stage.default_color();
        assert_eq!(Rgb::from_hex(&c.to_hex()).unwrap(), c);
    }
}

#[test]
fn vec4_carries_alpha() {
    let v = Rgb::new(0.1, 0.2, 0.3).to_vec4(0.5);
    assert_eq!(v, Vec4::new(0.1, 0.2, 0.3, 0.5));
    assert_eq!(Rgb::default(), Rgb::WHITE);
    assert_eq!(Rgb::new(0.1, 0.2, 0.3).to_array(), [0.1, 0.2, 0.3]);
}

#[test]
fn camera_looks_at_the_field_center() {
    let cam = Camera::default();
    let clip = cam.projection_matrix() * cam.view_matrix() * Vec3::ZERO.extend(1.0);
    let ndc = clip.truncate() / clip.w;
    assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
    assert!(ndc.z > 0.0 && ndc.z < 1.0);
}

#[test]
fn zero_viewport_keeps_aspect() {
    let mut cam = Camera::default();
    cam.set_viewport(800, 400);
    assert_eq!(cam.aspect, 2.0);
    cam.set_viewport(800, 0);
    assert_eq!(cam.aspect, 2.0);
}

#[test]
fn uniform_block_layout() {
    assert_eq!(std::mem::size_of::<PointUniforms>(), 3 * 64 + 16 + 16);
    let u = PointUniforms::new(&Camera::default(), 0.0, Vec4::ONE, POINT_SIZE, 1.5);
    assert_eq!(u.params, [POINT_SIZE, 1.5, 0.0, 0.0]);
    assert_eq!(u.model, glam::Mat4::IDENTITY.to_cols_array_2d());
    assert_eq!(QUAD_CORNERS.len(), 12);
}
