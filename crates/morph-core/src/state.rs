//! Visual-side state types shared with the frontends.
//!
//! These types avoid referencing platform-specific APIs and are suitable for
//! use on both native and web targets. Frontends consume them to build the
//! uniforms of the point renderer.

use crate::constants::{CAMERA_FOVY, CAMERA_Z};
use glam::{Mat4, Vec3, Vec4};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, CAMERA_Z),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: 16.0 / 9.0,
            fovy_radians: CAMERA_FOVY,
            znear: 0.1,
            zfar: 100.0,
        }
    }
}

impl Camera {
    /// Aspect from a pixel size; zero-height surfaces keep the previous aspect.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }
    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }
}

/// Model transform for the whole field: a rotation about +Y.
#[inline]
pub fn field_model_matrix(rotation_y: f32) -> Mat4 {
    Mat4::from_rotation_y(rotation_y)
}

/// GPU uniform block for the point shader (`points.wgsl`).
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointUniforms {
    pub proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    /// x: billboard size, y: animation time, zw: unused
    pub params: [f32; 4],
}

impl PointUniforms {
    pub fn new(camera: &Camera, rotation_y: f32, color: Vec4, point_size: f32, time: f32) -> Self {
        Self {
            proj: camera.projection_matrix().to_cols_array_2d(),
            view: camera.view_matrix().to_cols_array_2d(),
            model: field_model_matrix(rotation_y).to_cols_array_2d(),
            color: color.to_array(),
            params: [point_size, time, 0.0, 0.0],
        }
    }
}

/// Corner offsets of one billboard quad (two triangles), in units of the point size.
pub const QUAD_CORNERS: [f32; 12] = [
    -0.5, -0.5, 0.5, -0.5, 0.5, 0.5, -0.5, -0.5, 0.5, 0.5, -0.5, 0.5,
];
