//! Orbit camera for viewing the cloud.
//!
//! The camera is a collaborator, not part of the transition core: the cloud
//! only needs its view-projection matrix to unproject the pointer.

use crate::interaction::pointer_ray;
use crate::ray::Ray;
use glam::{Mat4, Vec2, Vec3};

/// Perspective orbit camera.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Vertical rotation angle in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Facing the grid head-on from +Z, 300 units out.
    pub fn new() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: 300.0,
            target: Vec3::ZERO,
            fov_y: 75.0_f32.to_radians(),
            near: 0.1,
            far: 10_000.0,
        }
    }

    /// The camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect.max(f32::EPSILON), self.near, self.far)
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        self.projection(aspect) * self.view_matrix()
    }

    /// Pointer ray for `ndc`, or `None` when the pointer is off canvas.
    pub fn ray_from_ndc(&self, ndc: Vec2, aspect: f32) -> Option<Ray> {
        pointer_ray(self.view_proj(aspect).inverse(), ndc)
    }

    /// Rotate by a mouse drag of `delta` pixels.
    pub fn orbit(&mut self, delta: Vec2) {
        self.yaw -= delta.x * 0.005;
        self.pitch = (self.pitch + delta.y * 0.005).clamp(-1.5, 1.5);
    }

    /// Dolly in or out by `scroll` wheel lines.
    pub fn zoom(&mut self, scroll: f32) {
        self.distance = (self.distance * (1.0 - scroll * 0.1)).clamp(5.0, 5_000.0);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
