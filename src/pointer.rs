//! Pointer projection into the scene.
//!
//! The window layer writes the latest normalized pointer position whenever
//! the cursor moves; the frame loop calls [`PointerTracker::update`] once per
//! frame to turn it into a world-space forcing point.

use glam::{Vec2, Vec3};

use crate::camera::{Camera, Plane};

/// Last-known pointer position, in screen space and on the scene plane.
#[derive(Debug, Clone)]
pub struct PointerTracker {
    ndc: Vec2,
    world: Vec3,
    plane: Plane,
}

impl PointerTracker {
    /// Create a tracker centered on screen, projecting onto the z = 0 plane.
    pub fn new() -> Self {
        Self {
            ndc: Vec2::ZERO,
            world: Vec3::ZERO,
            plane: Plane::FACING_Z,
        }
    }

    /// Record a new pointer position in normalized device coordinates.
    ///
    /// Values are clamped to [-1, 1].
    pub fn set_ndc(&mut self, ndc: Vec2) {
        self.ndc = ndc.clamp(Vec2::NEG_ONE, Vec2::ONE);
    }

    /// Pointer position in normalized device coordinates.
    pub fn ndc(&self) -> Vec2 {
        self.ndc
    }

    /// Last successfully projected world position.
    pub fn world(&self) -> Vec3 {
        self.world
    }

    /// Re-project the pointer through `camera` and return the world point.
    ///
    /// If the ray misses the plane the previous point is kept.
    pub fn update(&mut self, camera: &Camera) -> Vec3 {
        if let Some(hit) = camera.ray_through(self.ndc).intersect_plane(&self.plane) {
            self.world = hit;
        }
        self.world
    }
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self::new()
    }
}
