//! Per-instance render transforms.
//!
//! This is the whole contract between the simulation and a renderer: one
//! [`Instance`] per visible element per frame, plus a group rotation per
//! population (see [`Frame`](crate::Frame)).

use glam::{Mat4, Quat, Vec3};

/// Transform and color of one drawn element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Instance {
    /// Position in the population's local space.
    pub position: Vec3,
    /// Uniform scale factor.
    pub scale: f32,
    /// Orientation.
    pub rotation: Quat,
    /// sRGB color in [0, 1].
    pub color: Vec3,
}

impl Instance {
    /// Local-to-group model matrix.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), self.rotation, self.position)
    }
}
