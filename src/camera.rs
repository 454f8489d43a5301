//! Camera parameters and the pure geometry built on them.
//!
//! Nothing here holds renderer state. Pointer projection and billboarding are
//! plain functions over an explicit [`Camera`], so the simulation can be
//! tested without a window.

use glam::{Mat3, Mat4, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Perspective camera looking along a fixed direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Camera {
    /// Eye position in world space.
    pub position: Vec3,
    /// View direction (need not be normalized).
    pub forward: Vec3,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    /// Viewport width divided by height.
    pub aspect: f32,
    /// Near clip distance.
    pub near: f32,
    /// Far clip distance.
    pub far: f32,
}

impl Camera {
    /// Create the scene's default camera: at (0, 5, 30) looking down -Z.
    pub fn new() -> Self {
        Self {
            position: Vec3::new(0.0, 5.0, 30.0),
            forward: Vec3::NEG_Z,
            fov_y_degrees: 75.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }

    /// Update the aspect ratio after a resize. Zero-sized viewports are ignored.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward, Vec3::Y)
    }

    /// Calculate the projection matrix for rendering.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        )
    }

    /// Combined projection * view matrix.
    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Ray from the eye through a point in normalized device coordinates.
    ///
    /// `ndc` is in [-1, 1] on both axes with +Y up.
    pub fn ray_through(&self, ndc: Vec2) -> Ray {
        let inverse = self.view_proj().inverse();
        let through = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 0.5));
        Ray {
            origin: self.position,
            direction: (through - self.position).normalize_or_zero(),
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// Half-line with a normalized direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Intersection with `plane`, if it lies in front of the origin.
    ///
    /// Returns `None` when the ray is parallel to the plane or points away
    /// from it.
    pub fn intersect_plane(&self, plane: &Plane) -> Option<Vec3> {
        let denom = plane.normal.dot(self.direction);
        if denom.abs() <= f32::EPSILON {
            return None;
        }
        let t = -(self.origin.dot(plane.normal) + plane.constant) / denom;
        if t < 0.0 {
            return None;
        }
        Some(self.origin + self.direction * t)
    }
}

/// Plane `normal · p + constant = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub constant: f32,
}

impl Plane {
    /// The z = 0 plane, facing a camera on the +Z side.
    pub const FACING_Z: Plane = Plane {
        normal: Vec3::Z,
        constant: 0.0,
    };
}

/// Rotation that turns local +Z toward `eye` from `position`.
///
/// Keeps local +Y as close to world up as possible. When the eye sits
/// directly above or below, an arbitrary but stable roll is used.
pub fn billboard_rotation(position: Vec3, eye: Vec3) -> Quat {
    let z = (eye - position).normalize_or_zero();
    if z == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    let mut x = Vec3::Y.cross(z);
    if x.length_squared() < 1e-8 {
        x = Vec3::Z.cross(z);
    }
    let x = x.normalize();
    let y = z.cross(x);
    Quat::from_mat3(&Mat3::from_cols(x, y, z))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_ray_hits_origin_plane_below_eye() {
        let camera = Camera::new();
        let hit = camera
            .ray_through(Vec2::ZERO)
            .intersect_plane(&Plane::FACING_Z)
            .unwrap();

        // Camera looks straight down -Z, so the center ray keeps x and y.
        assert!(hit.x.abs() < 1e-3);
        assert!((hit.y - 5.0).abs() < 1e-3);
        assert!(hit.z.abs() < 1e-3);
    }

    #[test]
    fn test_right_edge_projects_to_positive_x() {
        let camera = Camera::new();
        let hit = camera
            .ray_through(Vec2::new(1.0, 0.0))
            .intersect_plane(&Plane::FACING_Z)
            .unwrap();

        // Half-width of the frustum at distance 30.
        let half_height = 30.0 * (37.5_f32).to_radians().tan();
        assert!((hit.x - half_height * camera.aspect).abs() < 1e-2);
    }

    #[test]
    fn test_parallel_ray_misses() {
        let ray = Ray {
            origin: Vec3::new(0.0, 0.0, 5.0),
            direction: Vec3::X,
        };
        assert_eq!(ray.intersect_plane(&Plane::FACING_Z), None);
    }

    #[test]
    fn test_plane_behind_ray_misses() {
        let ray = Ray {
            origin: Vec3::new(0.0, 0.0, 5.0),
            direction: Vec3::Z,
        };
        assert_eq!(ray.intersect_plane(&Plane::FACING_Z), None);
    }

    #[test]
    fn test_billboard_faces_eye() {
        let position = Vec3::new(3.0, -2.0, 1.0);
        let eye = Vec3::new(0.0, 5.0, 30.0);
        let rotation = billboard_rotation(position, eye);

        let facing = rotation * Vec3::Z;
        let expected = (eye - position).normalize();
        assert!(facing.distance(expected) < 1e-4);
        assert!((rotation * Vec3::Y).y > 0.0);
    }

    #[test]
    fn test_billboard_degenerate_cases() {
        assert_eq!(billboard_rotation(Vec3::ONE, Vec3::ONE), Quat::IDENTITY);

        let rotation = billboard_rotation(Vec3::ZERO, Vec3::new(0.0, 10.0, 0.0));
        assert!((rotation * Vec3::Z).distance(Vec3::Y) < 1e-4);
    }

    #[test]
    fn test_set_viewport_ignores_zero() {
        let mut camera = Camera::new();
        camera.set_viewport(800, 400);
        assert_eq!(camera.aspect, 2.0);
        camera.set_viewport(0, 400);
        assert_eq!(camera.aspect, 2.0);
    }
}
