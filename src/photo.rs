//! Uploaded photos and their on-screen transform.
//!
//! The scene only cares whether a photo exists; it gates Image mode. The
//! pixels and the [`PhotoView`] pan/zoom/rotate state belong to the front end,
//! which draws the photo as a flat quad over the particles.
//!
//! # Supported Formats
//!
//! - PNG
//! - JPEG

use std::path::Path;

use glam::{Mat4, Quat, Vec2, Vec3};
use image::imageops::FilterType;
use image::DynamicImage;

use crate::error::PhotoError;
use crate::mode::SceneMode;

/// Photos larger than this on either side are downscaled on load.
pub const MAX_PHOTO_SIDE: u32 = 2048;

/// Largest share of the viewport the unscaled photo may cover on each axis.
const VIEWPORT_FILL: f32 = 0.6;

const MIN_ZOOM: f32 = 0.2;
const MAX_ZOOM: f32 = 3.0;
const ZOOM_PER_WHEEL_PIXEL: f32 = -0.001;
const DEGREES_PER_DRAG_PIXEL: f32 = 0.2;

/// Decoded RGBA8 photo.
#[derive(Debug, Clone)]
pub struct Photo {
    /// Raw RGBA pixel data (width * height * 4 bytes).
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl Photo {
    /// Load a photo from an image file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PhotoError> {
        let img = image::open(path.as_ref())?;
        log::info!(
            "Loaded photo {} ({}x{})",
            path.as_ref().display(),
            img.width(),
            img.height()
        );
        Ok(Self::from_image(img))
    }

    /// Decode a photo from encoded PNG or JPEG bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PhotoError> {
        Ok(Self::from_image(image::load_from_memory(bytes)?))
    }

    fn from_image(img: DynamicImage) -> Self {
        let img = if img.width() > MAX_PHOTO_SIDE || img.height() > MAX_PHOTO_SIDE {
            img.resize(MAX_PHOTO_SIDE, MAX_PHOTO_SIDE, FilterType::Triangle)
        } else {
            img
        };
        let rgba = img.into_rgba8();
        let (width, height) = rgba.dimensions();
        Self {
            data: rgba.into_raw(),
            width,
            height,
        }
    }

    /// Width divided by height.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// User-controlled display transform of the photo.
///
/// Offsets are screen pixels (+Y down), rotations are degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhotoView {
    pub offset: Vec2,
    pub rotation_x: f32,
    pub rotation_y: f32,
    pub zoom: f32,
}

impl PhotoView {
    pub fn new() -> Self {
        Self {
            offset: Vec2::ZERO,
            rotation_x: 0.0,
            rotation_y: 0.0,
            zoom: 1.0,
        }
    }

    /// Move by a pointer drag of `delta` pixels.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Tilt by a pointer drag of `delta` pixels.
    pub fn rotate(&mut self, delta: Vec2) {
        self.rotation_y += delta.x * DEGREES_PER_DRAG_PIXEL;
        self.rotation_x -= delta.y * DEGREES_PER_DRAG_PIXEL;
    }

    /// Apply a wheel scroll of `delta_y` pixels (positive scrolls down).
    pub fn zoom_by(&mut self, delta_y: f32) {
        self.zoom = (self.zoom + delta_y * ZOOM_PER_WHEEL_PIXEL).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Reset unless `mode` shows the photo.
    pub fn sync_mode(&mut self, mode: SceneMode) {
        if mode != SceneMode::Image {
            self.reset();
        }
    }

    /// Map a unit quad ([-0.5, 0.5]², +Y up) to clip space.
    ///
    /// The photo is fitted into 60% of the viewport without upscaling, then
    /// zoomed, rotated and offset. Depth is flattened, so rotations read as
    /// an orthographic tilt.
    pub fn clip_transform(&self, photo_size: Vec2, viewport: Vec2) -> Mat4 {
        let fit = (viewport * VIEWPORT_FILL / photo_size.max(Vec2::ONE))
            .min_element()
            .min(1.0);
        let size = photo_size * fit;

        let to_clip = Mat4::from_scale(Vec3::new(
            2.0 / viewport.x.max(1.0),
            2.0 / viewport.y.max(1.0),
            0.0,
        ));
        let offset = Mat4::from_translation(Vec3::new(self.offset.x, -self.offset.y, 0.0));
        let rotation = Mat4::from_quat(
            Quat::from_rotation_x(self.rotation_x.to_radians())
                * Quat::from_rotation_y(self.rotation_y.to_radians()),
        );
        let scale = Mat4::from_scale(Vec3::new(size.x * self.zoom, size.y * self.zoom, 1.0));

        to_clip * offset * rotation * scale
    }
}

impl Default for PhotoView {
    fn default() -> Self {
        Self::new()
    }
}
