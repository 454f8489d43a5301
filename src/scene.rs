//! The scene context.
//!
//! [`Scene`] owns every piece of simulation state: both populations, the mode
//! controller, the pointer, the current greeting and whether a photo exists.
//! Front ends feed it input and call [`Scene::step`] once per frame; the
//! returned [`Frame`] is everything a renderer needs.

use glam::{Quat, Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::camera::Camera;
use crate::config::SceneConfig;
use crate::elves::OrbitAgents;
use crate::greeting::Greeting;
use crate::instance::Instance;
use crate::mode::{ModeController, SceneMode, Transition};
use crate::palette;
use crate::particles::{field_rotation, ParticleField, PointerSway};
use crate::pointer::PointerTracker;
use crate::text;

/// Tree-top star position.
pub const STAR_POSITION: Vec3 = Vec3::new(0.0, 12.0, 0.0);
const STAR_SPIN_RATE: f32 = 0.5;
/// Share of the pointer sway the elf group follows.
const ELF_SWAY: f32 = 0.5;

/// One frame of renderer input.
///
/// `particles` and `elves` are in their group's local space; apply
/// `field_rotation` and `elf_rotation` respectively. `star` is in world space.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub mode: SceneMode,
    /// Scene time in seconds.
    pub time: f32,
    pub field_rotation: Quat,
    pub particles: &'a [Instance],
    pub elf_rotation: Quat,
    /// Empty outside Tree mode.
    pub elves: &'a [Instance],
    /// `None` outside Tree mode.
    pub star: Option<Instance>,
    /// Pointer projected onto the scene plane.
    pub pointer_world: Vec3,
}

/// Simulation state for one scene.
pub struct Scene {
    camera: Camera,
    rng: StdRng,
    field: ParticleField,
    elves: OrbitAgents,
    controller: ModeController,
    pointer: PointerTracker,
    greeting: Greeting,
    has_photo: bool,
}

impl Scene {
    /// Build a scene in Tree mode, seeded from `config.seed` or from entropy.
    pub fn new(config: &SceneConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    /// Build a reproducible scene, ignoring `config.seed`.
    pub fn with_seed(config: &SceneConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &SceneConfig, mut rng: StdRng) -> Self {
        let field = ParticleField::new(config.particle_count, &mut rng);
        let elves = OrbitAgents::new(config.elf_count, &mut rng);
        let mut scene = Self {
            camera: config.camera,
            rng,
            field,
            elves,
            controller: ModeController::new(),
            pointer: PointerTracker::new(),
            greeting: Greeting::default(),
            has_photo: false,
        };
        scene.enter(SceneMode::Tree);
        log::info!(
            "Scene ready: {} particles, {} elves",
            scene.field.len(),
            scene.elves.len()
        );
        scene
    }

    pub fn mode(&self) -> SceneMode {
        self.controller.mode()
    }

    pub fn greeting(&self) -> &Greeting {
        &self.greeting
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn elves(&self) -> &OrbitAgents {
        &self.elves
    }

    pub fn pointer(&self) -> &PointerTracker {
        &self.pointer
    }

    pub fn has_photo(&self) -> bool {
        self.has_photo
    }

    /// Record whether a photo is available for Image mode.
    pub fn set_photo_available(&mut self, available: bool) {
        self.has_photo = available;
    }

    /// Record the pointer position in normalized device coordinates.
    pub fn set_pointer(&mut self, ndc: Vec2) {
        self.pointer.set_ndc(ndc);
    }

    /// Update the camera aspect after a resize.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.camera.set_viewport(width, height);
    }

    /// Move to the next mode, skipping Image when there is no photo.
    pub fn advance(&mut self) -> Transition {
        let transition = self.controller.advance(self.has_photo);
        if transition.skipped_image {
            log::warn!("No photo uploaded, skipping Image mode");
        }
        self.enter(transition.to);
        transition
    }

    /// Jump to `mode` directly.
    pub fn set_mode(&mut self, mode: SceneMode) -> Transition {
        let transition = self.controller.force(mode);
        self.enter(mode);
        transition
    }

    /// Replace the greeting and show it, whatever the current mode.
    pub fn set_greeting(&mut self, greeting: Greeting) -> Transition {
        log::info!("New greeting: {} / {}", greeting.line1, greeting.line2);
        self.greeting = greeting;
        self.set_mode(SceneMode::Text)
    }

    fn enter(&mut self, mode: SceneMode) {
        log::debug!("Entering {mode:?}");
        match mode {
            SceneMode::Tree => self.field.shape_tree(&mut self.rng),
            SceneMode::Explode | SceneMode::Image => self.field.shape_explode(&mut self.rng),
            SceneMode::Text => {
                let cloud = text::rasterize(&self.greeting.line1, &self.greeting.line2);
                if cloud.len() > self.field.len() {
                    log::debug!(
                        "Text cloud has {} points, truncating to {}",
                        cloud.len(),
                        self.field.len()
                    );
                }
                self.field.shape_cloud(&cloud, &mut self.rng);
            }
        }
    }

    /// Advance the simulation to `time` seconds and return the frame.
    pub fn step(&mut self, time: f32) -> Frame<'_> {
        let mode = self.controller.mode();
        let pointer_world = self.pointer.update(&self.camera);
        let sway = PointerSway::from_ndc(self.pointer.ndc());

        let particles = self
            .field
            .step(time, mode, pointer_world, self.camera.position);
        let elves = self.elves.step(time, mode);

        let (elf_rotation, star) = if mode.shows_decorations() {
            let elf_rotation = Quat::from_rotation_x(sway.tilt * ELF_SWAY)
                * Quat::from_rotation_y(sway.yaw * ELF_SWAY);
            let star = Instance {
                position: STAR_POSITION,
                scale: 1.0 + (time * 3.0).sin() * 0.2,
                rotation: sway.rotation(time * STAR_SPIN_RATE),
                color: palette::hex_to_rgb(palette::STAR_HEX),
            };
            (elf_rotation, Some(star))
        } else {
            (Quat::IDENTITY, None)
        };

        Frame {
            mode,
            time,
            field_rotation: field_rotation(mode, time, self.pointer.ndc()),
            particles,
            elf_rotation,
            elves,
            star,
            pointer_world,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> Scene {
        let config = SceneConfig::new()
            .with_particle_count(300)
            .with_elf_count(5);
        Scene::with_seed(&config, 42)
    }

    #[test]
    fn test_starts_in_tree_with_decorations() {
        let mut scene = scene();
        assert_eq!(scene.mode(), SceneMode::Tree);
        let frame = scene.step(0.5);
        assert_eq!(frame.particles.len(), 300);
        assert_eq!(frame.elves.len(), 5);
        let star = frame.star.unwrap();
        assert_eq!(star.position, STAR_POSITION);
        assert!((star.scale - (1.0 + 1.5f32.sin() * 0.2)).abs() < 1e-6);
    }

    #[test]
    fn test_decorations_hidden_in_other_modes() {
        let mut scene = scene();
        scene.advance();
        let frame = scene.step(1.0);
        assert_eq!(frame.mode, SceneMode::Explode);
        assert!(frame.star.is_none());
        assert!(frame.elves.is_empty());
        assert_eq!(frame.elf_rotation, Quat::IDENTITY);
    }

    #[test]
    fn test_seeded_scenes_match() {
        let config = SceneConfig::new().with_particle_count(100).with_elf_count(2);
        let a = Scene::with_seed(&config, 9);
        let b = Scene::with_seed(&config, 9);
        assert_eq!(a.field().particles(), b.field().particles());
    }

    #[test]
    fn test_config_seed_is_used() {
        let config = SceneConfig::new().with_particle_count(50).with_seed(3);
        let a = Scene::new(&config);
        let b = Scene::with_seed(&config, 3);
        assert_eq!(a.field().particles(), b.field().particles());
    }

    #[test]
    fn test_elf_group_follows_half_the_sway() {
        let mut scene = scene();
        scene.set_pointer(Vec2::new(0.4, 0.2));
        let frame = scene.step(0.0);
        let expected = Quat::from_rotation_x(-0.05) * Quat::from_rotation_y(0.3);
        assert!(frame.elf_rotation.abs_diff_eq(expected, 1e-5));
    }
}
