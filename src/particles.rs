//! The ornament particle population.
//!
//! A [`ParticleField`] owns a fixed number of [`Particle`]s for its whole
//! lifetime. Mode changes rewrite every target in one batch; each frame,
//! [`ParticleField::step`] eases every particle toward its target and emits
//! one camera-facing [`Instance`] per particle.
//!
//! # Relaxation
//!
//! The ease is a plain lerp by the particle's fixed `relaxation_rate` per
//! call. It is tied to frame cadence, not wall-clock time: at 60 fps a rate of
//! 0.03 closes about 84% of the gap per second. Because rates differ between
//! particles, arrivals are staggered.

use glam::{Quat, Vec2, Vec3};
use rand::Rng;
use std::f32::consts::TAU;

use crate::camera::billboard_rotation;
use crate::instance::Instance;
use crate::mode::SceneMode;
use crate::palette;
use crate::shapes;

/// Half-size of the cube particles start in.
const SPAWN_HALF_EXTENT: f32 = 30.0;
/// Range of per-particle relaxation rates.
const MIN_RELAXATION_RATE: f32 = 0.015;
const MAX_RELAXATION_RATE: f32 = 0.055;

const BOB_AMPLITUDE: f32 = 0.02;
const TWINKLE_FREQUENCY: f32 = 3.0;

/// Auto-rotation rates of the whole field, radians per second.
const TREE_SPIN_RATE: f32 = 0.2;
const EXPLODE_SPIN_RATE: f32 = 0.05;

/// A single ornament.
///
/// Only `position` and `target` change after creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Current position, eased toward `target` every step.
    pub position: Vec3,
    /// Position the particle is heading to.
    pub target: Vec3,
    /// Offset from the pointer used in Explode and Image modes.
    pub explode_offset: Vec3,
    /// Fraction of the remaining distance covered per step.
    pub relaxation_rate: f32,
    /// Phase of the scale twinkle, in [0, 2π).
    pub twinkle_phase: f32,
    /// Index into [`palette::ORNAMENT_HEX`].
    pub color_index: usize,
}

impl Particle {
    /// Create a particle at a random spot with random fixed attributes.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut coord = || rng.gen_range(-SPAWN_HALF_EXTENT..SPAWN_HALF_EXTENT);
        let position = Vec3::new(coord(), coord(), coord());
        Self {
            position,
            target: Vec3::ZERO,
            explode_offset: Vec3::ZERO,
            relaxation_rate: rng.gen_range(MIN_RELAXATION_RATE..MAX_RELAXATION_RATE),
            twinkle_phase: rng.gen_range(0.0..TAU),
            color_index: rng.gen_range(0..palette::ORNAMENT_COUNT),
        }
    }
}

/// Move `current` a fraction `rate` of the way toward `target`.
#[inline]
pub fn relax(current: Vec3, target: Vec3, rate: f32) -> Vec3 {
    current + (target - current) * rate
}

/// Fixed-size particle population.
#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
    instances: Vec<Instance>,
}

impl ParticleField {
    /// Allocate `count` particles with random start positions and attributes.
    pub fn new<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        let particles = (0..count).map(|_| Particle::random(rng)).collect();
        Self {
            particles,
            instances: Vec::with_capacity(count),
        }
    }

    /// Number of particles.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether the field has no particles.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Read-only view of every particle.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Instances produced by the last [`step`](Self::step).
    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    /// Retarget every particle onto the tree cone.
    pub fn shape_tree<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for p in &mut self.particles {
            p.target = shapes::tree_target(rng);
        }
    }

    /// Draw fresh explosion offsets and target them around the origin.
    ///
    /// While an Explode or Image step runs, the targets follow the pointer.
    pub fn shape_explode<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for p in &mut self.particles {
            p.explode_offset = shapes::explode_offset(rng);
            p.target = p.explode_offset;
        }
    }

    /// Retarget particle `i` onto `cloud[i]`; the rest go to the ring.
    pub fn shape_cloud<R: Rng + ?Sized>(&mut self, cloud: &[Vec3], rng: &mut R) {
        let mut targets = vec![Vec3::ZERO; self.particles.len()];
        shapes::fill_from_cloud(&mut targets, cloud, rng);
        for (p, target) in self.particles.iter_mut().zip(targets) {
            p.target = target;
        }
    }

    /// Advance every particle by one frame.
    ///
    /// * `time` - scene time in seconds, drives bob and twinkle
    /// * `pointer` - pointer on the scene plane, the explosion center
    /// * `eye` - camera position every particle turns to face
    pub fn step(&mut self, time: f32, mode: SceneMode, pointer: Vec3, eye: Vec3) -> &[Instance] {
        let follow = mode.follows_pointer();
        let amplitude = mode.twinkle_amplitude();

        self.instances.clear();
        for p in &mut self.particles {
            if follow {
                p.target = p.explode_offset + pointer;
            }
            p.position = relax(p.position, p.target, p.relaxation_rate);

            let bob = (time + p.position.x * 0.5).sin() * BOB_AMPLITUDE;
            let position = Vec3::new(p.position.x, p.position.y + bob, p.position.z);
            let scale = 1.0 + (time * TWINKLE_FREQUENCY + p.twinkle_phase).sin() * amplitude;

            self.instances.push(Instance {
                position,
                scale,
                rotation: billboard_rotation(position, eye),
                color: palette::ornament(p.color_index),
            });
        }
        &self.instances
    }
}

/// Yaw and tilt the pointer adds in Tree mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSway {
    /// Rotation about the vertical axis, radians.
    pub yaw: f32,
    /// Rotation about the horizontal axis, radians.
    pub tilt: f32,
}

impl PointerSway {
    /// Sway for a pointer at normalized coordinates `ndc`.
    pub fn from_ndc(ndc: Vec2) -> Self {
        Self {
            yaw: ndc.x * 1.5,
            tilt: -ndc.y * 0.5,
        }
    }

    /// Rotation tilting first, then yawing.
    pub fn rotation(&self, extra_yaw: f32) -> Quat {
        Quat::from_rotation_x(self.tilt) * Quat::from_rotation_y(self.yaw + extra_yaw)
    }
}

/// Rotation of the whole particle field.
///
/// Tree mode spins slowly and sways with the pointer; Explode and Image spin
/// even slower with no tilt; Text stays put.
pub fn field_rotation(mode: SceneMode, time: f32, pointer_ndc: Vec2) -> Quat {
    match mode {
        SceneMode::Tree => PointerSway::from_ndc(pointer_ndc).rotation(time * TREE_SPIN_RATE),
        SceneMode::Explode | SceneMode::Image => Quat::from_rotation_y(time * EXPLODE_SPIN_RATE),
        SceneMode::Text => Quat::IDENTITY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn field(count: usize, seed: u64) -> (ParticleField, StdRng) {
        let mut rng = StdRng::seed_from_u64(seed);
        let field = ParticleField::new(count, &mut rng);
        (field, rng)
    }

    #[test]
    fn test_fixed_attributes_in_range() {
        let (field, _) = field(2000, 1);
        for p in field.particles() {
            assert!(p.relaxation_rate >= MIN_RELAXATION_RATE && p.relaxation_rate < MAX_RELAXATION_RATE);
            assert!(p.twinkle_phase >= 0.0 && p.twinkle_phase < TAU);
            assert!(p.color_index < palette::ORNAMENT_COUNT);
            assert!(p.position.abs().max_element() <= SPAWN_HALF_EXTENT);
        }
    }

    #[test]
    fn test_relaxation_never_overshoots() {
        let target = Vec3::new(4.0, -2.0, 7.0);
        let mut current = Vec3::new(-20.0, 15.0, 3.0);
        let mut last = current.distance(target);
        for _ in 0..2000 {
            current = relax(current, target, 0.015);
            let d = current.distance(target);
            if last > 1e-3 {
                assert!(d < last);
            }
            assert!(d <= last);
            last = d;
        }
        assert!(last < 1e-3);
    }

    #[test]
    fn test_step_only_moves_position_and_target() {
        let (mut field, mut rng) = field(200, 2);
        field.shape_explode(&mut rng);
        let before = field.particles().to_vec();

        field.step(1.0, SceneMode::Explode, Vec3::new(3.0, 1.0, 0.0), Vec3::Z * 30.0);

        for (a, b) in before.iter().zip(field.particles()) {
            assert_eq!(a.explode_offset, b.explode_offset);
            assert_eq!(a.relaxation_rate, b.relaxation_rate);
            assert_eq!(a.twinkle_phase, b.twinkle_phase);
            assert_eq!(a.color_index, b.color_index);
        }
    }

    #[test]
    fn test_explode_targets_follow_pointer() {
        let (mut field, mut rng) = field(100, 3);
        field.shape_explode(&mut rng);
        let pointer = Vec3::new(5.0, -3.0, 0.0);
        field.step(0.0, SceneMode::Image, pointer, Vec3::Z * 30.0);
        for p in field.particles() {
            assert!((p.target - (p.explode_offset + pointer)).length() < 1e-5);
        }
    }

    #[test]
    fn test_tree_targets_ignore_pointer() {
        let (mut field, mut rng) = field(100, 4);
        field.shape_tree(&mut rng);
        let targets: Vec<_> = field.particles().iter().map(|p| p.target).collect();
        field.step(0.0, SceneMode::Tree, Vec3::new(9.0, 9.0, 0.0), Vec3::Z * 30.0);
        let after: Vec<_> = field.particles().iter().map(|p| p.target).collect();
        assert_eq!(targets, after);
    }

    #[test]
    fn test_step_emits_one_billboard_per_particle() {
        let (mut field, mut rng) = field(50, 5);
        field.shape_tree(&mut rng);
        let eye = Vec3::new(0.0, 5.0, 30.0);
        let instances = field.step(0.7, SceneMode::Tree, Vec3::ZERO, eye).to_vec();

        assert_eq!(instances.len(), 50);
        for (instance, p) in instances.iter().zip(field.particles()) {
            let facing = instance.rotation * Vec3::Z;
            assert!(facing.distance((eye - instance.position).normalize()) < 1e-3);
            assert!((instance.position.y - p.position.y).abs() <= BOB_AMPLITUDE + 1e-6);
            assert!(instance.scale >= 0.4 - 1e-6 && instance.scale <= 1.6 + 1e-6);
            assert_eq!(instance.color, palette::ornament(p.color_index));
        }
    }

    #[test]
    fn test_twinkle_amplitude_by_mode() {
        let (mut field, mut rng) = field(500, 6);
        field.shape_tree(&mut rng);
        let max_scale = |instances: &[Instance]| instances.iter().map(|i| i.scale).fold(0.0, f32::max);

        let tree = max_scale(field.step(0.3, SceneMode::Tree, Vec3::ZERO, Vec3::Z));
        let text = max_scale(field.step(0.3, SceneMode::Text, Vec3::ZERO, Vec3::Z));
        assert!(tree > 1.4 + 1e-3);
        assert!(text <= 1.4 + 1e-6);
    }

    #[test]
    fn test_cloud_assignment_and_ring() {
        let (mut field, mut rng) = field(100, 7);
        let cloud: Vec<Vec3> = (0..40).map(|i| Vec3::new(i as f32 * 0.1, 1.0, 0.0)).collect();
        field.shape_cloud(&cloud, &mut rng);

        for (i, p) in field.particles().iter().enumerate() {
            if i < cloud.len() {
                assert_eq!(p.target, cloud[i]);
            } else {
                let radial = Vec2::new(p.target.x, p.target.z).length();
                assert!((shapes::RING_MIN_RADIUS - 1e-3..=shapes::RING_MAX_RADIUS + 1e-3).contains(&radial));
            }
        }
    }

    #[test]
    fn test_field_rotation_per_mode() {
        let pointer = Vec2::new(0.4, -0.6);
        assert_eq!(field_rotation(SceneMode::Text, 12.0, pointer), Quat::IDENTITY);

        let explode = field_rotation(SceneMode::Explode, 10.0, pointer);
        assert!(explode.abs_diff_eq(Quat::from_rotation_y(0.5), 1e-6));

        let tree = field_rotation(SceneMode::Tree, 10.0, pointer);
        let expected = Quat::from_rotation_x(0.3) * Quat::from_rotation_y(2.0 + 0.6);
        assert!(tree.abs_diff_eq(expected, 1e-5));
    }
}
