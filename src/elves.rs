//! Orbiting elves.
//!
//! Elves are decoration for Tree mode only. Each one circles the vertical
//! axis on its own periodic path; positions are derived from time alone and
//! never stored.

use glam::{Quat, Vec3};
use rand::Rng;
use std::f32::consts::TAU;

use crate::instance::Instance;
use crate::mode::SceneMode;
use crate::palette;

/// One orbiting agent. All fields are fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitAgent {
    /// Orbit rate in radians per second; negative orbits run backwards.
    pub angular_speed: f32,
    /// Mean distance from the vertical axis.
    pub orbit_radius: f32,
    /// Mean height.
    pub base_height: f32,
    /// Shared phase of every oscillation.
    pub phase: f32,
    /// Rate of the vertical drift.
    pub vertical_speed: f32,
    /// sRGB color.
    pub color: Vec3,
}

impl OrbitAgent {
    /// Create an agent with random orbit parameters and an icy tint.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            angular_speed: (rng.gen::<f32>() - 0.5) * 1.5,
            orbit_radius: rng.gen_range(5.0..17.0),
            base_height: (rng.gen::<f32>() - 0.5) * 20.0,
            phase: rng.gen_range(0.0..TAU),
            vertical_speed: rng.gen_range(1.0..3.0),
            color: palette::hsl_to_rgb(rng.gen_range(0.5..0.6), 1.0, 0.7),
        }
    }

    /// Position at `time`.
    pub fn position(&self, time: f32) -> Vec3 {
        let angle = time * self.angular_speed + self.phase;
        let radius = self.orbit_radius + (time * 2.0 + self.phase).sin() * 0.5;
        let height = self.base_height + (time * self.vertical_speed * 0.3 + self.phase).sin() * 4.0;
        Vec3::new(angle.cos() * radius, height, angle.sin() * radius)
    }

    /// Full transform at `time`: tumbling on X and Y, pulsing in size.
    pub fn instance(&self, time: f32) -> Instance {
        Instance {
            position: self.position(time),
            scale: 1.0 + (time * 5.0 + self.phase).sin() * 0.3,
            rotation: Quat::from_rotation_x(time * 2.0) * Quat::from_rotation_y(time * 2.0),
            color: self.color,
        }
    }
}

/// Fixed-size elf population.
#[derive(Debug, Clone)]
pub struct OrbitAgents {
    agents: Vec<OrbitAgent>,
    instances: Vec<Instance>,
}

impl OrbitAgents {
    /// Allocate `count` agents.
    pub fn new<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        Self {
            agents: (0..count).map(|_| OrbitAgent::random(rng)).collect(),
            instances: Vec::with_capacity(count),
        }
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn agents(&self) -> &[OrbitAgent] {
        &self.agents
    }

    /// Instances produced by the last [`step`](Self::step).
    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    /// Compute this frame's instances. Empty outside Tree mode.
    pub fn step(&mut self, time: f32, mode: SceneMode) -> &[Instance] {
        self.instances.clear();
        if mode.shows_decorations() {
            self.instances
                .extend(self.agents.iter().map(|agent| agent.instance(time)));
        }
        &self.instances
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn agent() -> OrbitAgent {
        OrbitAgent {
            angular_speed: -0.5,
            orbit_radius: 10.0,
            base_height: 2.0,
            phase: 0.0,
            vertical_speed: 2.0,
            color: Vec3::ONE,
        }
    }

    #[test]
    fn test_position_at_time_zero() {
        let p = agent().position(0.0);
        assert!(p.distance(Vec3::new(10.0, 2.0, 0.0)) < 1e-5);
    }

    #[test]
    fn test_position_stays_in_band() {
        let a = agent();
        for i in 0..1000 {
            let p = a.position(i as f32 * 0.05);
            let radial = (p.x * p.x + p.z * p.z).sqrt();
            assert!((9.5 - 1e-4..=10.5 + 1e-4).contains(&radial));
            assert!((-2.0 - 1e-4..=6.0 + 1e-4).contains(&p.y));
        }
    }

    #[test]
    fn test_negative_speed_orbits_backwards() {
        let a = agent();
        // Quarter of a second in, the angle has gone negative: z < 0.
        assert!(a.position(0.25).z < 0.0);
    }

    #[test]
    fn test_random_ranges() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..500 {
            let a = OrbitAgent::random(&mut rng);
            assert!(a.angular_speed.abs() <= 0.75);
            assert!((5.0..17.0).contains(&a.orbit_radius));
            assert!(a.base_height.abs() <= 10.0);
            assert!((1.0..3.0).contains(&a.vertical_speed));
        }
    }

    #[test]
    fn test_hidden_outside_tree() {
        let mut rng = StdRng::seed_from_u64(10);
        let mut elves = OrbitAgents::new(50, &mut rng);
        assert_eq!(elves.step(1.0, SceneMode::Tree).len(), 50);
        for mode in [SceneMode::Explode, SceneMode::Image, SceneMode::Text] {
            assert!(elves.step(1.0, mode).is_empty());
        }
    }

    #[test]
    fn test_scale_pulse_bounds() {
        let a = agent();
        for i in 0..200 {
            let s = a.instance(i as f32 * 0.1).scale;
            assert!((0.7 - 1e-5..=1.3 + 1e-5).contains(&s));
        }
    }
}
