//! Target shapes for each display mode.
//!
//! Every function here is pure apart from the random source it is handed, so
//! the shapes are reproducible with a seeded RNG.
//!
//! | Shape | Distribution |
//! |-------|--------------|
//! | [`tree_target`] | Cone from y = -10 to y = 12, mostly on the outer shell |
//! | [`explode_offset`] | Uniform direction, radius 10..30 |
//! | [`ring_target`] | Background ring, radius 30..40, height -20..20 |

use glam::Vec3;
use rand::Rng;
use std::f32::consts::TAU;

/// Bottom of the tree cone.
pub const TREE_BASE_Y: f32 = -10.0;
/// Height of the tree cone (tip at y = 12).
pub const TREE_HEIGHT: f32 = 22.0;
/// Cone radius at the base, excluding the tip radius.
pub const TREE_BASE_RADIUS: f32 = 9.0;
/// Radius left at the very tip.
pub const TREE_TIP_RADIUS: f32 = 0.2;
/// Total span of the per-axis jitter added to tree points.
pub const TREE_JITTER: f32 = 0.4;
/// Share of tree points placed near the outer shell.
const TREE_SHELL_PROBABILITY: f32 = 0.7;

/// Explosion shell radii.
pub const EXPLODE_MIN_RADIUS: f32 = 10.0;
pub const EXPLODE_MAX_RADIUS: f32 = 30.0;

/// Background ring for particles a text cloud cannot use.
pub const RING_MIN_RADIUS: f32 = 30.0;
pub const RING_MAX_RADIUS: f32 = 40.0;
pub const RING_HALF_HEIGHT: f32 = 20.0;

/// Maximum cone radius at height fraction `h` (0 = base, 1 = tip).
pub fn tree_max_radius(h: f32) -> f32 {
    (1.0 - h) * TREE_BASE_RADIUS + TREE_TIP_RADIUS
}

/// Random point on or inside the tree cone.
pub fn tree_target<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let h: f32 = rng.gen();
    let y = TREE_BASE_Y + h * TREE_HEIGHT;
    let max_radius = tree_max_radius(h);
    let angle = rng.gen_range(0.0..TAU);

    let r = if rng.gen::<f32>() < TREE_SHELL_PROBABILITY {
        max_radius * (0.6 + 0.4 * rng.gen::<f32>())
    } else {
        // sqrt for uniform disk fill
        max_radius * rng.gen::<f32>().sqrt()
    };

    Vec3::new(
        angle.cos() * r + jitter(rng),
        y + jitter(rng),
        angle.sin() * r + jitter(rng),
    )
}

/// Random explosion offset: uniform direction, radius in [10, 30).
pub fn explode_offset<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let r = rng.gen_range(EXPLODE_MIN_RADIUS..EXPLODE_MAX_RADIUS);
    let theta = rng.gen_range(0.0..TAU);
    // acos(2u - 1) gives a uniform direction, not a pole-heavy one.
    let phi = (rng.gen::<f32>() * 2.0 - 1.0).acos();

    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    )
}

/// Random point on the background ring around the vertical axis.
pub fn ring_target<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let r = rng.gen_range(RING_MIN_RADIUS..RING_MAX_RADIUS);
    let theta = rng.gen_range(0.0..TAU);
    let y = rng.gen_range(-RING_HALF_HEIGHT..RING_HALF_HEIGHT);
    Vec3::new(theta.cos() * r, y, theta.sin() * r)
}

/// Assign `cloud[i]` to `targets[i]`; leftover targets go to the ring.
///
/// Cloud points beyond `targets.len()` are dropped.
pub fn fill_from_cloud<R: Rng + ?Sized>(targets: &mut [Vec3], cloud: &[Vec3], rng: &mut R) {
    for (i, target) in targets.iter_mut().enumerate() {
        *target = match cloud.get(i) {
            Some(point) => *point,
            None => ring_target(rng),
        };
    }
}

fn jitter<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    (rng.gen::<f32>() - 0.5) * TREE_JITTER
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_tree_within_cone() {
        let mut rng = StdRng::seed_from_u64(1);
        let half_jitter = TREE_JITTER / 2.0;
        for _ in 0..5000 {
            let p = tree_target(&mut rng);
            assert!(p.y >= TREE_BASE_Y - half_jitter);
            assert!(p.y <= TREE_BASE_Y + TREE_HEIGHT + half_jitter);

            // Lowest height this point could have come from.
            let h = ((p.y - half_jitter - TREE_BASE_Y) / TREE_HEIGHT).clamp(0.0, 1.0);
            let radial = (p.x * p.x + p.z * p.z).sqrt();
            assert!(radial <= tree_max_radius(h) + half_jitter * 2.0_f32.sqrt() + 1e-4);
        }
    }

    #[test]
    fn test_tree_max_radius_endpoints() {
        assert!((tree_max_radius(0.0) - 9.2).abs() < 1e-6);
        assert!((tree_max_radius(1.0) - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_explode_offset_shell() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..5000 {
            let d = explode_offset(&mut rng).length();
            assert!(d >= EXPLODE_MIN_RADIUS - 1e-3 && d <= EXPLODE_MAX_RADIUS + 1e-3);
        }
    }

    #[test]
    fn test_explode_directions_cover_both_poles() {
        let mut rng = StdRng::seed_from_u64(3);
        let (mut up, mut down) = (0, 0);
        for _ in 0..2000 {
            let p = explode_offset(&mut rng);
            if p.z > 0.0 {
                up += 1;
            } else {
                down += 1;
            }
        }
        // Uniform directions split roughly evenly.
        assert!(up > 800 && down > 800);
    }

    #[test]
    fn test_ring_target_bounds() {
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..2000 {
            let p = ring_target(&mut rng);
            let radial = (p.x * p.x + p.z * p.z).sqrt();
            assert!(radial >= RING_MIN_RADIUS - 1e-3 && radial <= RING_MAX_RADIUS + 1e-3);
            assert!(p.y.abs() <= RING_HALF_HEIGHT);
        }
    }

    #[test]
    fn test_fill_from_cloud_truncates_and_pads() {
        let mut rng = StdRng::seed_from_u64(5);
        let cloud: Vec<Vec3> = (0..5).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect();

        let mut short = vec![Vec3::ZERO; 3];
        fill_from_cloud(&mut short, &cloud, &mut rng);
        assert_eq!(short, cloud[..3]);

        let mut long = vec![Vec3::ZERO; 8];
        fill_from_cloud(&mut long, &cloud, &mut rng);
        assert_eq!(long[..5], cloud[..]);
        for p in &long[5..] {
            assert!(Vec3::new(p.x, 0.0, p.z).length() >= RING_MIN_RADIUS - 1e-3);
        }
    }
}
