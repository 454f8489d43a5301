//! Scene colors.
//!
//! Colors are sRGB in [0, 1]; the renderer linearizes them.

use glam::Vec3;

/// Ornament colors a particle can be assigned at creation.
pub const ORNAMENT_HEX: [u32; 6] = [
    0xFFD700, // Gold
    0xFFEA00, // Bright yellow
    0xC41E3A, // Red
    0x165B33, // Green
    0x66FF66, // Bright green
    0xFFFFFF, // White
];

/// Tree-top star color.
pub const STAR_HEX: u32 = 0xFFD700;

/// Number of ornament colors.
pub const ORNAMENT_COUNT: usize = ORNAMENT_HEX.len();

/// Ornament color for a palette index. Out-of-range indices wrap.
pub fn ornament(index: usize) -> Vec3 {
    hex_to_rgb(ORNAMENT_HEX[index % ORNAMENT_COUNT])
}

/// Convert a 0xRRGGBB value to an RGB vector.
pub fn hex_to_rgb(hex: u32) -> Vec3 {
    let r = (hex >> 16) & 0xFF;
    let g = (hex >> 8) & 0xFF;
    let b = hex & 0xFF;
    Vec3::new(r as f32, g as f32, b as f32) / 255.0
}

/// Color from HSL values, all in [0, 1]. Hue wraps.
pub fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> Vec3 {
    let h = hue.rem_euclid(1.0);
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = c * (1.0 - ((h * 6.0) % 2.0 - 1.0).abs());
    let m = lightness - c / 2.0;

    let (r, g, b) = match (h * 6.0) as u32 % 6 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Vec3::new(r + m, g + m, b + m)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_rgb() {
        let gold = hex_to_rgb(0xFFD700);
        assert_eq!(gold.x, 1.0);
        assert!((gold.y - 215.0 / 255.0).abs() < 1e-6);
        assert_eq!(gold.z, 0.0);
    }

    #[test]
    fn test_ornament_wraps() {
        assert_eq!(ornament(0), ornament(ORNAMENT_COUNT));
        assert_eq!(ornament(5), Vec3::ONE);
    }

    #[test]
    fn test_hsl_cyan() {
        // Hue 0.5 is cyan; lightness 0.7 lifts the dark channel.
        let cyan = hsl_to_rgb(0.5, 1.0, 0.7);
        assert!((cyan.x - 0.4).abs() < 1e-4);
        assert!((cyan.y - 1.0).abs() < 1e-4);
        assert!((cyan.z - 1.0).abs() < 1e-4);
    }
}
