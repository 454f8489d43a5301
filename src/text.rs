//! Two-line text rasterization into a point cloud.
//!
//! Text is drawn white-on-black into a small off-screen [`GrayImage`] using
//! the embedded `font8x8` glyphs, then sampled on a fixed stride. Every lit
//! sample becomes one point on the z = 0 plane, in raster order:
//!
//! ```ignore
//! let cloud = festive_particles::text::rasterize("MERRY", "CHRISTMAS");
//! // cloud[0] is the top-left-most lit sample, cloud.last() the bottom-right.
//! ```
//!
//! The order matters: particle `i` takes `cloud[i]`, so the same text always
//! yields the same assignment.

use font8x8::{UnicodeFonts, BASIC_FONTS, BLOCK_FONTS, BOX_FONTS, GREEK_FONTS, LATIN_FONTS, MISC_FONTS};
use glam::Vec3;
use image::{GrayImage, Luma};

/// Off-screen canvas width in pixels.
pub const CANVAS_WIDTH: u32 = 400;
/// Off-screen canvas height in pixels.
pub const CANVAS_HEIGHT: u32 = 200;
/// Sample every n-th pixel on both axes.
pub const SAMPLE_STRIDE: usize = 2;
/// Samples brighter than this become points.
pub const BRIGHTNESS_THRESHOLD: u8 = 128;
/// World units per canvas pixel.
pub const WORLD_SCALE: f32 = 0.1;

/// Longest line (in characters) that still gets the large tier.
const LARGE_TIER_MAX_CHARS: usize = 6;
const GLYPH_SIZE: u32 = 8;

/// Font size tier, chosen from the longer of the two lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontTier {
    /// 60 px glyphs, for lines of at most 6 characters.
    Large,
    /// 40 px glyphs, for anything longer.
    Small,
}

impl FontTier {
    /// Pick the tier for a pair of lines.
    pub fn for_lines(line1: &str, line2: &str) -> Self {
        let longest = line1.chars().count().max(line2.chars().count());
        if longest > LARGE_TIER_MAX_CHARS {
            FontTier::Small
        } else {
            FontTier::Large
        }
    }

    /// Glyph cell size in pixels.
    pub fn pixel_size(self) -> u32 {
        match self {
            FontTier::Large => 60,
            FontTier::Small => 40,
        }
    }
}

/// Draw both lines onto a fresh canvas.
///
/// Lines are centered horizontally, with their centers at one third and two
/// thirds of the canvas height. Anything past the canvas edge is clipped.
pub fn render_canvas(line1: &str, line2: &str) -> GrayImage {
    let mut canvas = GrayImage::new(CANVAS_WIDTH, CANVAS_HEIGHT);
    let size = FontTier::for_lines(line1, line2).pixel_size();

    let center_x = CANVAS_WIDTH as i64 / 2;
    draw_line(&mut canvas, line1, center_x, CANVAS_HEIGHT as i64 / 3, size);
    draw_line(&mut canvas, line2, center_x, CANVAS_HEIGHT as i64 * 2 / 3, size);
    canvas
}

/// Extract lit samples from a canvas as world-space points.
///
/// Pixel (x, y) maps to `((x - w/2) * 0.1, -(y - h/2) * 0.1, 0)`.
pub fn sample_canvas(canvas: &GrayImage) -> Vec<Vec3> {
    let (width, height) = canvas.dimensions();
    let half_w = width as f32 / 2.0;
    let half_h = height as f32 / 2.0;

    (0..height)
        .step_by(SAMPLE_STRIDE)
        .flat_map(|y| (0..width).step_by(SAMPLE_STRIDE).map(move |x| (x, y)))
        .filter(|&(x, y)| canvas.get_pixel(x, y)[0] > BRIGHTNESS_THRESHOLD)
        .map(|(x, y)| {
            Vec3::new(
                (x as f32 - half_w) * WORLD_SCALE,
                -(y as f32 - half_h) * WORLD_SCALE,
                0.0,
            )
        })
        .collect()
}

/// Rasterize two lines of text into a raster-ordered point cloud.
pub fn rasterize(line1: &str, line2: &str) -> Vec<Vec3> {
    sample_canvas(&render_canvas(line1, line2))
}

fn draw_line(canvas: &mut GrayImage, text: &str, center_x: i64, center_y: i64, size: u32) {
    let count = text.chars().count() as i64;
    let cell = size as i64;
    let left = center_x - count * cell / 2;
    let top = center_y - cell / 2;

    for (column, ch) in text.chars().enumerate() {
        let Some(glyph) = glyph_for(ch) else {
            continue;
        };
        let cell_left = left + column as i64 * cell;

        for py in 0..size {
            let y = top + py as i64;
            if y < 0 || y >= canvas.height() as i64 {
                continue;
            }
            // Nearest-neighbour scale of the 8x8 glyph up to the cell.
            let bits = glyph[(py * GLYPH_SIZE / size) as usize];
            for px in 0..size {
                if (bits >> (px * GLYPH_SIZE / size)) & 0x01 == 0 {
                    continue;
                }
                let x = cell_left + px as i64;
                if x < 0 || x >= canvas.width() as i64 {
                    continue;
                }
                canvas.put_pixel(x as u32, y as u32, Luma([255]));
            }
        }
    }
}

/// Glyph bitmap for a character; bit n of row r is pixel (n, r).
///
/// Searches ASCII, then Latin-1, Greek and the symbol sets.
fn glyph_for(ch: char) -> Option<[u8; 8]> {
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| GREEK_FONTS.get(ch))
        .or_else(|| MISC_FONTS.get(ch))
        .or_else(|| BOX_FONTS.get(ch))
        .or_else(|| BLOCK_FONTS.get(ch))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_threshold() {
        assert_eq!(FontTier::for_lines("MERRY", "XMAS"), FontTier::Large);
        assert_eq!(FontTier::for_lines("SIXSIX", "ABCDEF"), FontTier::Large);
        assert_eq!(FontTier::for_lines("SEVENSS", "HI"), FontTier::Small);
        assert_eq!(FontTier::for_lines("HI", "CHRISTMAS"), FontTier::Small);
        assert_eq!(FontTier::Large.pixel_size(), 60);
        assert_eq!(FontTier::Small.pixel_size(), 40);
    }

    #[test]
    fn test_tier_counts_characters_not_bytes() {
        // Six characters, twelve bytes.
        assert_eq!(FontTier::for_lines("ÄÖÜÄÖÜ", ""), FontTier::Large);
    }

    #[test]
    fn test_accented_letters_are_drawn() {
        assert!(!rasterize("ÄÖÜ", "").is_empty());
        assert!(!rasterize("", "ÉÈ").is_empty());
        assert!(rasterize("NOËL", "").len() > rasterize("NOL", "").len());
        assert!(!rasterize("ΩΣ", "").is_empty());
    }

    #[test]
    fn test_unknown_characters_are_blank_cells() {
        // No 8x8 glyph exists for CJK; the rest of the line still renders.
        assert!(rasterize("中", "").is_empty());
        assert!(!rasterize("中A", "").is_empty());
    }

    #[test]
    fn test_blank_text_yields_no_points() {
        assert!(rasterize("", "").is_empty());
        assert!(rasterize("   ", "  ").is_empty());
    }

    #[test]
    fn test_points_are_raster_ordered() {
        let cloud = rasterize("MERRY", "CHRISTMAS");
        assert!(!cloud.is_empty());
        for pair in cloud.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            // Rows go top to bottom (y decreasing), columns left to right.
            assert!(b.y < a.y || (b.y == a.y && b.x > a.x));
        }
    }

    #[test]
    fn test_points_stay_on_canvas() {
        let cloud = rasterize("MERRY", "CHRISTMAS");
        let half_w = CANVAS_WIDTH as f32 / 2.0 * WORLD_SCALE;
        let half_h = CANVAS_HEIGHT as f32 / 2.0 * WORLD_SCALE;
        for p in &cloud {
            assert!(p.x >= -half_w && p.x < half_w);
            assert!(p.y > -half_h && p.y <= half_h);
            assert_eq!(p.z, 0.0);
        }
    }

    #[test]
    fn test_first_line_above_second() {
        let top_only = rasterize("HO", "");
        let bottom_only = rasterize("", "HO");
        assert!(top_only.iter().all(|p| p.y > 0.0));
        assert!(bottom_only.iter().all(|p| p.y < 0.0));
    }

    #[test]
    fn test_large_tier_spreads_wider() {
        // Same glyphs, different tier: the longer second line forces small.
        let large = rasterize("HOHO", "");
        let small = rasterize("HOHO", "       ");
        let span = |cloud: &[Vec3]| {
            let min = cloud.iter().map(|p| p.x).fold(f32::MAX, f32::min);
            let max = cloud.iter().map(|p| p.x).fold(f32::MIN, f32::max);
            max - min
        };
        assert!(span(&large) > span(&small));
        assert!(large.len() > small.len());
    }

    #[test]
    fn test_rasterize_is_deterministic() {
        assert_eq!(rasterize("PEACE ON", "EARTH"), rasterize("PEACE ON", "EARTH"));
    }
}
