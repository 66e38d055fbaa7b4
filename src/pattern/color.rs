//! Color-wheel harmonies in an over-driven RGB range.
//!
//! Generated triples live in roughly 0.3-2.5 rather than 0-1 so the
//! terminating color node can push blends past white and keep dark regions
//! visible against a black canvas.

use glam::DVec3;
use serde::Serialize;

use super::rng::SeededRandom;

/// Scale applied to unit RGB to reach the enhanced range
pub const ENHANCE_SCALE: f64 = 2.5;

/// Rec. 601 luma weights
const LUMA_WEIGHTS: DVec3 = DVec3::new(0.299, 0.587, 0.114);

/// Below this luminance colors are boosted
const DIM_LUMINANCE: f64 = 0.8;

/// Above this luminance colors are damped
const GLARE_LUMINANCE: f64 = 2.0;

/// Lowest value any channel may end up with
const CHANNEL_FLOOR: f64 = 0.3;

/// RGB triple in the enhanced range
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorTriple {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl ColorTriple {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub fn luminance(&self) -> f64 {
        self.to_vec().dot(LUMA_WEIGHTS)
    }

    fn to_vec(self) -> DVec3 {
        DVec3::new(self.r, self.g, self.b)
    }

    fn from_vec(v: DVec3) -> Self {
        Self::new(round3(v.x), round3(v.y), round3(v.z))
    }
}

/// Color-wheel relationship used to pick a hue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HarmonyStrategy {
    Complementary,
    Triadic,
    Analogous,
    Tetradic,
    Monochromatic,
    SplitComplementary,
}

impl HarmonyStrategy {
    pub const ALL: [HarmonyStrategy; 6] = [
        HarmonyStrategy::Complementary,
        HarmonyStrategy::Triadic,
        HarmonyStrategy::Analogous,
        HarmonyStrategy::Tetradic,
        HarmonyStrategy::Monochromatic,
        HarmonyStrategy::SplitComplementary,
    ];
}

/// Fixed palettes: one row of candidate values per channel
pub static PALETTES: [[[f64; 3]; 3]; 8] = [
    // Warm
    [[1.5, 1.2, 0.8], [0.7, 0.5, 0.3], [0.4, 0.6, 0.2]],
    // Cool
    [[0.2, 0.5, 0.8], [0.7, 1.2, 1.5], [1.5, 1.0, 0.8]],
    // Purple/pink
    [[1.5, 0.9, 1.2], [0.3, 0.6, 0.4], [1.4, 1.0, 1.6]],
    // Nature
    [[0.2, 0.6, 0.4], [1.5, 1.2, 0.8], [0.3, 0.5, 0.7]],
    // Neon
    [[1.8, 0.1, 1.2], [0.2, 1.8, 0.5], [0.1, 0.3, 1.8]],
    // Sunset
    [[1.8, 1.4, 0.8], [0.8, 0.6, 0.3], [0.2, 0.4, 0.6]],
    // Ocean
    [[0.1, 0.3, 0.6], [0.6, 0.9, 1.2], [1.8, 1.4, 1.0]],
    // Monochrome
    [[1.2, 0.8, 1.0], [1.2, 0.8, 1.0], [1.2, 0.8, 1.0]],
];

/// Produces harmonious color triples from a caller-owned random source
#[derive(Debug, Clone, Default)]
pub struct ColorGenerator;

impl ColorGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Random harmony, contrast-enhanced
    pub fn generate(&self, rng: &mut SeededRandom) -> ColorTriple {
        let strategy = rng
            .choice(&HarmonyStrategy::ALL)
            .copied()
            .unwrap_or(HarmonyStrategy::Complementary);
        self.generate_with(strategy, rng)
    }

    /// Triple for a specific strategy, contrast-enhanced
    pub fn generate_with(&self, strategy: HarmonyStrategy, rng: &mut SeededRandom) -> ColorTriple {
        let (hue, saturation, lightness) = match strategy {
            HarmonyStrategy::Complementary => {
                (rng.range(0.0, 360.0), rng.range(45.0, 80.0), rng.range(55.0, 85.0))
            }
            HarmonyStrategy::Triadic => {
                let base = rng.range(0.0, 360.0);
                let hue = base + rng.range(110.0, 130.0);
                (hue, rng.range(40.0, 75.0), rng.range(50.0, 85.0))
            }
            HarmonyStrategy::Analogous => {
                let base = rng.range(0.0, 360.0);
                let direction = if rng.chance(0.5) { -1.0 } else { 1.0 };
                let hue = base + direction * rng.range(15.0, 60.0);
                (hue, rng.range(35.0, 75.0), rng.range(50.0, 85.0))
            }
            HarmonyStrategy::Tetradic => {
                let base = rng.range(0.0, 360.0);
                let hue = base + rng.range(60.0, 90.0) + rng.range(180.0, 200.0);
                (hue, rng.range(45.0, 75.0), rng.range(55.0, 85.0))
            }
            HarmonyStrategy::Monochromatic => {
                (rng.range(0.0, 360.0), rng.range(25.0, 75.0), rng.range(50.0, 85.0))
            }
            HarmonyStrategy::SplitComplementary => {
                let base = rng.range(0.0, 360.0);
                let hue = base + rng.range(150.0, 210.0);
                (hue, rng.range(40.0, 75.0), rng.range(50.0, 85.0))
            }
        };

        enhance_contrast(hsl_to_rgb(hue, saturation, lightness))
    }

    /// Triple drawn from one of the fixed palettes, one value per channel
    pub fn palette_color(&self, rng: &mut SeededRandom) -> ColorTriple {
        let palette = rng.choice(&PALETTES).unwrap_or(&PALETTES[0]);
        let mut pick = |row: &[f64; 3]| rng.choice(row).copied().unwrap_or(row[0]);
        ColorTriple::new(pick(&palette[0]), pick(&palette[1]), pick(&palette[2]))
    }
}

/// HSL (hue in degrees, saturation/lightness in percent) to enhanced RGB
///
/// Standard hue-sector decomposition, then scaled by [`ENHANCE_SCALE`] and
/// rounded to three decimals.
pub fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> ColorTriple {
    let h = hue.rem_euclid(360.0);
    let s = (saturation / 100.0).clamp(0.0, 1.0);
    let l = (lightness / 100.0).clamp(0.0, 1.0);

    let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let sector = h / 60.0;
    let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let m = l - chroma / 2.0;

    let (r, g, b) = match sector as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };

    ColorTriple::from_vec((DVec3::new(r, g, b) + m) * ENHANCE_SCALE)
}

/// Keep colors visible on a dark canvas without blowing out
///
/// Dim colors are boosted ×1.8 (capped at 2.5), glaring ones damped ×0.8
/// (floored at 0.5), then every channel is floored at 0.3.
pub fn enhance_contrast(color: ColorTriple) -> ColorTriple {
    let mut v = color.to_vec();
    let luminance = color.luminance();

    if luminance < DIM_LUMINANCE {
        v = (v * 1.8).min(DVec3::splat(ENHANCE_SCALE));
    } else if luminance > GLARE_LUMINANCE {
        v = (v * 0.8).max(DVec3::splat(0.5));
    }

    ColorTriple::from_vec(v.max(DVec3::splat(CHANNEL_FLOOR)))
}

/// Round to three decimals
pub(crate) fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hsl_primaries() {
        assert_eq!(hsl_to_rgb(0.0, 100.0, 50.0), ColorTriple::new(2.5, 0.0, 0.0));
        assert_eq!(hsl_to_rgb(120.0, 100.0, 50.0), ColorTriple::new(0.0, 2.5, 0.0));
        assert_eq!(hsl_to_rgb(240.0, 100.0, 50.0), ColorTriple::new(0.0, 0.0, 2.5));
        // Hue wraps around the wheel
        assert_eq!(hsl_to_rgb(360.0, 100.0, 50.0), hsl_to_rgb(0.0, 100.0, 50.0));
        assert_eq!(hsl_to_rgb(-120.0, 100.0, 50.0), hsl_to_rgb(240.0, 100.0, 50.0));
    }

    #[test]
    fn test_hsl_grey_and_rounding() {
        assert_eq!(hsl_to_rgb(200.0, 0.0, 50.0), ColorTriple::new(1.25, 1.25, 1.25));

        let c = hsl_to_rgb(33.3, 61.7, 47.9);
        for channel in [c.r, c.g, c.b] {
            assert_eq!(round3(channel), channel);
        }
    }

    #[test]
    fn test_contrast_boosts_dim_colors() {
        let dim = enhance_contrast(ColorTriple::new(0.5, 0.2, 0.1));
        assert_eq!(dim, ColorTriple::new(0.9, 0.36, 0.3));

        let capped = enhance_contrast(ColorTriple::new(2.0, 0.0, 0.0));
        assert_eq!(capped.r, 2.5);
    }

    #[test]
    fn test_contrast_damps_glare() {
        let bright = enhance_contrast(ColorTriple::new(2.5, 2.5, 2.5));
        assert_eq!(bright, ColorTriple::new(2.0, 2.0, 2.0));
    }

    #[test]
    fn test_generated_colors_in_enhanced_range() {
        let generator = ColorGenerator::new();
        let mut rng = SeededRandom::new(2024);

        for _ in 0..500 {
            let c = generator.generate(&mut rng);
            for channel in [c.r, c.g, c.b] {
                assert!((0.3..=2.5).contains(&channel), "{:?}", c);
            }
        }
    }

    #[test]
    fn test_every_strategy_is_reachable() {
        let generator = ColorGenerator::new();
        let mut rng = SeededRandom::new(11);

        for strategy in HarmonyStrategy::ALL {
            let c = generator.generate_with(strategy, &mut rng);
            assert!(c.r >= 0.3 && c.g >= 0.3 && c.b >= 0.3);
        }
    }

    #[test]
    fn test_palette_color_comes_from_palettes() {
        let generator = ColorGenerator::new();
        let mut rng = SeededRandom::new(3);

        for _ in 0..50 {
            let c = generator.palette_color(&mut rng);
            assert!(PALETTES.iter().any(|p| p[0].contains(&c.r)
                && p[1].contains(&c.g)
                && p[2].contains(&c.b)));
        }
    }
}
