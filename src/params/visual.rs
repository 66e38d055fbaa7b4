//! User sliders, complexity tiers and audio-reactive mapping.

use serde::{Deserialize, Serialize};

/// Slider values supplied by the host UI, each nominally 0-100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserParameters {
    /// Pixelation amount (0 = off, 100 = coarsest)
    pub pixelate: u8,

    /// Output brightness (0 = black, 100 = full)
    pub brightness: u8,

    /// Color inversion amount (0 = off, 100 = fully inverted)
    pub invert: u8,
}

impl Default for UserParameters {
    fn default() -> Self {
        Self {
            pixelate: 0,
            brightness: 50,
            invert: 0,
        }
    }
}

impl UserParameters {
    /// Largest value any slider can carry
    pub const MAX: u8 = 100;

    pub fn new(pixelate: u8, brightness: u8, invert: u8) -> Self {
        Self {
            pixelate,
            brightness,
            invert,
        }
    }

    /// Copy with every slider pinned to 0-100
    pub fn clamped(self) -> Self {
        Self {
            pixelate: self.pixelate.min(Self::MAX),
            brightness: self.brightness.min(Self::MAX),
            invert: self.invert.min(Self::MAX),
        }
    }

    /// Pixelate as a 0-1 fraction
    pub fn pixelate_frac(&self) -> f64 {
        f64::from(self.pixelate.min(Self::MAX)) / 100.0
    }

    /// Brightness as a 0-1 fraction
    pub fn brightness_frac(&self) -> f64 {
        f64::from(self.brightness.min(Self::MAX)) / 100.0
    }

    /// Invert as a 0-1 fraction
    pub fn invert_frac(&self) -> f64 {
        f64::from(self.invert.min(Self::MAX)) / 100.0
    }
}

/// Named preset controlling how many modifiers a pattern receives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    #[default]
    Simple,
    Medium,
    Complex,
}

impl Complexity {
    pub const ALL: [Complexity; 3] = [Complexity::Simple, Complexity::Medium, Complexity::Complex];

    /// Base modifier counts before slider scaling
    pub fn base_budget(self) -> ModifierBudget {
        match self {
            Complexity::Simple => ModifierBudget::new(1, 2, 1, 1),
            Complexity::Medium => ModifierBudget::new(2, 3, 2, 2),
            Complexity::Complex => ModifierBudget::new(3, 4, 2, 3),
        }
    }

    /// Modifier counts scaled by the sliders and capped
    ///
    /// Multiplier: `1 + 0.4 * pixelate + 0.3 * invert` (sliders as fractions)
    pub fn budget(self, params: &UserParameters) -> ModifierBudget {
        let multiplier = 1.0 + 0.4 * params.pixelate_frac() + 0.3 * params.invert_frac();
        let base = self.base_budget();
        let caps = ModifierBudget::CAPS;

        let scale = |count: usize, cap: usize| -> usize {
            ((count as f64 * multiplier).round() as usize).min(cap)
        };

        ModifierBudget {
            modulations: scale(base.modulations, caps.modulations),
            geometries: scale(base.geometries, caps.geometries),
            blends: scale(base.blends, caps.blends),
            effects: scale(base.effects, caps.effects),
        }
    }
}

impl std::str::FromStr for Complexity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "simple" => Ok(Complexity::Simple),
            "medium" => Ok(Complexity::Medium),
            "complex" => Ok(Complexity::Complex),
            other => Err(format!("unknown complexity '{}'", other)),
        }
    }
}

/// Number of modifier nodes of each category in one pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModifierBudget {
    pub modulations: usize,
    pub geometries: usize,
    pub blends: usize,
    pub effects: usize,
}

impl ModifierBudget {
    /// Hard upper bounds regardless of tier and sliders
    pub const CAPS: ModifierBudget = ModifierBudget::new(5, 5, 3, 4);

    pub const fn new(modulations: usize, geometries: usize, blends: usize, effects: usize) -> Self {
        Self {
            modulations,
            geometries,
            blends,
            effects,
        }
    }

    pub fn total(&self) -> usize {
        self.modulations + self.geometries + self.blends + self.effects
    }
}

/// Mapping from audio feature frames to per-frame render uniforms
#[derive(Debug, Clone)]
pub struct ReactiveMapping {
    /// Base zoom (dimensionless, 1 = none)
    pub base_zoom: f64,

    /// Scale factor: bass energy → zoom
    /// Formula: zoom = base_zoom + bass * this_scale
    pub bass_to_zoom_scale: f64,

    /// Base rotation speed (renderer units per second)
    pub base_rotation_speed: f64,

    /// Scale factor: mid energy → rotation speed
    /// Formula: speed = base_rotation_speed + mid * this_scale (then safety-clamped)
    pub mid_to_rotation_scale: f64,

    /// Scale factor: treble energy → hue shift (fraction of a turn)
    pub treble_to_hue_scale: f64,
}

impl Default for ReactiveMapping {
    fn default() -> Self {
        Self {
            base_zoom: 1.0,
            bass_to_zoom_scale: 0.3,
            base_rotation_speed: 0.02,
            mid_to_rotation_scale: 0.2,
            treble_to_hue_scale: 0.15,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_matches_tier_without_sliders() {
        let params = UserParameters::new(0, 50, 0);

        assert_eq!(
            Complexity::Simple.budget(&params),
            ModifierBudget::new(1, 2, 1, 1)
        );
        assert_eq!(
            Complexity::Medium.budget(&params),
            ModifierBudget::new(2, 3, 2, 2)
        );
        assert_eq!(
            Complexity::Complex.budget(&params),
            ModifierBudget::new(3, 4, 2, 3)
        );
    }

    #[test]
    fn test_budget_scales_and_caps() {
        // Multiplier 1.7 at full pixelate + invert
        let params = UserParameters::new(100, 50, 100);

        assert_eq!(
            Complexity::Complex.budget(&params),
            ModifierBudget::new(5, 5, 3, 4)
        );
        assert_eq!(
            Complexity::Simple.budget(&params),
            ModifierBudget::new(2, 3, 2, 2)
        );
    }

    #[test]
    fn test_clamped_pins_sliders() {
        let params = UserParameters::new(250, 101, 7).clamped();
        assert_eq!(params, UserParameters::new(100, 100, 7));
        assert_eq!(UserParameters::new(200, 0, 0).pixelate_frac(), 1.0);
    }

    #[test]
    fn test_complexity_from_str() {
        assert_eq!("Medium".parse::<Complexity>(), Ok(Complexity::Medium));
        assert!("extreme".parse::<Complexity>().is_err());
    }
}
