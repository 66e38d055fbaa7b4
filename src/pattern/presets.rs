//! Hand-composed patterns.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::ast::{
    BlendMode, ColorAdjust, EffectOp, GeometryOp, ModifierNode, ModulationKind, PatternExpression,
    SourceNode,
};
use super::color::ColorTriple;
use crate::params::SafetyLimits;

/// Named preset pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    Kaleidoscope,
    LiquidMetal,
    PlasmaFlow,
    DigitalRain,
    CosmicWaves,
    FractalTunnel,
}

impl Preset {
    pub const ALL: [Preset; 6] = [
        Preset::Kaleidoscope,
        Preset::LiquidMetal,
        Preset::PlasmaFlow,
        Preset::DigitalRain,
        Preset::CosmicWaves,
        Preset::FractalTunnel,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Kaleidoscope => "kaleidoscope",
            Preset::LiquidMetal => "liquid-metal",
            Preset::PlasmaFlow => "plasma-flow",
            Preset::DigitalRain => "digital-rain",
            Preset::CosmicWaves => "cosmic-waves",
            Preset::FractalTunnel => "fractal-tunnel",
        }
    }

    /// Compose the preset tinted by `color`, with every rate clamped
    pub fn build(self, color: ColorTriple, limits: &SafetyLimits) -> PatternExpression {
        let osc = |frequency: f64, sync: f64, offset: f64| SourceNode::Oscillator {
            frequency: limits.clamp_frequency(frequency),
            sync: limits.clamp_sync(sync),
            offset: limits.clamp_offset(offset),
        };
        let speed = |s: f64| limits.clamp_speed(s);
        let tint: ColorAdjust = color.into();

        let (source, modifiers) = match self {
            Preset::Kaleidoscope => (
                osc(4.0, 0.05, 1.2),
                vec![
                    ModifierNode::Geometry(GeometryOp::Kaleid { sides: 8 }),
                    ModifierNode::Geometry(GeometryOp::Rotate {
                        angle: 0.0,
                        speed: speed(0.05),
                    }),
                    ModifierNode::Modulation {
                        kind: ModulationKind::Scale,
                        source: osc(2.0, 0.0, 0.0),
                        amount: 0.4,
                    },
                ],
            ),
            Preset::LiquidMetal => (
                SourceNode::Noise {
                    scale: 3.0,
                    speed: speed(0.1),
                },
                vec![
                    ModifierNode::Modulation {
                        kind: ModulationKind::Modulate,
                        source: SourceNode::Noise {
                            scale: 2.0,
                            speed: speed(0.05),
                        },
                        amount: 0.6,
                    },
                    ModifierNode::Effect(EffectOp::Contrast { amount: 1.6 }),
                    ModifierNode::Effect(EffectOp::Saturate { amount: 0.8 }),
                ],
            ),
            Preset::PlasmaFlow => (
                osc(3.0, 0.1, 0.5),
                vec![
                    ModifierNode::Modulation {
                        kind: ModulationKind::Rotate,
                        source: SourceNode::Noise {
                            scale: 2.5,
                            speed: speed(0.08),
                        },
                        amount: 0.8,
                    },
                    ModifierNode::Blend {
                        mode: BlendMode::Add,
                        source: osc(5.0, -0.05, 1.0),
                        amount: 0.5,
                    },
                    ModifierNode::Effect(EffectOp::Colorama { amount: 0.005 }),
                ],
            ),
            Preset::DigitalRain => (
                SourceNode::Shape {
                    sides: 4,
                    radius: 0.3,
                    smoothing: 0.01,
                },
                vec![
                    ModifierNode::Geometry(GeometryOp::Repeat { x: 20, y: 10 }),
                    ModifierNode::Modulation {
                        kind: ModulationKind::ScrollY,
                        source: SourceNode::Noise {
                            scale: 4.0,
                            speed: speed(0.2),
                        },
                        amount: 0.5,
                    },
                    ModifierNode::Geometry(GeometryOp::Pixelate { x: 40, y: 80 }),
                ],
            ),
            Preset::CosmicWaves => (
                SourceNode::Cellular {
                    scale: 5.0,
                    speed: speed(0.1),
                    blending: 0.3,
                },
                vec![
                    ModifierNode::Blend {
                        mode: BlendMode::Difference,
                        source: osc(1.5, 0.02, 0.3),
                        amount: 0.7,
                    },
                    ModifierNode::Modulation {
                        kind: ModulationKind::Hue,
                        source: SourceNode::Gradient { speed: speed(0.05) },
                        amount: 0.4,
                    },
                    ModifierNode::Effect(EffectOp::Hue { shift: 0.1 }),
                ],
            ),
            Preset::FractalTunnel => (
                SourceNode::Shape {
                    sides: 6,
                    radius: 0.5,
                    smoothing: 0.1,
                },
                vec![
                    ModifierNode::Geometry(GeometryOp::Repeat { x: 3, y: 3 }),
                    ModifierNode::Modulation {
                        kind: ModulationKind::Kaleid,
                        source: osc(2.5, 0.0, 0.0),
                        amount: 0.3,
                    },
                    ModifierNode::Geometry(GeometryOp::Scale { amount: 1.5 }),
                    ModifierNode::Geometry(GeometryOp::Rotate {
                        angle: 0.0,
                        speed: speed(0.03),
                    }),
                ],
            ),
        };

        PatternExpression::new(source, modifiers, tint)
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_lowercase().replace('_', "-");
        Preset::ALL
            .into_iter()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| format!("unknown preset '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::safety::SafetyValidator;

    #[test]
    fn test_presets_are_safe() {
        let limits = SafetyLimits::default();
        let validator = SafetyValidator::new(limits.clone());
        let color = ColorTriple::new(1.2, 0.8, 1.6);

        for preset in Preset::ALL {
            let expr = preset.build(color, &limits);
            assert!(validator.validate(&expr).is_safe, "{}", preset);
            assert_eq!(expr.ops().last().map(|op| op.name), Some("color"));
        }
    }

    #[test]
    fn test_tight_limits_clamp_presets() {
        let limits = SafetyLimits {
            frequency_hz: (0.1, 1.0),
            ..SafetyLimits::default()
        };
        let expr = Preset::Kaleidoscope.build(ColorTriple::new(1.0, 1.0, 1.0), &limits);

        assert_eq!(
            expr.source(),
            &SourceNode::Oscillator {
                frequency: 1.0,
                sync: 0.05,
                offset: 1.2
            }
        );
    }

    #[test]
    fn test_preset_names_round_trip() {
        for preset in Preset::ALL {
            assert_eq!(preset.name().parse::<Preset>(), Ok(preset));
        }
        assert_eq!("Liquid_Metal".parse::<Preset>(), Ok(Preset::LiquidMetal));
        assert!("disco".parse::<Preset>().is_err());
    }
}
