//! Randomized pattern composition.
//!
//! Every draw goes through the caller's [`SeededRandom`] in a fixed order, so
//! the same seed, color, tier and sliders always yield the same expression.

use std::f64::consts::TAU;

use super::ast::{
    BlendMode, ColorAdjust, EffectOp, GeometryOp, ModifierCategory, ModifierNode, ModulationKind,
    PatternExpression, RenderPlan, SourceNode, UserAdjustment,
};
use super::color::{round3, ColorTriple};
use super::rng::SeededRandom;
use crate::params::{Complexity, SafetyLimits, UserParameters};

/// Slider fractions, computed once per build
#[derive(Debug, Clone, Copy)]
struct Bias {
    pixelate: f64,
    brightness: f64,
    invert: f64,
}

impl Bias {
    fn from_params(params: &UserParameters) -> Self {
        Self {
            pixelate: params.pixelate_frac(),
            brightness: params.brightness_frac(),
            invert: params.invert_frac(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceKind {
    Oscillator,
    Noise,
    Cellular,
    Shape,
    Gradient,
    Solid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GeometryKind {
    Kaleid,
    Scale,
    Rotate,
    Posterize,
    Pixelate,
    Repeat,
    Invert,
    Threshold,
}

/// Composes [`PatternExpression`]s within the safety limits
#[derive(Debug, Clone, Default)]
pub struct PatternBuilder {
    limits: SafetyLimits,
}

impl PatternBuilder {
    pub fn new(limits: SafetyLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &SafetyLimits {
        &self.limits
    }

    /// Build one expression
    ///
    /// Sliders are clamped to 0-100 first. Modifier categories are
    /// interleaved, each step choosing a category in proportion to how many
    /// of its modifiers are still owed.
    pub fn build(
        &self,
        rng: &mut SeededRandom,
        color: ColorTriple,
        complexity: Complexity,
        params: &UserParameters,
    ) -> PatternExpression {
        let params = params.clamped();
        let bias = Bias::from_params(&params);

        let source = self.source(rng, bias);

        let budget = complexity.budget(&params);
        let mut owed = [
            (ModifierCategory::Modulation, budget.modulations),
            (ModifierCategory::Geometry, budget.geometries),
            (ModifierCategory::Blend, budget.blends),
            (ModifierCategory::Effect, budget.effects),
        ];

        let mut modifiers = Vec::with_capacity(budget.total());
        loop {
            let weights: Vec<(usize, f64)> = owed
                .iter()
                .enumerate()
                .map(|(slot, (_, count))| (slot, *count as f64))
                .collect();
            let Some(&slot) = rng.weighted(&weights) else {
                break;
            };
            owed[slot].1 -= 1;

            let modifier = match owed[slot].0 {
                ModifierCategory::Modulation => self.modulation(rng, bias),
                ModifierCategory::Geometry => ModifierNode::Geometry(self.geometry(rng, bias)),
                ModifierCategory::Blend => self.blend(rng, bias),
                ModifierCategory::Effect => ModifierNode::Effect(effect(rng)),
            };
            modifiers.push(modifier);
        }

        let color = terminal_color(rng, color, bias);
        PatternExpression::new(source, modifiers, color)
    }

    fn source(&self, rng: &mut SeededRandom, bias: Bias) -> SourceNode {
        let weights = [
            (SourceKind::Oscillator, 3.0 + 2.0 * bias.pixelate),
            (SourceKind::Noise, 2.0),
            (SourceKind::Cellular, 1.5),
            (SourceKind::Shape, 1.0 + 2.0 * bias.pixelate),
            (SourceKind::Gradient, 1.0),
            (SourceKind::Solid, 0.5),
        ];
        let kind = rng
            .weighted(&weights)
            .copied()
            .unwrap_or(SourceKind::Oscillator);

        match kind {
            SourceKind::Oscillator => SourceNode::Oscillator {
                frequency: self.limits.clamp_frequency(rng.range(0.5, 6.5)),
                sync: self.limits.clamp_sync(rng.range(-0.1, 0.1)),
                offset: self.limits.clamp_offset(rng.range(0.0, 2.0)),
            },
            SourceKind::Noise => SourceNode::Noise {
                scale: rng.range(1.0, 5.0),
                speed: self.speed(rng),
            },
            SourceKind::Cellular => SourceNode::Cellular {
                scale: rng.range(2.0, 8.0),
                speed: self.speed(rng),
                blending: rng.range(0.0, 0.5),
            },
            SourceKind::Shape => SourceNode::Shape {
                sides: rng.int(3, 8) as u32,
                radius: rng.range(0.2, 0.6),
                smoothing: rng.range(0.01, 0.3),
            },
            SourceKind::Gradient => SourceNode::Gradient {
                speed: self.speed(rng),
            },
            SourceKind::Solid => SourceNode::Solid {
                r: rng.range(0.2, 1.0),
                g: rng.range(0.2, 1.0),
                b: rng.range(0.2, 1.0),
            },
        }
    }

    fn speed(&self, rng: &mut SeededRandom) -> f64 {
        self.limits.clamp_speed(rng.range(0.01, 0.3))
    }

    fn modulation(&self, rng: &mut SeededRandom, bias: Bias) -> ModifierNode {
        let kind = rng
            .choice(&ModulationKind::ALL)
            .copied()
            .unwrap_or(ModulationKind::Modulate);
        let source = self.source(rng, bias);
        let amount = rng.range(0.2 + 0.4 * bias.invert, 1.2);
        ModifierNode::Modulation {
            kind,
            source,
            amount,
        }
    }

    fn geometry(&self, rng: &mut SeededRandom, bias: Bias) -> GeometryOp {
        let weights = [
            (GeometryKind::Kaleid, 2.0 + 2.0 * bias.pixelate),
            (GeometryKind::Scale, 1.5),
            (GeometryKind::Rotate, 1.5),
            (GeometryKind::Posterize, 1.0 + bias.pixelate),
            (GeometryKind::Pixelate, 0.5 + 2.0 * bias.pixelate),
            (GeometryKind::Repeat, 1.0 + bias.pixelate),
            (GeometryKind::Invert, 0.5),
            (GeometryKind::Threshold, 0.5 + bias.brightness),
        ];
        let kind = rng.weighted(&weights).copied().unwrap_or(GeometryKind::Scale);

        match kind {
            GeometryKind::Kaleid => GeometryOp::Kaleid {
                sides: rng.int(3, 12) as u32,
            },
            GeometryKind::Scale => GeometryOp::Scale {
                amount: rng.range(0.5, 2.0),
            },
            GeometryKind::Rotate => GeometryOp::Rotate {
                angle: rng.range(0.0, TAU),
                speed: self.speed(rng),
            },
            GeometryKind::Posterize => GeometryOp::Posterize {
                bins: rng.int(3, 16) as u32,
                gamma: rng.range(0.4, 1.0),
            },
            GeometryKind::Pixelate => GeometryOp::Pixelate {
                x: rng.int(20, 200) as u32,
                y: rng.int(20, 200) as u32,
            },
            GeometryKind::Repeat => GeometryOp::Repeat {
                x: rng.int(2, 6) as u32,
                y: rng.int(2, 6) as u32,
            },
            GeometryKind::Invert => GeometryOp::Invert {
                amount: rng.range(0.5, 1.0),
            },
            GeometryKind::Threshold => GeometryOp::Threshold {
                level: rng.range(0.3, 0.7),
                tolerance: rng.range(0.05, 0.2),
            },
        }
    }

    fn blend(&self, rng: &mut SeededRandom, bias: Bias) -> ModifierNode {
        let weights = [
            (BlendMode::Difference, 1.0 + 2.0 * bias.invert),
            (BlendMode::Multiply, 1.0),
            (BlendMode::Add, 1.0),
        ];
        let mode = rng.weighted(&weights).copied().unwrap_or(BlendMode::Add);
        let source = self.source(rng, bias);
        let amount = rng.range(0.3, 1.0);
        ModifierNode::Blend {
            mode,
            source,
            amount,
        }
    }
}

fn effect(rng: &mut SeededRandom) -> EffectOp {
    match rng.int(0, 4) {
        0 => EffectOp::Contrast {
            amount: rng.range(1.0, 1.8),
        },
        1 => EffectOp::Saturate {
            amount: rng.range(0.8, 2.0),
        },
        2 => EffectOp::Hue {
            shift: rng.range(0.0, 0.3),
        },
        3 => EffectOp::Colorama {
            amount: rng.range(0.001, 0.01),
        },
        _ => EffectOp::Brightness {
            amount: rng.range(-0.05, 0.15),
        },
    }
}

/// Terminating gain: one shared multiplier, brightened by the slider, blue
/// pulled down by up to 30% with `invert`
fn terminal_color(rng: &mut SeededRandom, color: ColorTriple, bias: Bias) -> ColorAdjust {
    let gain = rng.range(0.8, 1.8) * (0.8 + 0.4 * bias.brightness);
    ColorAdjust {
        r: round3(color.r * gain),
        g: round3(color.g * gain),
        b: round3(color.b * gain * (1.0 - 0.3 * bias.invert)),
    }
}

/// Append the user's brightness, pixelation and inversion to an expression
///
/// Brightness is always applied. Pixelation (grid `max(5, floor(200 - 1.95 * p))`)
/// and inversion are only added when their sliders are above zero.
pub fn apply_user_parameters(expression: PatternExpression, params: &UserParameters) -> RenderPlan {
    let params = params.clamped();
    let mut adjustments = vec![UserAdjustment::Brightness(params.brightness_frac())];

    if params.pixelate > 0 {
        let size = (20_000 - 195 * u32::from(params.pixelate)) / 100;
        adjustments.push(UserAdjustment::Pixelate(size.max(5)));
    }
    if params.invert > 0 {
        adjustments.push(UserAdjustment::Invert(params.invert_frac()));
    }

    RenderPlan {
        expression,
        adjustments,
    }
}
