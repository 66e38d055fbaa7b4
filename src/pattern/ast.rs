//! Typed pattern expression tree.
//!
//! A pattern is one source node, a chain of modifier nodes and a terminating
//! color node. The renderer never sees program text: it is handed a sequence
//! of [`Op`] descriptors (operation name plus numeric arguments) produced by
//! walking this tree.

use serde::Serialize;
use std::fmt;

use super::color::ColorTriple;
use crate::params::ModifierBudget;

/// One renderer call: name, numeric arguments, optional texture input
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Op {
    pub name: &'static str,
    pub args: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<Box<Op>>,
}

impl Op {
    pub fn new(name: &'static str, args: Vec<f64>) -> Self {
        Self {
            name,
            args,
            input: None,
        }
    }

    pub fn with_input(mut self, input: Op) -> Self {
        self.input = Some(Box::new(input));
        self
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        let mut first = true;
        if let Some(input) = &self.input {
            write!(f, "{}", input)?;
            first = false;
        }
        for arg in &self.args {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}", arg)?;
            first = false;
        }
        write!(f, ")")
    }
}

/// Texture generator at the head of a chain
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceNode {
    /// Sine bands: frequency (Hz), sync (drift), offset (color phase)
    Oscillator { frequency: f64, sync: f64, offset: f64 },
    Noise { scale: f64, speed: f64 },
    /// Voronoi-like cells
    Cellular { scale: f64, speed: f64, blending: f64 },
    Shape { sides: u32, radius: f64, smoothing: f64 },
    Gradient { speed: f64 },
    Solid { r: f64, g: f64, b: f64 },
}

impl SourceNode {
    pub fn op(&self) -> Op {
        match *self {
            SourceNode::Oscillator {
                frequency,
                sync,
                offset,
            } => Op::new("osc", vec![frequency, sync, offset]),
            SourceNode::Noise { scale, speed } => Op::new("noise", vec![scale, speed]),
            SourceNode::Cellular {
                scale,
                speed,
                blending,
            } => Op::new("voronoi", vec![scale, speed, blending]),
            SourceNode::Shape {
                sides,
                radius,
                smoothing,
            } => Op::new("shape", vec![f64::from(sides), radius, smoothing]),
            SourceNode::Gradient { speed } => Op::new("gradient", vec![speed]),
            SourceNode::Solid { r, g, b } => Op::new("solid", vec![r, g, b]),
        }
    }
}

/// How a secondary source displaces the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModulationKind {
    Modulate,
    Scale,
    Rotate,
    ScrollX,
    ScrollY,
    Hue,
    Kaleid,
}

impl ModulationKind {
    pub const ALL: [ModulationKind; 7] = [
        ModulationKind::Modulate,
        ModulationKind::Scale,
        ModulationKind::Rotate,
        ModulationKind::ScrollX,
        ModulationKind::ScrollY,
        ModulationKind::Hue,
        ModulationKind::Kaleid,
    ];

    pub fn op_name(self) -> &'static str {
        match self {
            ModulationKind::Modulate => "modulate",
            ModulationKind::Scale => "modulateScale",
            ModulationKind::Rotate => "modulateRotate",
            ModulationKind::ScrollX => "modulateScrollX",
            ModulationKind::ScrollY => "modulateScrollY",
            ModulationKind::Hue => "modulateHue",
            ModulationKind::Kaleid => "modulateKaleid",
        }
    }
}

/// Coordinate or value transform applied to the chain
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GeometryOp {
    Kaleid { sides: u32 },
    Scale { amount: f64 },
    /// Static angle (radians) plus continuous speed
    Rotate { angle: f64, speed: f64 },
    Posterize { bins: u32, gamma: f64 },
    Pixelate { x: u32, y: u32 },
    Repeat { x: u32, y: u32 },
    Invert { amount: f64 },
    Threshold { level: f64, tolerance: f64 },
}

impl GeometryOp {
    pub fn op(&self) -> Op {
        match *self {
            GeometryOp::Kaleid { sides } => Op::new("kaleid", vec![f64::from(sides)]),
            GeometryOp::Scale { amount } => Op::new("scale", vec![amount]),
            GeometryOp::Rotate { angle, speed } => Op::new("rotate", vec![angle, speed]),
            GeometryOp::Posterize { bins, gamma } => {
                Op::new("posterize", vec![f64::from(bins), gamma])
            }
            GeometryOp::Pixelate { x, y } => Op::new("pixelate", vec![f64::from(x), f64::from(y)]),
            GeometryOp::Repeat { x, y } => Op::new("repeat", vec![f64::from(x), f64::from(y)]),
            GeometryOp::Invert { amount } => Op::new("invert", vec![amount]),
            GeometryOp::Threshold { level, tolerance } => {
                Op::new("thresh", vec![level, tolerance])
            }
        }
    }
}

/// How a secondary source is combined with the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    Difference,
    Multiply,
    Add,
}

impl BlendMode {
    pub fn op_name(self) -> &'static str {
        match self {
            BlendMode::Difference => "diff",
            BlendMode::Multiply => "mult",
            BlendMode::Add => "add",
        }
    }
}

/// Color-space effect that leaves geometry alone
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EffectOp {
    Contrast { amount: f64 },
    Saturate { amount: f64 },
    Hue { shift: f64 },
    Colorama { amount: f64 },
    Brightness { amount: f64 },
}

impl EffectOp {
    pub fn op(&self) -> Op {
        match *self {
            EffectOp::Contrast { amount } => Op::new("contrast", vec![amount]),
            EffectOp::Saturate { amount } => Op::new("saturate", vec![amount]),
            EffectOp::Hue { shift } => Op::new("hue", vec![shift]),
            EffectOp::Colorama { amount } => Op::new("colorama", vec![amount]),
            EffectOp::Brightness { amount } => Op::new("brightness", vec![amount]),
        }
    }
}

/// Modifier category, used for budgeting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierCategory {
    Modulation,
    Geometry,
    Blend,
    Effect,
}

/// Any node between the source and the terminating color
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum ModifierNode {
    Modulation {
        kind: ModulationKind,
        source: SourceNode,
        amount: f64,
    },
    Geometry(GeometryOp),
    Blend {
        mode: BlendMode,
        source: SourceNode,
        amount: f64,
    },
    Effect(EffectOp),
}

impl ModifierNode {
    pub fn category(&self) -> ModifierCategory {
        match self {
            ModifierNode::Modulation { .. } => ModifierCategory::Modulation,
            ModifierNode::Geometry(_) => ModifierCategory::Geometry,
            ModifierNode::Blend { .. } => ModifierCategory::Blend,
            ModifierNode::Effect(_) => ModifierCategory::Effect,
        }
    }

    pub fn op(&self) -> Op {
        match self {
            ModifierNode::Modulation {
                kind,
                source,
                amount,
            } => Op::new(kind.op_name(), vec![*amount]).with_input(source.op()),
            ModifierNode::Geometry(geometry) => geometry.op(),
            ModifierNode::Blend {
                mode,
                source,
                amount,
            } => Op::new(mode.op_name(), vec![*amount]).with_input(source.op()),
            ModifierNode::Effect(effect) => effect.op(),
        }
    }
}

/// Final per-channel gain
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorAdjust {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl ColorAdjust {
    pub fn op(&self) -> Op {
        Op::new("color", vec![self.r, self.g, self.b])
    }
}

impl From<ColorTriple> for ColorAdjust {
    fn from(c: ColorTriple) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
        }
    }
}

/// A complete generated visual
///
/// The shape guarantees exactly one source at the head and exactly one
/// color node at the tail; only the modifier chain varies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternExpression {
    source: SourceNode,
    modifiers: Vec<ModifierNode>,
    color: ColorAdjust,
}

impl PatternExpression {
    pub fn new(source: SourceNode, modifiers: Vec<ModifierNode>, color: ColorAdjust) -> Self {
        Self {
            source,
            modifiers,
            color,
        }
    }

    /// Known-safe pattern: one slow oscillator tinted by `color`
    pub fn fallback(color: ColorTriple) -> Self {
        Self::new(
            SourceNode::Oscillator {
                frequency: 2.0,
                sync: 0.05,
                offset: 0.8,
            },
            Vec::new(),
            color.into(),
        )
    }

    pub fn source(&self) -> &SourceNode {
        &self.source
    }

    pub fn modifiers(&self) -> &[ModifierNode] {
        &self.modifiers
    }

    pub fn color(&self) -> &ColorAdjust {
        &self.color
    }

    /// Number of modifiers of each category
    pub fn modifier_counts(&self) -> ModifierBudget {
        let mut counts = ModifierBudget::new(0, 0, 0, 0);
        for modifier in &self.modifiers {
            match modifier.category() {
                ModifierCategory::Modulation => counts.modulations += 1,
                ModifierCategory::Geometry => counts.geometries += 1,
                ModifierCategory::Blend => counts.blends += 1,
                ModifierCategory::Effect => counts.effects += 1,
            }
        }
        counts
    }

    /// Flattened renderer calls: source, modifiers, color
    pub fn ops(&self) -> Vec<Op> {
        std::iter::once(self.source.op())
            .chain(self.modifiers.iter().map(ModifierNode::op))
            .chain(std::iter::once(self.color.op()))
            .collect()
    }
}

impl fmt::Display for PatternExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_chain(f, &self.ops())
    }
}

/// Post-processing step appended from the user sliders
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum UserAdjustment {
    /// Uniform channel gain, 0-1
    Brightness(f64),
    /// Pixel grid size per axis
    Pixelate(u32),
    /// Inversion amount, 0-1
    Invert(f64),
}

impl UserAdjustment {
    pub fn op(&self) -> Op {
        match *self {
            UserAdjustment::Brightness(gain) => Op::new("color", vec![gain, gain, gain]),
            UserAdjustment::Pixelate(size) => {
                Op::new("pixelate", vec![f64::from(size), f64::from(size)])
            }
            UserAdjustment::Invert(amount) => Op::new("invert", vec![amount]),
        }
    }
}

/// Generated expression plus the user adjustments applied on top
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderPlan {
    pub expression: PatternExpression,
    pub adjustments: Vec<UserAdjustment>,
}

impl RenderPlan {
    /// Plan with no adjustments
    pub fn bare(expression: PatternExpression) -> Self {
        Self {
            expression,
            adjustments: Vec::new(),
        }
    }

    pub fn ops(&self) -> Vec<Op> {
        let mut ops = self.expression.ops();
        ops.extend(self.adjustments.iter().map(UserAdjustment::op));
        ops
    }
}

impl fmt::Display for RenderPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_chain(f, &self.ops())
    }
}

fn write_chain(f: &mut fmt::Formatter<'_>, ops: &[Op]) -> fmt::Result {
    for (i, op) in ops.iter().enumerate() {
        if i > 0 {
            write!(f, ".")?;
        }
        write!(f, "{}", op)?;
    }
    Ok(())
}
