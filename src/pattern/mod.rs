//! Procedural pattern generation.
//!
//! A seeded random source drives color harmonies and the pattern builder,
//! which emits a typed expression tree. The interpreter walks that tree and
//! drives a [`RenderSurface`]; no program text is ever evaluated.

mod ast;
mod builder;
mod color;
mod interpret;
mod presets;
mod rng;

// Re-export public types
pub use ast::{
    BlendMode, ColorAdjust, EffectOp, GeometryOp, ModifierCategory, ModifierNode, ModulationKind,
    Op, PatternExpression, RenderPlan, SourceNode, UserAdjustment,
};
pub use builder::{apply_user_parameters, PatternBuilder};
pub use color::{
    enhance_contrast, hsl_to_rgb, ColorGenerator, ColorTriple, HarmonyStrategy, PALETTES,
};
pub use interpret::{interpret, ChainRecorder, RenderSurface};
pub use presets::Preset;
pub use rng::{SeededRandom, DEFAULT_SEED};
