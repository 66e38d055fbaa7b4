//! Tunable parameters, each documented with its unit (Hz, ms, BPM, dB).
//!
//! Analysis constants, seizure-safety bounds and the user-facing sliders
//! live here so no module hides its own magic numbers.

mod audio;
pub mod safety;
mod visual;

// Re-export all types
pub use audio::AnalysisConfig;
pub use safety::SafetyLimits;
pub use visual::{Complexity, ModifierBudget, ReactiveMapping, UserParameters};
