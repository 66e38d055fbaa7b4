//! High-level visual engine: generation, parameter updates, presentation.

use log::{info, warn};
use serde::Serialize;

use crate::audio::{AudioAnalyzer, AudioFeatureFrame, FrequencyDataSource, PlaybackState};
use crate::error::RenderError;
use crate::params::{AnalysisConfig, Complexity, ReactiveMapping, SafetyLimits, UserParameters};
use crate::pattern::{
    apply_user_parameters, interpret, ColorGenerator, ColorTriple, PatternBuilder,
    PatternExpression, Preset, RenderPlan, RenderSurface, SeededRandom,
};
use crate::safety::{SafetyReport, SafetyValidator};

/// One generation result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedPattern {
    pub color: ColorTriple,
    pub expression: PatternExpression,
    pub report: SafetyReport,
}

/// What ended up on the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presented {
    Pattern,
    Fallback,
}

/// Per-frame render uniforms derived from audio features
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReactiveUniforms {
    pub zoom: f64,
    /// Already within the safety speed bounds
    pub rotation_speed: f64,
    /// Fraction of a hue turn
    pub hue_shift: f64,
}

/// Owns the random source and generation pipeline
///
/// A pattern is generated on construction and again whenever the user
/// parameters or tier actually change. Regeneration continues the random
/// sequence rather than restarting it.
pub struct VisualEngine {
    rng: SeededRandom,
    colors: ColorGenerator,
    builder: PatternBuilder,
    validator: SafetyValidator,
    limits: SafetyLimits,
    mapping: ReactiveMapping,
    complexity: Complexity,
    params: UserParameters,
    current: GeneratedPattern,
}

impl VisualEngine {
    /// Create the engine and generate the first pattern
    ///
    /// `seed` of `None` uses the default seed.
    pub fn new(seed: Option<u32>, complexity: Complexity, params: UserParameters) -> Self {
        Self::with_limits(seed, complexity, params, SafetyLimits::default())
    }

    pub fn with_limits(
        seed: Option<u32>,
        complexity: Complexity,
        params: UserParameters,
        limits: SafetyLimits,
    ) -> Self {
        let mut rng = SeededRandom::default();
        rng.reset(seed);

        let colors = ColorGenerator::new();
        let builder = PatternBuilder::new(limits.clone());
        let validator = SafetyValidator::new(limits.clone());
        let params = params.clamped();
        let current = generate(&mut rng, &colors, &builder, &validator, complexity, &params);

        info!(
            "Visual engine: seed {}, {:?}, {} modifiers",
            seed.unwrap_or(crate::pattern::DEFAULT_SEED),
            complexity,
            current.expression.modifiers().len()
        );

        Self {
            rng,
            colors,
            builder,
            validator,
            limits,
            mapping: ReactiveMapping::default(),
            complexity,
            params,
            current,
        }
    }

    pub fn with_mapping(mut self, mapping: ReactiveMapping) -> Self {
        self.mapping = mapping;
        self
    }

    pub fn current(&self) -> &GeneratedPattern {
        &self.current
    }

    pub fn params(&self) -> UserParameters {
        self.params
    }

    pub fn complexity(&self) -> Complexity {
        self.complexity
    }

    /// Apply new slider values, regenerating only if they differ
    pub fn update_params(&mut self, params: UserParameters) -> bool {
        let params = params.clamped();
        if params == self.params {
            return false;
        }
        self.params = params;
        self.regenerate();
        true
    }

    /// Switch tier, regenerating only if it differs
    pub fn set_complexity(&mut self, complexity: Complexity) -> bool {
        if complexity == self.complexity {
            return false;
        }
        self.complexity = complexity;
        self.regenerate();
        true
    }

    /// Draw a new color and pattern with the current settings
    pub fn regenerate(&mut self) -> &GeneratedPattern {
        self.current = generate(
            &mut self.rng,
            &self.colors,
            &self.builder,
            &self.validator,
            self.complexity,
            &self.params,
        );
        &self.current
    }

    /// Switch to a named preset tinted by a palette color
    ///
    /// Draws from the same random sequence as regular generation.
    pub fn preset(&mut self, preset: Preset) -> &GeneratedPattern {
        let color = self.colors.palette_color(&mut self.rng);
        let expression = preset.build(color, &self.limits);
        let report = self.validator.validate(&expression);
        info!("Preset: {}", preset);

        self.current = GeneratedPattern {
            color,
            expression,
            report,
        };
        &self.current
    }

    /// Current expression with the user adjustments applied
    pub fn render_plan(&self) -> RenderPlan {
        apply_user_parameters(self.current.expression.clone(), &self.params)
    }

    /// Evaluate the current plan, substituting the fallback if it fails
    ///
    /// Only a failure of the fallback itself is returned.
    pub fn present<S: RenderSurface + ?Sized>(
        &self,
        surface: &mut S,
    ) -> Result<Presented, RenderError> {
        match interpret(&self.render_plan(), surface) {
            Ok(()) => Ok(Presented::Pattern),
            Err(e) => {
                warn!("Pattern evaluation failed ({}), using fallback", e);
                let fallback = RenderPlan::bare(PatternExpression::fallback(self.current.color));
                interpret(&fallback, surface)?;
                Ok(Presented::Fallback)
            }
        }
    }

    /// Map a feature frame to render uniforms
    pub fn uniforms(&self, frame: &AudioFeatureFrame) -> ReactiveUniforms {
        let m = &self.mapping;
        ReactiveUniforms {
            zoom: m.base_zoom + f64::from(frame.bass) * m.bass_to_zoom_scale,
            rotation_speed: self
                .limits
                .clamp_speed(m.base_rotation_speed + f64::from(frame.mid) * m.mid_to_rotation_scale),
            hue_shift: f64::from(frame.treble) * m.treble_to_hue_scale,
        }
    }
}

fn generate(
    rng: &mut SeededRandom,
    colors: &ColorGenerator,
    builder: &PatternBuilder,
    validator: &SafetyValidator,
    complexity: Complexity,
    params: &UserParameters,
) -> GeneratedPattern {
    let color = colors.generate(rng);
    let expression = builder.build(rng, color, complexity, params);
    let report = validator.validate(&expression);
    GeneratedPattern {
        color,
        expression,
        report,
    }
}

/// Feature frames for the render loop, with or without working audio
///
/// If the analyzer cannot be attached the feed keeps serving the silent
/// default frame, so visuals continue as a non-reactive animation.
pub struct FeatureFeed<S: FrequencyDataSource> {
    analyzer: Option<AudioAnalyzer<S>>,
    latest: AudioFeatureFrame,
}

impl<S: FrequencyDataSource> FeatureFeed<S> {
    pub fn attach(source: S, config: AnalysisConfig) -> Self {
        let analyzer = match AudioAnalyzer::try_new(source, config) {
            Ok(analyzer) => Some(analyzer),
            Err(e) => {
                warn!("Audio analysis unavailable ({}), visuals will not react", e);
                None
            }
        };
        Self {
            analyzer,
            latest: AudioFeatureFrame::silent(),
        }
    }

    pub fn is_reactive(&self) -> bool {
        self.analyzer.is_some()
    }

    pub fn set_playback(&mut self, state: PlaybackState) {
        if let Some(analyzer) = &mut self.analyzer {
            analyzer.set_playback(state);
        }
    }

    /// Frame for this render tick
    ///
    /// While paused or ended the last analyzed frame is held.
    pub fn frame(&mut self, now_ms: u64) -> AudioFeatureFrame {
        if let Some(frame) = self.analyzer.as_mut().and_then(|a| a.tick(now_ms)) {
            self.latest = frame;
        }
        self.latest
    }

    pub fn analyzer_mut(&mut self) -> Option<&mut AudioAnalyzer<S>> {
        self.analyzer.as_mut()
    }
}
