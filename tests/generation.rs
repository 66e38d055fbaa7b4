//! End-to-end pattern generation properties.

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use vibeweave::engine::VisualEngine;
use vibeweave::params::{Complexity, ModifierBudget, UserParameters};
use vibeweave::pattern::{
    apply_user_parameters, ColorGenerator, ColorTriple, PatternBuilder, PatternExpression,
    SeededRandom, SourceNode, UserAdjustment,
};
use vibeweave::safety::SafetyValidator;

const DEFAULT_SEED_PATTERN: &str = "gradient(0.0426138840499334)\
.rotate(3.7454074972445444, 0.23720062065636738)\
.modulateHue(solid(0.2589340327307582, 0.7596855435520411, 0.568235339410603), 0.5964835153892636)\
.hue(0.2858292469521984)\
.mult(noise(2.99969853553921, 0.09331267136149107), 0.5963116850005463)\
.kaleid(3)\
.color(3.745, 2.509, 2.373)";

fn complexity() -> impl Strategy<Value = Complexity> {
    prop_oneof![
        Just(Complexity::Simple),
        Just(Complexity::Medium),
        Just(Complexity::Complex),
    ]
}

fn build(seed: u32, complexity: Complexity, params: &UserParameters) -> PatternExpression {
    let mut rng = SeededRandom::new(seed);
    let color = ColorGenerator::new().generate(&mut rng);
    PatternBuilder::default().build(&mut rng, color, complexity, params)
}

#[test]
fn test_default_seed_regression() {
    let engine = VisualEngine::new(Some(12345), Complexity::Simple, UserParameters::new(0, 50, 0));
    let current = engine.current();

    assert_eq!(current.color, ColorTriple::new(2.266, 1.518, 1.436));
    assert_eq!(current.expression.to_string(), DEFAULT_SEED_PATTERN);
    assert!(current.report.is_safe);

    assert_eq!(
        engine.render_plan().to_string(),
        format!("{}.color(0.5, 0.5, 0.5)", DEFAULT_SEED_PATTERN)
    );
}

#[test]
fn test_engine_matches_direct_pipeline() {
    let params = UserParameters::new(0, 50, 0);
    let engine = VisualEngine::new(None, Complexity::Simple, params);

    assert_eq!(
        engine.current().expression,
        build(12345, Complexity::Simple, &params)
    );
}

#[test]
fn test_apply_user_parameters_cases() {
    let expr = build(1, Complexity::Medium, &UserParameters::default());

    let plain = apply_user_parameters(expr.clone(), &UserParameters::new(0, 80, 0));
    assert_eq!(plain.adjustments, vec![UserAdjustment::Brightness(0.8)]);

    let full = apply_user_parameters(expr.clone(), &UserParameters::new(100, 50, 0));
    assert_eq!(full.adjustments[1], UserAdjustment::Pixelate(5));

    let half = apply_user_parameters(expr, &UserParameters::new(50, 50, 50));
    assert_eq!(
        half.adjustments,
        vec![
            UserAdjustment::Brightness(0.5),
            UserAdjustment::Pixelate(102),
            UserAdjustment::Invert(0.5),
        ]
    );
}

#[test]
fn test_validator_flags_fast_oscillator() {
    let expr = PatternExpression::new(
        SourceNode::Oscillator {
            frequency: 10.0,
            sync: 0.0,
            offset: 0.0,
        },
        Vec::new(),
        ColorTriple::new(1.0, 1.0, 1.0).into(),
    );
    let before = expr.clone();

    let report = SafetyValidator::default().validate(&expr);

    assert!(!report.is_safe);
    assert!(!report.warnings.is_empty());
    assert_eq!(expr, before);
}

proptest! {
    #[test]
    fn prop_same_seed_same_pattern(
        seed in any::<u32>(),
        complexity in complexity(),
        p in 0u8..=100,
        b in 0u8..=100,
        i in 0u8..=100,
    ) {
        let params = UserParameters::new(p, b, i);
        prop_assert_eq!(build(seed, complexity, &params), build(seed, complexity, &params));
    }

    #[test]
    fn prop_expression_shape(
        seed in any::<u32>(),
        complexity in complexity(),
        p in any::<u8>(),
        b in any::<u8>(),
        i in any::<u8>(),
    ) {
        let params = UserParameters::new(p, b, i);
        let expr = build(seed, complexity, &params);
        let ops = expr.ops();

        prop_assert!(matches!(
            ops[0].name,
            "osc" | "noise" | "voronoi" | "shape" | "gradient" | "solid"
        ));
        prop_assert_eq!(ops.last().map(|op| op.name), Some("color"));
        prop_assert!(ops[1..ops.len() - 1].iter().all(|op| op.name != "color"));

        let counts = expr.modifier_counts();
        let caps = ModifierBudget::CAPS;
        prop_assert_eq!(counts, complexity.budget(&params.clamped()));
        prop_assert!(counts.modulations <= caps.modulations);
        prop_assert!(counts.geometries <= caps.geometries);
        prop_assert!(counts.blends <= caps.blends);
        prop_assert!(counts.effects <= caps.effects);
    }

    #[test]
    fn prop_generated_patterns_pass_validation(
        seed in any::<u32>(),
        complexity in complexity(),
        p in 0u8..=100,
        i in 0u8..=100,
    ) {
        let expr = build(seed, complexity, &UserParameters::new(p, 50, i));
        prop_assert!(SafetyValidator::default().validate(&expr).is_safe);
    }
}
