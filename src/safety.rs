//! Post-build flash and motion check.
//!
//! Advisory only: a report is produced and logged, the expression is never
//! rejected or modified.

use log::warn;
use serde::Serialize;

use crate::params::SafetyLimits;
use crate::pattern::{Op, PatternExpression};

/// Outcome of a safety scan
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyReport {
    pub is_safe: bool,
    pub warnings: Vec<String>,
}

impl SafetyReport {
    pub fn safe() -> Self {
        Self {
            is_safe: true,
            warnings: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SafetyValidator {
    limits: SafetyLimits,
}

impl SafetyValidator {
    pub fn new(limits: SafetyLimits) -> Self {
        Self { limits }
    }

    /// Scan every op, nested inputs included, for rates above the limits
    ///
    /// One warning per offending op.
    pub fn validate(&self, expression: &PatternExpression) -> SafetyReport {
        let mut warnings = Vec::new();
        for op in expression.ops() {
            self.scan(&op, &mut warnings);
        }

        for w in &warnings {
            warn!("Safety: {}", w);
        }

        SafetyReport {
            is_safe: warnings.is_empty(),
            warnings,
        }
    }

    fn scan(&self, op: &Op, warnings: &mut Vec<String>) {
        let max_hz = self.limits.frequency_hz.1;
        let max_speed = self.limits.speed.1;

        match (op.name, op.args.as_slice()) {
            ("osc", [frequency, ..]) if *frequency > max_hz => warnings.push(format!(
                "oscillator frequency {} Hz exceeds {} Hz",
                frequency, max_hz
            )),
            ("rotate", [_, speed, ..]) if *speed > max_speed => warnings.push(format!(
                "rotation speed {} exceeds {}",
                speed, max_speed
            )),
            _ => {}
        }

        if let Some(input) = &op.input {
            self.scan(input, warnings);
        }
    }
}
