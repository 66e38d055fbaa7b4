//! Walks a render plan and drives a rendering surface.

use log::debug;

use super::ast::{Op, RenderPlan};
use crate::error::RenderError;

/// Rendering API the interpreter drives
///
/// `begin` receives the source op, `apply` every following op in chain
/// order (ops carrying an `input` expect the surface to evaluate that input
/// first), and `output` presents the finished chain.
pub trait RenderSurface {
    fn begin(&mut self, source: &Op) -> Result<(), RenderError>;

    fn apply(&mut self, op: &Op) -> Result<(), RenderError>;

    fn output(&mut self) -> Result<(), RenderError>;
}

/// Evaluate `plan` on `surface`, stopping at the first failure
pub fn interpret<S: RenderSurface + ?Sized>(
    plan: &RenderPlan,
    surface: &mut S,
) -> Result<(), RenderError> {
    let ops = plan.ops();
    let Some((source, rest)) = ops.split_first() else {
        return Err(RenderError::surface("output", "empty chain"));
    };

    surface.begin(source)?;
    for op in rest {
        surface.apply(op)?;
    }
    surface.output()?;

    debug!("Rendered chain of {} ops", ops.len());
    Ok(())
}

/// Surface that records the chain as text
#[derive(Debug, Clone, Default)]
pub struct ChainRecorder {
    chain: String,
    presented: Vec<String>,
    unsupported: Vec<&'static str>,
}

impl ChainRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorder that fails on any op named in `names`
    pub fn rejecting(names: &[&'static str]) -> Self {
        Self {
            unsupported: names.to_vec(),
            ..Self::default()
        }
    }

    /// Chains passed to `output`, oldest first
    pub fn presented(&self) -> &[String] {
        &self.presented
    }

    pub fn last(&self) -> Option<&str> {
        self.presented.last().map(String::as_str)
    }

    fn check(&self, op: &Op) -> Result<(), RenderError> {
        let nested = op.input.as_deref();
        for node in std::iter::once(op).chain(nested) {
            if self.unsupported.contains(&node.name) {
                return Err(RenderError::Unsupported(node.name));
            }
        }
        Ok(())
    }
}

impl RenderSurface for ChainRecorder {
    fn begin(&mut self, source: &Op) -> Result<(), RenderError> {
        self.check(source)?;
        self.chain = source.to_string();
        Ok(())
    }

    fn apply(&mut self, op: &Op) -> Result<(), RenderError> {
        if self.chain.is_empty() {
            return Err(RenderError::surface(op.name, "no source to apply to"));
        }
        self.check(op)?;
        self.chain.push('.');
        self.chain.push_str(&op.to_string());
        Ok(())
    }

    fn output(&mut self) -> Result<(), RenderError> {
        if self.chain.is_empty() {
            return Err(RenderError::surface("output", "nothing to present"));
        }
        self.presented.push(std::mem::take(&mut self.chain));
        Ok(())
    }
}
