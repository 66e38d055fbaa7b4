//! Deterministic random source for pattern and color generation.
//!
//! All randomness in pattern generation flows through [`SeededRandom`] so a
//! seed fully determines the generated expression. The generator is a 32-bit
//! linear congruential generator (Numerical Recipes constants).

/// Seed used when none is supplied
pub const DEFAULT_SEED: u32 = 12345;

const MULTIPLIER: u32 = 1_664_525;
const INCREMENT: u32 = 1_013_904_223;
const MODULUS: f64 = 4_294_967_296.0;

/// Seedable LCG; one instance per generation pipeline, never shared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRandom {
    state: u32,
}

impl Default for SeededRandom {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl SeededRandom {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Restart the sequence from `seed`, or [`DEFAULT_SEED`] when `None`
    pub fn reset(&mut self, seed: Option<u32>) {
        self.state = seed.unwrap_or(DEFAULT_SEED);
    }

    /// Current internal state
    pub fn state(&self) -> u32 {
        self.state
    }

    /// Advance and return a value in [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        self.state = self
            .state
            .wrapping_mul(MULTIPLIER)
            .wrapping_add(INCREMENT);
        f64::from(self.state) / MODULUS
    }

    /// Uniform value in [min, max)
    pub fn range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Uniform integer in [min, max], inclusive on both ends
    pub fn int(&mut self, min: i64, max: i64) -> i64 {
        let span = (max - min + 1) as f64;
        min + (self.next_f64() * span).floor() as i64
    }

    /// `true` with probability `p`
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniformly chosen element; `None` for an empty slice
    pub fn choice<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let index = (self.next_f64() * items.len() as f64).floor() as usize;
        items.get(index.min(items.len() - 1))
    }

    /// Element chosen with probability proportional to its weight
    ///
    /// Non-positive weights are never chosen; `None` if no weight is positive.
    pub fn weighted<'a, T>(&mut self, items: &'a [(T, f64)]) -> Option<&'a T> {
        let total: f64 = items.iter().map(|(_, w)| w.max(0.0)).sum();
        if total <= 0.0 {
            return None;
        }

        let mut remaining = self.next_f64() * total;
        let mut last = None;
        for (item, weight) in items.iter().filter(|(_, w)| *w > 0.0) {
            if remaining < *weight {
                return Some(item);
            }
            remaining -= weight;
            last = Some(item);
        }
        // Rounding can leave a sliver past the final weight
        last
    }
}
