//! Bass-onset tempo estimation.
//!
//! This is a threshold onset detector with a refractory period, not an
//! autocorrelation beat tracker: the tempo is derived from the single most
//! recent inter-onset interval and will jump whenever that interval does.

use crate::params::AnalysisConfig;

/// Rolling beat-interval estimate driven by raw bass energy
#[derive(Debug, Clone)]
pub struct BeatDetector {
    threshold: f32,
    refractory_ms: u64,
    default_bpm: f32,
    bounds_bpm: (f32, f32),
    last_beat_ms: Option<u64>,
    interval_ms: Option<u64>,
}

impl BeatDetector {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            threshold: config.beat_threshold,
            refractory_ms: config.beat_refractory_ms,
            default_bpm: config.default_tempo_bpm,
            bounds_bpm: config.tempo_bounds_bpm,
            last_beat_ms: None,
            interval_ms: None,
        }
    }

    /// Feed one tick of raw bass energy (0-255) and return the tempo (BPM)
    ///
    /// # Arguments
    /// * `bass` - Mean bass magnitude on the 0-255 scale
    /// * `now_ms` - Monotonic timestamp of this tick (milliseconds)
    pub fn update(&mut self, bass: f32, now_ms: u64) -> f32 {
        if bass > self.threshold {
            match self.last_beat_ms {
                // First onset only anchors the clock
                None => self.last_beat_ms = Some(now_ms),
                Some(last) if now_ms.saturating_sub(last) >= self.refractory_ms => {
                    self.interval_ms = Some(now_ms - last);
                    self.last_beat_ms = Some(now_ms);
                }
                Some(_) => {}
            }
        }
        self.tempo_bpm()
    }

    /// Current tempo estimate, always within the configured bounds
    pub fn tempo_bpm(&self) -> f32 {
        match self.interval_ms {
            Some(ms) if ms > 0 => {
                (60_000.0 / ms as f32).clamp(self.bounds_bpm.0, self.bounds_bpm.1)
            }
            _ => self.default_bpm,
        }
    }

    /// Timestamp of the most recent onset
    pub fn last_beat_ms(&self) -> Option<u64> {
        self.last_beat_ms
    }

    /// Most recent inter-onset interval
    pub fn interval_ms(&self) -> Option<u64> {
        self.interval_ms
    }

    pub fn reset(&mut self) {
        self.last_beat_ms = None;
        self.interval_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> BeatDetector {
        BeatDetector::new(&AnalysisConfig::default())
    }

    #[test]
    fn test_default_tempo_before_beats() {
        let mut beats = detector();

        assert_eq!(beats.tempo_bpm(), 120.0);
        assert_eq!(beats.update(10.0, 0), 120.0);
        // First onset anchors but gives no interval yet
        assert_eq!(beats.update(200.0, 100), 120.0);
        assert_eq!(beats.last_beat_ms(), Some(100));
    }

    #[test]
    fn test_interval_sets_tempo() {
        let mut beats = detector();

        beats.update(200.0, 1000);
        let bpm = beats.update(200.0, 1500);

        assert_eq!(beats.interval_ms(), Some(500));
        assert_eq!(bpm, 120.0);

        let bpm = beats.update(200.0, 1900);
        assert_eq!(bpm, 150.0);
    }

    #[test]
    fn test_refractory_period_ignores_fast_onsets() {
        let mut beats = detector();

        beats.update(200.0, 1000);
        beats.update(200.0, 1100);
        assert_eq!(beats.interval_ms(), None);
        assert_eq!(beats.last_beat_ms(), Some(1000));

        // Exactly 200 ms counts
        beats.update(200.0, 1200);
        assert_eq!(beats.interval_ms(), Some(200));
    }

    #[test]
    fn test_threshold_is_strict() {
        let mut beats = detector();

        beats.update(150.0, 0);
        assert_eq!(beats.last_beat_ms(), None);
    }

    #[test]
    fn test_tempo_is_bounded() {
        let mut beats = detector();

        // 200 ms → 300 BPM, pinned to 240
        beats.update(255.0, 0);
        assert_eq!(beats.update(255.0, 200), 240.0);

        // 10 s → 6 BPM, pinned to 40
        assert_eq!(beats.update(255.0, 10_200), 40.0);

        beats.reset();
        assert_eq!(beats.tempo_bpm(), 120.0);
    }
}
