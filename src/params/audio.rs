//! Audio analysis configuration and constants.

use std::ops::RangeInclusive;

use crate::error::ConfigError;

/// Spectrum analysis configuration with frequency band mappings
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// FFT window size (must be power of 2)
    /// Byte buffers produced from it hold `fft_size / 2` bins
    pub fft_size: usize,

    /// Time smoothing between successive spectra (0 = none, close to 1 = sluggish)
    pub smoothing: f32,

    /// Magnitude mapped to byte 0 (dBFS)
    pub min_decibels: f32,

    /// Magnitude mapped to byte 255 (dBFS)
    pub max_decibels: f32,

    /// Bass frequency range (Hz)
    pub bass_range_hz: (f32, f32),

    /// Mid frequency range (Hz)
    pub mid_range_hz: (f32, f32),

    /// Treble frequency range (Hz)
    pub treble_range_hz: (f32, f32),

    /// Raw bass magnitude (0-255) above which a beat onset is registered
    pub beat_threshold: f32,

    /// Minimum time between two onsets (milliseconds)
    pub beat_refractory_ms: u64,

    /// Tempo reported before the first beat interval is known (BPM)
    pub default_tempo_bpm: f32,

    /// Reported tempo is clamped into this range (BPM)
    pub tempo_bounds_bpm: (f32, f32),

    /// Number of raw band triples kept in the rolling history
    pub history_len: usize,

    /// Tick cadence of the offline preprocessing pass (milliseconds)
    pub preprocess_interval_ms: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            fft_size: 2048,
            smoothing: 0.8,
            min_decibels: -100.0,
            max_decibels: -30.0,
            bass_range_hz: (20.0, 250.0),
            mid_range_hz: (250.0, 4000.0),
            treble_range_hz: (4000.0, 20000.0),
            beat_threshold: 150.0,
            beat_refractory_ms: 200,
            default_tempo_bpm: 120.0,
            tempo_bounds_bpm: (40.0, 240.0),
            history_len: 100,
            preprocess_interval_ms: 100,
        }
    }
}

impl AnalysisConfig {
    /// Convert frequency (Hz) to spectrum index for a given window length
    pub fn hz_to_index(hz: f32, window_len: usize, sample_rate_hz: f32) -> usize {
        (hz * window_len as f32 / sample_rate_hz).floor().max(0.0) as usize
    }

    /// Inclusive index range for a band, before clamping to the buffer
    pub fn band_indices(
        range_hz: (f32, f32),
        window_len: usize,
        sample_rate_hz: f32,
    ) -> RangeInclusive<usize> {
        Self::hz_to_index(range_hz.0, window_len, sample_rate_hz)
            ..=Self::hz_to_index(range_hz.1, window_len, sample_rate_hz)
    }

    /// Number of byte bins a source configured with this FFT size exposes
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Validate configuration (FFT size must be power of 2, etc.)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.fft_size.is_power_of_two() || self.fft_size < 32 {
            return Err(ConfigError::FftSize(self.fft_size));
        }
        if !(0.0..1.0).contains(&self.smoothing) {
            return Err(ConfigError::Smoothing(self.smoothing));
        }
        if self.min_decibels >= self.max_decibels {
            return Err(ConfigError::DecibelWindow {
                min: self.min_decibels,
                max: self.max_decibels,
            });
        }
        for (band, (low, high)) in [
            ("bass", self.bass_range_hz),
            ("mid", self.mid_range_hz),
            ("treble", self.treble_range_hz),
        ] {
            if low > high || low < 0.0 {
                return Err(ConfigError::BandRange { band, low, high });
            }
        }
        Ok(())
    }
}
