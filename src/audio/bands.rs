//! Band energy extraction from byte spectra.

use std::ops::RangeInclusive;

use serde::Serialize;

use crate::params::AnalysisConfig;

/// Raw mean magnitudes (0-255) of the three analysis bands
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct BandEnergies {
    pub bass: f32,
    pub mid: f32,
    pub treble: f32,
}

impl BandEnergies {
    /// Bands divided by 255 and pinned to [0, 1]
    pub fn normalized(&self) -> BandEnergies {
        let norm = |v: f32| (v / 255.0).clamp(0.0, 1.0);
        BandEnergies {
            bass: norm(self.bass),
            mid: norm(self.mid),
            treble: norm(self.treble),
        }
    }

    /// Mean of the three bands, same scale as the bands
    pub fn mean(&self) -> f32 {
        (self.bass + self.mid + self.treble) / 3.0
    }
}

/// Buffer index ranges of the three bands for one source
#[derive(Debug, Clone, PartialEq)]
pub struct BandLayout {
    bass: RangeInclusive<usize>,
    mid: RangeInclusive<usize>,
    treble: RangeInclusive<usize>,
}

impl BandLayout {
    /// Compute index ranges for a source's window length and sample rate
    pub fn new(config: &AnalysisConfig, window_len: usize, sample_rate_hz: f32) -> Self {
        let indices = |range| AnalysisConfig::band_indices(range, window_len, sample_rate_hz);
        Self {
            bass: indices(config.bass_range_hz),
            mid: indices(config.mid_range_hz),
            treble: indices(config.treble_range_hz),
        }
    }

    /// Measure all three bands in one pass over the buffer
    pub fn measure(&self, buffer: &[u8]) -> BandEnergies {
        BandEnergies {
            bass: band_average(buffer, &self.bass),
            mid: band_average(buffer, &self.mid),
            treble: band_average(buffer, &self.treble),
        }
    }
}

/// Arithmetic mean of `buffer[range]`, clamped to the buffer; 0 when empty
pub fn band_average(buffer: &[u8], range: &RangeInclusive<usize>) -> f32 {
    let start = *range.start();
    let end = (*range.end()).min(buffer.len().saturating_sub(1));
    if buffer.is_empty() || start > end {
        return 0.0;
    }

    let slice = &buffer[start..=end];
    let sum: u32 = slice.iter().map(|&b| u32::from(b)).sum();
    sum as f32 / slice.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_average_is_inclusive_and_clamped() {
        let buffer = [10u8, 20, 30, 40];

        assert_eq!(band_average(&buffer, &(1..=2)), 25.0);
        // End past the buffer is clamped to the last index
        assert_eq!(band_average(&buffer, &(2..=99)), 35.0);
        // Start past the buffer means an empty band
        assert_eq!(band_average(&buffer, &(10..=20)), 0.0);
        assert_eq!(band_average(&[], &(0..=3)), 0.0);
    }

    #[test]
    fn test_layout_for_default_config() {
        let config = AnalysisConfig::default();
        let layout = BandLayout::new(&config, 2048, 44100.0);

        assert_eq!(layout.bass, 0..=11);
        assert_eq!(layout.mid, 11..=185);
        assert_eq!(layout.treble, 185..=928);
    }

    #[test]
    fn test_measure_silence() {
        let config = AnalysisConfig::default();
        let layout = BandLayout::new(&config, 2048, 44100.0);

        let energies = layout.measure(&[0u8; 1024]);
        assert_eq!(energies, BandEnergies::default());
        assert_eq!(energies.normalized(), BandEnergies::default());
    }

    #[test]
    fn test_normalized_full_scale() {
        let energies = BandEnergies {
            bass: 255.0,
            mid: 127.5,
            treble: 0.0,
        };
        let normalized = energies.normalized();

        assert_eq!(normalized.bass, 1.0);
        assert_eq!(normalized.mid, 0.5);
        assert_eq!(normalized.treble, 0.0);
    }
}
