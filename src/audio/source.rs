//! Frequency-data capability and a PCM-fed spectrum source.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f32::consts::PI;
use std::sync::Arc;

use crate::error::AnalysisError;
use crate::params::AnalysisConfig;

/// Capability the host implements to expose a live spectrum
///
/// Mirrors an analyser node: a fixed number of byte magnitudes (0-255)
/// spread linearly from 0 Hz to Nyquist.
pub trait FrequencyDataSource {
    /// Sample rate of the audio feeding the spectrum (Hz)
    fn sample_rate(&self) -> f32;

    /// Number of byte bins written by [`frequency_data`](Self::frequency_data)
    fn bin_count(&self) -> usize;

    /// Length of the analysis window the bins were computed from
    fn window_len(&self) -> usize {
        self.bin_count() * 2
    }

    /// Overwrite `buffer` with the current byte magnitudes
    fn frequency_data(&mut self, buffer: &mut [u8]);
}

/// Spectrum source fed with raw mono PCM samples
///
/// Each call to `frequency_data` windows the most recent `fft_size` samples,
/// runs a forward FFT, smooths magnitudes over time and maps them onto the
/// configured decibel window.
pub struct PcmSpectrum {
    sample_rate_hz: f32,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    samples: Vec<f32>,
    scratch: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
    smoothing: f32,
    min_decibels: f32,
    max_decibels: f32,
}

impl PcmSpectrum {
    pub fn new(config: &AnalysisConfig, sample_rate_hz: f32) -> Result<Self, AnalysisError> {
        config.validate()?;
        if !(sample_rate_hz.is_finite() && sample_rate_hz > 0.0) {
            return Err(AnalysisError::InvalidSampleRate(sample_rate_hz));
        }

        let size = config.fft_size;
        let mut planner = FftPlanner::new();

        Ok(Self {
            sample_rate_hz,
            fft: planner.plan_fft_forward(size),
            window: (0..size).map(|i| hann_window(i, size)).collect(),
            samples: vec![0.0; size],
            scratch: vec![Complex::new(0.0, 0.0); size],
            smoothed: vec![0.0; size / 2],
            smoothing: config.smoothing,
            min_decibels: config.min_decibels,
            max_decibels: config.max_decibels,
        })
    }

    /// Append samples, keeping only the most recent window
    pub fn push_samples(&mut self, input: &[f32]) {
        let size = self.samples.len();
        if input.len() >= size {
            self.samples.copy_from_slice(&input[input.len() - size..]);
        } else {
            self.samples.copy_within(input.len().., 0);
            self.samples[size - input.len()..].copy_from_slice(input);
        }
    }

    /// Forget buffered audio and smoothing state
    pub fn clear(&mut self) {
        self.samples.fill(0.0);
        self.smoothed.fill(0.0);
    }
}

impl FrequencyDataSource for PcmSpectrum {
    fn sample_rate(&self) -> f32 {
        self.sample_rate_hz
    }

    fn bin_count(&self) -> usize {
        self.smoothed.len()
    }

    fn window_len(&self) -> usize {
        self.samples.len()
    }

    fn frequency_data(&mut self, buffer: &mut [u8]) {
        for ((slot, &sample), &w) in self
            .scratch
            .iter_mut()
            .zip(&self.samples)
            .zip(&self.window)
        {
            *slot = Complex::new(sample * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        let norm = 1.0 / self.samples.len() as f32;
        let db_span = self.max_decibels - self.min_decibels;

        for (k, out) in buffer.iter_mut().enumerate() {
            let Some(smoothed) = self.smoothed.get_mut(k) else {
                *out = 0;
                continue;
            };
            let magnitude = self.scratch[k].norm() * norm;
            *smoothed = self.smoothing * *smoothed + (1.0 - self.smoothing) * magnitude;

            // Silence maps below the window rather than to -inf
            let db = 20.0 * smoothed.max(1e-12).log10();
            let scaled = 255.0 * (db - self.min_decibels) / db_span;
            *out = scaled.clamp(0.0, 255.0) as u8;
        }
    }
}

/// Hann taper coefficient for sample `index` of a `size`-point window
pub fn hann_window(index: usize, size: usize) -> f32 {
    0.5 * (1.0 - ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos())
}
