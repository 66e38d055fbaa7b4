//! Error types for analysis, configuration and rendering.

use thiserror::Error;

/// Invalid analysis configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("FFT size must be a power of two >= 32, got {0}")]
    FftSize(usize),

    #[error("smoothing constant must be in [0, 1), got {0}")]
    Smoothing(f32),

    #[error("decibel window is empty: min {min} dB >= max {max} dB")]
    DecibelWindow { min: f32, max: f32 },

    #[error("band '{band}' has an inverted range: {low} Hz..{high} Hz")]
    BandRange {
        band: &'static str,
        low: f32,
        high: f32,
    },
}

/// Failure to start audio analysis on a source.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("audio source reports an unusable sample rate: {0} Hz")]
    InvalidSampleRate(f32),

    #[error("audio source exposes an empty frequency buffer")]
    EmptyBuffer,

    #[error("invalid analysis config: {0}")]
    Config(#[from] ConfigError),
}

/// Failure reported by a rendering surface while evaluating a pattern.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("surface rejected '{op}': {message}")]
    Surface { op: &'static str, message: String },

    #[error("surface does not support '{0}'")]
    Unsupported(&'static str),
}

impl RenderError {
    /// Creates a surface error for the named operation.
    pub fn surface(op: &'static str, message: impl Into<String>) -> Self {
        Self::Surface {
            op,
            message: message.into(),
        }
    }
}

/// Top-level failure of the command-line tool.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to decode WAV: {0}")]
    Wav(#[from] hound::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("audio analysis failed: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0} contains no audio frames")]
    EmptyAudio(String),
}
