//! Spectrum analysis for audio-reactive visuals.
//!
//! A host-provided [`FrequencyDataSource`] is sampled once per frame to
//! extract bass/mid/treble energies, a bass-onset tempo estimate and a coarse
//! mood, packaged as an [`AudioFeatureFrame`].

mod analyzer;
mod bands;
mod frame;
mod mood;
mod source;
mod tempo;

// Re-export public types
pub use analyzer::{AudioAnalyzer, PlaybackState};
pub use bands::{band_average, BandEnergies, BandLayout};
pub use frame::{AudioFeatureFrame, SongProfile};
pub use mood::Mood;
pub use source::{hann_window, FrequencyDataSource, PcmSpectrum};
pub use tempo::BeatDetector;
