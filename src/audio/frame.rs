//! Per-tick feature frames and whole-song profiles.

use serde::Serialize;

use super::bands::BandEnergies;
use super::mood::Mood;

/// Audio features emitted once per analysis tick
///
/// Bands and intensity are normalized to [0, 1]; tempo is in BPM.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AudioFeatureFrame {
    pub bass: f32,
    pub mid: f32,
    pub treble: f32,
    pub tempo_bpm: f32,
    pub mood: Mood,
    pub intensity: f32,
}

impl AudioFeatureFrame {
    /// Build a frame from raw (0-255) band energies
    pub fn from_raw(raw: BandEnergies, tempo_bpm: f32) -> Self {
        let norm = raw.normalized();
        Self {
            bass: norm.bass,
            mid: norm.mid,
            treble: norm.treble,
            tempo_bpm,
            mood: Mood::classify(raw.bass, raw.mid, raw.treble),
            intensity: norm.mean(),
        }
    }

    /// Frame used when no audio can be analyzed
    pub fn silent() -> Self {
        Self {
            bass: 0.0,
            mid: 0.0,
            treble: 0.0,
            tempo_bpm: 120.0,
            mood: Mood::Happy,
            intensity: 0.0,
        }
    }
}

impl Default for AudioFeatureFrame {
    fn default() -> Self {
        Self::silent()
    }
}

/// Averaged features over a stretch of audio (preprocessing result)
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SongProfile {
    pub bass: f32,
    pub mid: f32,
    pub treble: f32,
    pub tempo_bpm: f32,
    /// `Happy` only if a strict majority of frames were happy
    pub mood: Mood,
    pub intensity: f32,
    /// Number of frames summarized
    pub frames: usize,
}

impl SongProfile {
    /// Summarize frames; `None` for an empty slice
    pub fn from_frames(frames: &[AudioFeatureFrame]) -> Option<Self> {
        if frames.is_empty() {
            return None;
        }

        let n = frames.len() as f32;
        let mean = |f: fn(&AudioFeatureFrame) -> f32| frames.iter().map(f).sum::<f32>() / n;

        let bass = mean(|fr| fr.bass);
        let mid = mean(|fr| fr.mid);
        let treble = mean(|fr| fr.treble);
        let happy = frames.iter().filter(|fr| fr.mood == Mood::Happy).count();

        Some(Self {
            bass,
            mid,
            treble,
            tempo_bpm: mean(|fr| fr.tempo_bpm),
            mood: if happy * 2 > frames.len() {
                Mood::Happy
            } else {
                Mood::Dark
            },
            intensity: (bass + mid + treble) / 3.0,
            frames: frames.len(),
        })
    }
}
