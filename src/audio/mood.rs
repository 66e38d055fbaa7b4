//! Brightness-versus-bass mood heuristic.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse mood of the current audio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Dark,
}

impl Mood {
    /// `Happy` when mid/treble brightness strictly exceeds bass, else `Dark`
    ///
    /// Stateless: the result may flip on every tick. Equal energies
    /// (including silence) classify as `Dark`.
    pub fn classify(bass: f32, mid: f32, treble: f32) -> Mood {
        let brightness = (mid + treble) / 2.0;
        if brightness > bass {
            Mood::Happy
        } else {
            Mood::Dark
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mood::Happy => write!(f, "happy"),
            Mood::Dark => write!(f, "dark"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bright_audio_is_happy() {
        assert_eq!(Mood::classify(50.0, 120.0, 90.0), Mood::Happy);
    }

    #[test]
    fn test_bass_heavy_audio_is_dark() {
        assert_eq!(Mood::classify(200.0, 120.0, 90.0), Mood::Dark);
    }

    #[test]
    fn test_silence_tie_breaks_dark() {
        assert_eq!(Mood::classify(0.0, 0.0, 0.0), Mood::Dark);
        assert_eq!(Mood::classify(100.0, 100.0, 100.0), Mood::Dark);
    }
}
