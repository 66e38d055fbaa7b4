//! Audio analysis properties over mock and PCM-fed sources.

use proptest::prelude::*;

use vibeweave::audio::{
    AudioAnalyzer, BeatDetector, FrequencyDataSource, Mood, PcmSpectrum, PlaybackState,
};
use vibeweave::params::AnalysisConfig;

/// Source replaying a caller-supplied byte spectrum
struct Replay {
    bins: Vec<u8>,
}

impl FrequencyDataSource for Replay {
    fn sample_rate(&self) -> f32 {
        44100.0
    }

    fn bin_count(&self) -> usize {
        self.bins.len()
    }

    fn frequency_data(&mut self, buffer: &mut [u8]) {
        buffer.copy_from_slice(&self.bins);
    }
}

fn sine(freq_hz: f32, sample_rate: f32, len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| (2.0 * std::f32::consts::PI * freq_hz * i as f32 / sample_rate).sin())
        .collect()
}

#[test]
fn test_silence_is_dark_and_zero() {
    let config = AnalysisConfig::default();
    let spectrum = PcmSpectrum::new(&config, 44100.0).unwrap();
    let mut analyzer = AudioAnalyzer::try_new(spectrum, config).unwrap();
    analyzer.set_playback(PlaybackState::Playing);

    let frame = analyzer.tick(0).unwrap();

    assert_eq!((frame.bass, frame.mid, frame.treble), (0.0, 0.0, 0.0));
    assert_eq!(frame.mood, Mood::Dark);
    assert_eq!(frame.tempo_bpm, 120.0);
}

#[test]
fn test_midrange_tone_reads_as_mid_and_happy() {
    let config = AnalysisConfig::default();
    let spectrum = PcmSpectrum::new(&config, 44100.0).unwrap();
    let mut analyzer = AudioAnalyzer::try_new(spectrum, config).unwrap();
    analyzer.set_playback(PlaybackState::Playing);

    let tone = sine(1000.0, 44100.0, 2048);
    let mut frame = None;
    for i in 0..10 {
        analyzer.source_mut().push_samples(&tone);
        frame = analyzer.tick(i * 16);
    }
    let frame = frame.unwrap();

    assert!(frame.mid > frame.bass);
    assert!(frame.mid > frame.treble);
    assert_eq!(frame.mood, Mood::Happy);
}

#[test]
fn test_preprocess_at_fixed_cadence() {
    let config = AnalysisConfig::default();
    let spectrum = PcmSpectrum::new(&config, 44100.0).unwrap();
    let mut analyzer = AudioAnalyzer::try_new(spectrum, config).unwrap();

    let block = sine(1000.0, 44100.0, 4410);
    let profile = analyzer
        .preprocess(2_000, |source| source.push_samples(&block))
        .unwrap();

    assert_eq!(profile.frames, 20);
    assert_eq!(profile.mood, Mood::Happy);
    assert_eq!(profile.tempo_bpm, 120.0);
}

proptest! {
    #[test]
    fn prop_bands_are_normalized(bins in prop::collection::vec(any::<u8>(), 1024)) {
        let mut analyzer =
            AudioAnalyzer::try_new(Replay { bins }, AnalysisConfig::default()).unwrap();
        analyzer.set_playback(PlaybackState::Playing);

        let frame = analyzer.tick(0).unwrap();
        for value in [frame.bass, frame.mid, frame.treble, frame.intensity] {
            prop_assert!((0.0..=1.0).contains(&value));
        }
    }

    #[test]
    fn prop_tempo_stays_in_bounds(
        ticks in prop::collection::vec((0u8..=255, 0u64..2_000), 1..200),
    ) {
        let mut detector = BeatDetector::new(&AnalysisConfig::default());
        let mut now = 0u64;

        for (bass, step) in ticks {
            now += step;
            let tempo = detector.update(f32::from(bass), now);
            prop_assert!((40.0..=240.0).contains(&tempo));
        }
    }
}
