//! Frame-driven analysis pipeline: bands, tempo, mood.

use log::{debug, info};
use std::collections::VecDeque;

use super::bands::{BandEnergies, BandLayout};
use super::frame::{AudioFeatureFrame, SongProfile};
use super::source::FrequencyDataSource;
use super::tempo::BeatDetector;
use crate::error::AnalysisError;
use crate::params::AnalysisConfig;

/// Transport state reported by the host's audio element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    Playing,
    #[default]
    Paused,
    Ended,
}

/// Analysis pipeline over one injected spectrum source
///
/// The host calls [`tick`](Self::tick) once per rendered frame. Work is only
/// done while playback is `Playing`; the byte buffer is allocated once and
/// overwritten in place on every tick.
pub struct AudioAnalyzer<S: FrequencyDataSource> {
    source: S,
    config: AnalysisConfig,
    layout: BandLayout,
    beats: BeatDetector,
    buffer: Vec<u8>,
    history: VecDeque<BandEnergies>,
    playback: PlaybackState,
}

impl<S: FrequencyDataSource> AudioAnalyzer<S> {
    /// Attach to a source, failing if it cannot be analyzed
    pub fn try_new(source: S, config: AnalysisConfig) -> Result<Self, AnalysisError> {
        config.validate()?;

        let sample_rate = source.sample_rate();
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(AnalysisError::InvalidSampleRate(sample_rate));
        }
        let bins = source.bin_count();
        if bins == 0 {
            return Err(AnalysisError::EmptyBuffer);
        }

        let layout = BandLayout::new(&config, source.window_len(), sample_rate);
        info!("Audio analyzer: {} bins @ {}Hz", bins, sample_rate);

        Ok(Self {
            beats: BeatDetector::new(&config),
            history: VecDeque::with_capacity(config.history_len),
            buffer: vec![0; bins],
            layout,
            config,
            source,
            playback: PlaybackState::Paused,
        })
    }

    /// Update transport state; pausing or ending stops further ticks
    pub fn set_playback(&mut self, state: PlaybackState) {
        if state != self.playback {
            debug!("Playback {:?} -> {:?}", self.playback, state);
        }
        self.playback = state;
    }

    pub fn playback(&self) -> PlaybackState {
        self.playback
    }

    /// Whether the next frame should schedule a tick
    pub fn is_running(&self) -> bool {
        self.playback == PlaybackState::Playing
    }

    /// Analyze the current spectrum if playing
    ///
    /// # Arguments
    /// * `now_ms` - Monotonic frame timestamp (milliseconds)
    ///
    /// # Returns
    /// * `None` while paused or ended; no work is performed
    pub fn tick(&mut self, now_ms: u64) -> Option<AudioFeatureFrame> {
        if !self.is_running() {
            return None;
        }
        Some(self.analyze(now_ms))
    }

    /// Offline pass over `duration_ms` of audio at the preprocessing cadence
    ///
    /// `feed` advances the source by one interval before each sample is
    /// taken. Runs regardless of playback state, on its own beat clock;
    /// live tempo and history are left untouched.
    pub fn preprocess<F>(&mut self, duration_ms: u64, mut feed: F) -> Option<SongProfile>
    where
        F: FnMut(&mut S),
    {
        let interval = self.config.preprocess_interval_ms.max(1);
        let ticks = duration_ms / interval;
        let mut beats = BeatDetector::new(&self.config);

        let frames: Vec<AudioFeatureFrame> = (0..ticks)
            .map(|i| {
                feed(&mut self.source);
                let raw = self.measure();
                AudioFeatureFrame::from_raw(raw, beats.update(raw.bass, i * interval))
            })
            .collect();

        let profile = SongProfile::from_frames(&frames);
        if let Some(p) = &profile {
            info!(
                "Preprocessed {} frames: tempo {:.1} BPM, mood {}",
                p.frames, p.tempo_bpm, p.mood
            );
        }
        profile
    }

    /// Recent raw band triples, oldest first
    pub fn history(&self) -> impl Iterator<Item = &BandEnergies> {
        self.history.iter()
    }

    /// Current tempo estimate without ticking
    pub fn tempo_bpm(&self) -> f32 {
        self.beats.tempo_bpm()
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    fn measure(&mut self) -> BandEnergies {
        self.source.frequency_data(&mut self.buffer);
        self.layout.measure(&self.buffer)
    }

    fn analyze(&mut self, now_ms: u64) -> AudioFeatureFrame {
        let raw = self.measure();
        let tempo = self.beats.update(raw.bass, now_ms);

        if self.history.len() == self.config.history_len {
            self.history.pop_front();
        }
        if self.config.history_len > 0 {
            self.history.push_back(raw);
        }

        AudioFeatureFrame::from_raw(raw, tempo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::mood::Mood;

    /// Source returning a fixed spectrum and counting reads
    struct FixedSpectrum {
        sample_rate: f32,
        bins: Vec<u8>,
        reads: usize,
    }

    impl FixedSpectrum {
        fn new(bins: Vec<u8>) -> Self {
            Self {
                sample_rate: 44100.0,
                bins,
                reads: 0,
            }
        }
    }

    impl FrequencyDataSource for FixedSpectrum {
        fn sample_rate(&self) -> f32 {
            self.sample_rate
        }

        fn bin_count(&self) -> usize {
            self.bins.len()
        }

        fn frequency_data(&mut self, buffer: &mut [u8]) {
            self.reads += 1;
            buffer.copy_from_slice(&self.bins);
        }
    }

    fn playing(source: FixedSpectrum) -> AudioAnalyzer<FixedSpectrum> {
        let mut analyzer = AudioAnalyzer::try_new(source, AnalysisConfig::default()).unwrap();
        analyzer.set_playback(PlaybackState::Playing);
        analyzer
    }

    #[test]
    fn test_silence_frame() {
        let mut analyzer = playing(FixedSpectrum::new(vec![0; 1024]));
        let frame = analyzer.tick(0).unwrap();

        assert_eq!((frame.bass, frame.mid, frame.treble), (0.0, 0.0, 0.0));
        assert_eq!(frame.mood, Mood::Dark);
        assert_eq!(frame.tempo_bpm, 120.0);
    }

    #[test]
    fn test_no_ticks_unless_playing() {
        let mut analyzer =
            AudioAnalyzer::try_new(FixedSpectrum::new(vec![0; 1024]), AnalysisConfig::default())
                .unwrap();

        assert!(analyzer.tick(0).is_none());
        analyzer.set_playback(PlaybackState::Playing);
        assert!(analyzer.tick(16).is_some());
        analyzer.set_playback(PlaybackState::Ended);
        assert!(analyzer.tick(33).is_none());

        assert_eq!(analyzer.into_source().reads, 1);
    }

    #[test]
    fn test_loud_bass_drives_tempo() {
        let mut bins = vec![0u8; 1024];
        bins[..12].fill(255);
        let mut analyzer = playing(FixedSpectrum::new(bins));

        analyzer.tick(0);
        let frame = analyzer.tick(500).unwrap();

        assert_eq!(frame.bass, 1.0);
        assert_eq!(frame.mood, Mood::Dark);
        assert_eq!(frame.tempo_bpm, 120.0);
        assert_eq!(analyzer.tick(900).unwrap().tempo_bpm, 150.0);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut analyzer = playing(FixedSpectrum::new(vec![10; 1024]));
        for i in 0..150 {
            analyzer.tick(i * 16);
        }
        assert_eq!(analyzer.history().count(), 100);
    }

    #[test]
    fn test_preprocess_profiles_audio() {
        let mut bins = vec![0u8; 1024];
        bins[200..].fill(200);
        let mut analyzer =
            AudioAnalyzer::try_new(FixedSpectrum::new(bins), AnalysisConfig::default()).unwrap();

        let mut fed = 0;
        let profile = analyzer.preprocess(3_000, |_| fed += 1).unwrap();

        assert_eq!(profile.frames, 30);
        assert_eq!(fed, 30);
        assert_eq!(profile.mood, Mood::Happy);
        assert_eq!(profile.bass, 0.0);
    }

    #[test]
    fn test_preprocess_keeps_live_state() {
        let mut bins = vec![0u8; 1024];
        bins[..12].fill(255);
        let mut analyzer = playing(FixedSpectrum::new(bins));

        for now in [60_000, 60_500, 61_000] {
            analyzer.tick(now);
        }
        assert_eq!(analyzer.tempo_bpm(), 120.0);

        // Bass pulse every fourth 100 ms tick
        let mut tick = 0;
        let profile = analyzer
            .preprocess(4_000, |source| {
                source.bins[..12].fill(if tick % 4 == 0 { 255 } else { 0 });
                tick += 1;
            })
            .unwrap();

        assert_eq!(profile.frames, 40);
        assert_eq!(profile.tempo_bpm, 147.0);
        assert_eq!(analyzer.tempo_bpm(), 120.0);
        assert_eq!(analyzer.history().count(), 3);

        // Live clock still anchored at 61 000 ms
        analyzer.source_mut().bins[..12].fill(255);
        assert_eq!(analyzer.tick(61_400).unwrap().tempo_bpm, 150.0);
    }

    #[test]
    fn test_rejects_unusable_sources() {
        let mut bad_rate = FixedSpectrum::new(vec![0; 8]);
        bad_rate.sample_rate = 0.0;
        assert_eq!(
            AudioAnalyzer::try_new(bad_rate, AnalysisConfig::default()).err(),
            Some(AnalysisError::InvalidSampleRate(0.0))
        );

        assert_eq!(
            AudioAnalyzer::try_new(FixedSpectrum::new(vec![]), AnalysisConfig::default()).err(),
            Some(AnalysisError::EmptyBuffer)
        );
    }
}
