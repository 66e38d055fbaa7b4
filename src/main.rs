//! Vibeweave - audio-reactive procedural pattern generator
//!
//! `analyze` runs a WAV file through the spectrum analyzer at a simulated
//! frame rate and prints a song profile with a generated pattern;
//! `generate` builds a pattern with no audio at all.

mod cli;

use clap::Parser;
use log::{debug, info};
use serde::Serialize;
use std::path::Path;

use cli::{Args, Command};
use vibeweave::audio::{
    AudioAnalyzer, AudioFeatureFrame, PcmSpectrum, PlaybackState, SongProfile,
};
use vibeweave::engine::{ReactiveUniforms, VisualEngine};
use vibeweave::error::CliError;
use vibeweave::params::AnalysisConfig;
use vibeweave::pattern::{ColorTriple, Op, Preset, RenderPlan};
use vibeweave::safety::SafetyReport;

/// Everything printed for one run
#[derive(Serialize)]
struct Report {
    #[serde(skip_serializing_if = "Option::is_none")]
    profile: Option<SongProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    uniforms: Option<ReactiveUniforms>,
    color: ColorTriple,
    chain: String,
    ops: Vec<Op>,
    safety: SafetyReport,
}

impl Report {
    fn new(color: ColorTriple, plan: &RenderPlan, safety: SafetyReport) -> Self {
        Self {
            profile: None,
            uniforms: None,
            color,
            chain: plan.to_string(),
            ops: plan.ops(),
            safety,
        }
    }

    fn print(&self, json: bool) -> Result<(), CliError> {
        if json {
            println!("{}", serde_json::to_string_pretty(self)?);
            return Ok(());
        }

        if let Some(p) = &self.profile {
            println!("Song profile ({} frames)", p.frames);
            println!("  bass      {:.3}", p.bass);
            println!("  mid       {:.3}", p.mid);
            println!("  treble    {:.3}", p.treble);
            println!("  intensity {:.3}", p.intensity);
            println!("  tempo     {:.1} BPM", p.tempo_bpm);
            println!("  mood      {}", p.mood);
        }
        if let Some(u) = &self.uniforms {
            println!(
                "Uniforms: zoom {:.3}, rotation {:.3}, hue {:.3}",
                u.zoom, u.rotation_speed, u.hue_shift
            );
        }
        println!(
            "Color: ({:.3}, {:.3}, {:.3})",
            self.color.r, self.color.g, self.color.b
        );
        println!("Pattern: {}", self.chain);
        if self.safety.is_safe {
            println!("Safety: ok");
        } else {
            println!("Safety: {} warning(s)", self.safety.warnings.len());
            for w in &self.safety.warnings {
                println!("  - {}", w);
            }
        }
        Ok(())
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let report = match &args.command {
        Command::Analyze { path, fps } => analyze(args, path, *fps)?,
        Command::Generate { preset } => generate(args, *preset),
    };
    report.print(args.json)
}

fn analyze(args: &Args, path: &Path, fps: u32) -> Result<Report, CliError> {
    let (samples, sample_rate) = decode_wav(path)?;
    info!(
        "Loaded {}: {} samples @ {}Hz",
        path.display(),
        samples.len(),
        sample_rate
    );

    let config = AnalysisConfig::default();
    let spectrum = PcmSpectrum::new(&config, sample_rate as f32)?;
    let mut analyzer = AudioAnalyzer::try_new(spectrum, config)?;
    analyzer.set_playback(PlaybackState::Playing);

    let hop = hop_len(sample_rate, fps);
    let mut frames = Vec::with_capacity(samples.len() / hop + 1);
    for (i, chunk) in samples.chunks(hop).enumerate() {
        analyzer.source_mut().push_samples(chunk);
        if let Some(frame) = analyzer.tick(tick_time_ms(i, hop, sample_rate)) {
            frames.push(frame);
        }
    }
    analyzer.set_playback(PlaybackState::Ended);
    debug!("Analyzed {} frames", frames.len());

    let profile = SongProfile::from_frames(&frames)
        .ok_or_else(|| CliError::EmptyAudio(path.display().to_string()))?;

    let engine = VisualEngine::new(args.seed, args.complexity, args.user_parameters());
    let current = engine.current();
    let mut report = Report::new(
        current.color,
        &engine.render_plan(),
        current.report.clone(),
    );
    report.uniforms = Some(engine.uniforms(&AudioFeatureFrame {
        bass: profile.bass,
        mid: profile.mid,
        treble: profile.treble,
        tempo_bpm: profile.tempo_bpm,
        mood: profile.mood,
        intensity: profile.intensity,
    }));
    report.profile = Some(profile);
    Ok(report)
}

fn generate(args: &Args, preset: Option<Preset>) -> Report {
    let mut engine = VisualEngine::new(args.seed, args.complexity, args.user_parameters());
    if let Some(preset) = preset {
        engine.preset(preset);
    }

    let current = engine.current();
    Report::new(
        current.color,
        &engine.render_plan(),
        current.report.clone(),
    )
}

/// Samples per simulated frame, at least one
fn hop_len(sample_rate: u32, fps: u32) -> usize {
    (sample_rate / fps.max(1)).max(1) as usize
}

/// Timestamp of tick `index`, taken from its sample position
fn tick_time_ms(index: usize, hop: usize, sample_rate: u32) -> u64 {
    (index * hop) as u64 * 1000 / u64::from(sample_rate.max(1))
}

/// Read a WAV file as mono f32 samples in [-1, 1]
fn decode_wav(path: &Path) -> Result<(Vec<f32>, u32), CliError> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample.max(1) - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()?
        }
    };

    let channels = usize::from(spec.channels.max(1));
    let mono = interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect();

    Ok((mono, spec.sample_rate))
}
