//! Command-line argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use vibeweave::params::{Complexity, UserParameters};
use vibeweave::pattern::Preset;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "vibeweave")]
#[command(about = "Audio-reactive procedural pattern generator", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Random seed (default 12345)
    #[arg(long, global = true)]
    pub seed: Option<u32>,

    /// Complexity tier: simple, medium, complex
    #[arg(long, global = true, default_value = "simple")]
    pub complexity: Complexity,

    /// Pixelation slider (0-100)
    #[arg(long, global = true, default_value_t = 0,
          value_parser = clap::value_parser!(u8).range(0..=100))]
    pub pixelate: u8,

    /// Brightness slider (0-100)
    #[arg(long, global = true, default_value_t = 50,
          value_parser = clap::value_parser!(u8).range(0..=100))]
    pub brightness: u8,

    /// Inversion slider (0-100)
    #[arg(long, global = true, default_value_t = 0,
          value_parser = clap::value_parser!(u8).range(0..=100))]
    pub invert: u8,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze a WAV file, then generate a pattern
    Analyze {
        /// Input WAV file
        path: PathBuf,

        /// Simulated frame rate for analysis ticks
        #[arg(long, value_name = "FPS", default_value_t = 60,
              value_parser = clap::value_parser!(u32).range(1..))]
        fps: u32,
    },

    /// Generate a pattern without audio
    Generate {
        /// Use a named preset instead of a random pattern
        #[arg(long, value_name = "PRESET")]
        preset: Option<Preset>,
    },
}

impl Args {
    pub fn user_parameters(&self) -> UserParameters {
        UserParameters::new(self.pixelate, self.brightness, self.invert)
    }
}
