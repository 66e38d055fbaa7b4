//! Vibeweave library - Audio-reactive procedural visuals
//!
//! Spectrum analysis turns audio into per-frame features; a seeded
//! generator composes typed pattern expressions within seizure-safety
//! limits and hands them to a rendering surface.

pub mod audio;
pub mod engine;
pub mod error;
pub mod params;
pub mod pattern;
pub mod safety;
