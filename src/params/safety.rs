//! Seizure-safety bounds for generated patterns.

/// Lowest oscillator frequency a pattern may use (Hz)
pub const MIN_FREQUENCY_HZ: f64 = 0.1;

/// Highest oscillator frequency a pattern may use (Hz)
pub const MAX_FREQUENCY_HZ: f64 = 8.0;

/// Slowest rotation/animation speed
pub const MIN_SPEED: f64 = 0.01;

/// Fastest rotation/animation speed
pub const MAX_SPEED: f64 = 0.3;

/// Oscillator sync (drift) bounds
pub const SYNC_RANGE: (f64, f64) = (-0.1, 0.1);

/// Oscillator color offset bounds
pub const OFFSET_RANGE: (f64, f64) = (0.0, 2.0);

/// Flash and motion-rate limits applied while generating and checked afterwards
#[derive(Debug, Clone, PartialEq)]
pub struct SafetyLimits {
    /// Oscillator frequency bounds (Hz)
    pub frequency_hz: (f64, f64),

    /// Rotation and scroll speed bounds (turns per second, renderer units)
    pub speed: (f64, f64),

    /// Oscillator sync bounds
    pub sync: (f64, f64),

    /// Oscillator offset bounds
    pub offset: (f64, f64),
}

impl Default for SafetyLimits {
    fn default() -> Self {
        Self {
            frequency_hz: (MIN_FREQUENCY_HZ, MAX_FREQUENCY_HZ),
            speed: (MIN_SPEED, MAX_SPEED),
            sync: SYNC_RANGE,
            offset: OFFSET_RANGE,
        }
    }
}

impl SafetyLimits {
    pub fn clamp_frequency(&self, hz: f64) -> f64 {
        hz.clamp(self.frequency_hz.0, self.frequency_hz.1)
    }

    pub fn clamp_speed(&self, speed: f64) -> f64 {
        speed.clamp(self.speed.0, self.speed.1)
    }

    pub fn clamp_sync(&self, sync: f64) -> f64 {
        sync.clamp(self.sync.0, self.sync.1)
    }

    pub fn clamp_offset(&self, offset: f64) -> f64 {
        offset.clamp(self.offset.0, self.offset.1)
    }
}
