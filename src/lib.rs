pub mod config;
pub mod control; // Control surface: channels, smoothing, parameter mapping
pub mod dsp;
pub mod playback; // Fixed-point playback and buffer pool delivery
pub mod telemetry;
pub mod wavetable; // Whole-buffer exchange and the production pipeline

pub use config::SynthConfig;

pub const SAMPLE_RATE: f32 = 44_100.0;
pub const WAVETABLE_LEN: usize = 2048;
pub const FRAMES_PER_BUFFER: usize = 1156;
pub const POOL_DEPTH: usize = 3;
pub const MAX_DELAY_SAMPLES: usize = 32_768;
pub const TELEMETRY_LEN: usize = 128;

/// Fractional bits of the playback position accumulator.
pub const FRACTIONAL_BITS: u32 = 16;

pub(crate) const MIN_TIME_MS: f32 = 1000.0 / 48_000.0;
