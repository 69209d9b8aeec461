#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::chaos::GeneratorKind;
use crate::dsp::Waveform;

/// Engine configuration.
///
/// Everything here is fixed at startup. Live parameters come from the
/// control surface instead.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SynthConfig {
    pub sample_rate: f32,
    pub wavetable_len: usize,
    pub frames_per_buffer: usize,
    pub pool_depth: usize,

    /// Output volume, 0..=255.
    pub volume: u8,
    /// Q16 playback increment per output frame.
    pub step: u32,
    /// Every `telemetry_stride`-th output frame goes to the telemetry ring.
    pub telemetry_stride: usize,

    /// One-pole time constant applied to smoothed control channels.
    pub smoothing_ms: f32,

    pub limiter_attack_ms: f32,
    pub limiter_release_ms: f32,
    pub limiter_threshold: f32,

    pub waveform: Waveform,
    pub amplitude: f32,
    /// Scale from the pipeline's float output to table samples.
    pub table_gain: f32,

    /// Optional chaotic frequency modulation on top of the feedback path.
    pub modulator: Option<GeneratorKind>,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            sample_rate: crate::SAMPLE_RATE,
            wavetable_len: crate::WAVETABLE_LEN,
            frames_per_buffer: crate::FRAMES_PER_BUFFER,
            pool_depth: crate::POOL_DEPTH,
            volume: 0x5F,
            step: 0x1A000,
            telemetry_stride: 15,
            smoothing_ms: 2.0,
            limiter_attack_ms: 0.5,
            limiter_release_ms: 3.0,
            limiter_threshold: 0.5,
            waveform: Waveform::Square,
            amplitude: 0.5,
            table_gain: 16384.0,
            modulator: None,
        }
    }
}

impl SynthConfig {
    /// Q16 step that plays the whole table `hz` times per second.
    pub fn step_for_frequency(&self, hz: f32) -> u32 {
        let step = hz as f64 * self.wavetable_len as f64 * (1u64 << crate::FRACTIONAL_BITS) as f64
            / self.sample_rate as f64;
        step.round().clamp(0.0, u32::MAX as f64) as u32
    }

    /// Pitch in Hz produced by the configured step.
    pub fn frequency(&self) -> f32 {
        (self.step as f64 * self.sample_rate as f64
            / (self.wavetable_len as f64 * (1u64 << crate::FRACTIONAL_BITS) as f64)) as f32
    }

    /// Q16 length of the wavetable, the wrap point of the playback position.
    pub fn position_max(&self) -> u64 {
        (self.wavetable_len as u64) << crate::FRACTIONAL_BITS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_playback_constants() {
        let config = SynthConfig::default();
        assert_eq!(config.volume, 0x5F);
        assert_eq!(config.step, 0x1A000);
        assert_eq!(config.position_max(), 0x10000 * 2048);
        assert_eq!(config.telemetry_stride, 15);
        assert_eq!(config.pool_depth, 3);
    }

    #[test]
    fn step_for_frequency_round_trips() {
        let config = SynthConfig::default();
        let step = config.step_for_frequency(config.frequency());
        assert!((step as i64 - config.step as i64).abs() <= 1);
    }

    #[test]
    fn one_table_per_second_is_len_over_rate() {
        let config = SynthConfig::default();
        let expected = (2048.0 * 65536.0 / 44_100.0f64).round() as u32;
        assert_eq!(config.step_for_frequency(1.0), expected);
    }
}
