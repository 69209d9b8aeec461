//! Saturation
//!
//! A sine-of-tanh waveshaper. `tanh` squashes the pre-gained input into
//! (-1, 1), then the outer `sin` folds it: once `drive` pushes the argument
//! past π/2 the peaks turn over and fold back, adding upper harmonics that a
//! plain clipper never produces.
//!
//!   shaped = sin(tanh(x · (gain + 0.02) · 20) · (drive · 1.5 + 1))
//!   output = crossfade(shaped, x, mix)
//!
//! The 0.02 floor keeps a small amount of gain at `gain = 0`, so the shaper
//! never collapses to silence.
//!
//! # Parameter Ranges
//!
//!   gain   0.0 - 1.0    input gain into tanh
//!   drive  0.0 - 1.0    fold depth after tanh
//!   mix    0.0 - 1.0    shaped/clean blend

use crate::dsp::mix::crossfade;

/// Saturate one sample.
#[inline]
pub fn saturate(sample: f32, gain: f32, drive: f32, mix: f32) -> f32 {
    let shaped = ((sample * (gain + 0.02) * 20.0).tanh() * (drive * 1.5 + 1.0)).sin();
    crossfade(shaped, sample, mix)
}

/// Saturate a buffer in place.
pub fn saturate_buffer(buffer: &mut [f32], gain: f32, drive: f32, mix: f32) {
    for sample in buffer.iter_mut() {
        *sample = saturate(*sample, gain, drive, mix);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saturate_dry_mix_is_passthrough() {
        for &x in &[-0.8, -0.1, 0.0, 0.3, 0.9] {
            assert_eq!(saturate(x, 0.7, 0.7, 0.0), x);
        }
    }

    #[test]
    fn test_saturate_is_bounded() {
        for i in -100..=100 {
            let x = i as f32 * 0.1;
            let y = saturate(x, 1.0, 1.0, 1.0);
            assert!(y.abs() <= 1.0 + 1e-6, "{x} -> {y}");
        }
    }

    #[test]
    fn test_saturate_is_odd() {
        let a = saturate(0.4, 0.3, 0.5, 1.0);
        let b = saturate(-0.4, 0.3, 0.5, 1.0);
        assert!((a + b).abs() < 1e-6);
    }

    #[test]
    fn test_saturate_folds_at_high_drive() {
        // tanh(20 * 1.02) ~= 1; sin(2.5) < sin(1.0 * ...) peak of 1
        let folded = saturate(1.0, 1.0, 1.0, 1.0);
        assert!((folded - 2.5f32.sin()).abs() < 1e-4);
        assert!(folded < 1.0);
    }

    #[test]
    fn test_saturate_buffer() {
        let mut buffer = [0.0, 0.5, -0.5];
        saturate_buffer(&mut buffer, 0.5, 0.0, 1.0);
        assert_eq!(buffer[0], 0.0);
        assert!(buffer[1] > 0.0 && buffer[2] < 0.0);
    }
}
