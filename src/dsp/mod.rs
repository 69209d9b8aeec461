//! Low-level DSP primitives used by the wavetable production pipeline.
//!
//! These components are allocation-free after construction and own all of
//! their state, so two signal chains never share hidden memory. They stay
//! focused on the signal-processing math; parameter mapping and clamping
//! live in the control surface.

/// First-order all-pass section.
pub mod allpass;
/// Forward-Euler chaotic generators used as modulation sources.
pub mod chaos;
/// Fixed-capacity feedback delay line.
pub mod delay;
/// Soft saturation.
pub mod distortion;
/// DC blocker, envelope follower and limiter.
pub mod dynamics;
/// Looping piecewise-linear envelope.
pub mod envelope;
/// Trapezoidally integrated state-variable filters.
pub mod filter;
/// Sample-and-hold.
pub mod hold;
/// Linear crossfade.
pub mod mix;
/// Phase-accumulator oscillator bank.
pub mod oscillator;
/// Parameter smoothing filters.
pub mod smooth;

pub use mix::crossfade;
pub use oscillator::{Oscillator, Waveform};

/// Convert a sample count into milliseconds.
#[inline]
pub fn samples_to_ms(samples: f32, sample_rate: f32) -> f32 {
    samples * 1000.0 / sample_rate
}
