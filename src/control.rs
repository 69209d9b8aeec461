//! Control surface: eight raw channels in, one parameter set out.
//!
//! Raw readings are 12-bit (0..=4095). Three channels pass through one-pole
//! smoothers before mapping; the rest are mapped directly. Every derived
//! value is clamped to the range the DSP can take without going unstable,
//! so the pipeline itself never has to check.

use std::f32::consts::TAU;

use crate::dsp::smooth::ParamSmoother;
use crate::SynthConfig;

pub const CHANNELS: usize = 8;
pub const RAW_MAX: u16 = 4095;

const RAW_SCALE: f32 = 4096.0;
const MIN_CUTOFF_HZ: f32 = 20.0;
const MAX_CUTOFF_RATIO: f32 = 0.49;

/// Multiplexer address of each control input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlChannel {
    /// Filter cutoff, raw value in Hz. Smoothed.
    Cutoff = 0,
    /// Depth of the sample-and-hold feedback FM (0 or 1), and chaos depth.
    HoldDepth = 1,
    /// Sample-and-hold period in samples.
    HoldPeriod = 2,
    /// Filter damping. Smoothed.
    Resonance = 3,
    /// Delay time, and chaos step size.
    DelayTime = 4,
    /// Pulse width. Smoothed.
    PulseWidth = 5,
    /// Delay amount and feedback together.
    DelayMix = 6,
    /// Blend between the square's two ramps.
    Warp = 7,
}

impl ControlChannel {
    pub const ALL: [ControlChannel; CHANNELS] = [
        ControlChannel::Cutoff,
        ControlChannel::HoldDepth,
        ControlChannel::HoldPeriod,
        ControlChannel::Resonance,
        ControlChannel::DelayTime,
        ControlChannel::PulseWidth,
        ControlChannel::DelayMix,
        ControlChannel::Warp,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            ControlChannel::Cutoff => "cutoff",
            ControlChannel::HoldDepth => "s&h depth",
            ControlChannel::HoldPeriod => "s&h period",
            ControlChannel::Resonance => "resonance",
            ControlChannel::DelayTime => "delay time",
            ControlChannel::PulseWidth => "pulse width",
            ControlChannel::DelayMix => "delay mix",
            ControlChannel::Warp => "warp",
        }
    }
}

/// Anything that can produce a raw 12-bit reading for a channel.
///
/// On hardware this selects the multiplexer address, waits for it to settle
/// and samples the ADC. Readings above `RAW_MAX` are clamped by the surface.
pub trait ControlSource {
    fn read(&mut self, channel: ControlChannel) -> u16;
}

/// A source that always returns the same readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedControls(pub [u16; CHANNELS]);

impl FixedControls {
    /// All knobs at twelve o'clock.
    pub fn centered() -> Self {
        Self([2048; CHANNELS])
    }

    pub fn with(mut self, channel: ControlChannel, raw: u16) -> Self {
        self.0[channel.index()] = raw;
        self
    }
}

impl ControlSource for FixedControls {
    fn read(&mut self, channel: ControlChannel) -> u16 {
        self.0[channel.index()]
    }
}

/// Parameters for one wavetable recompute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Params {
    pub cutoff: f32,
    pub q: f32,
    pub pulse_width: f32,
    pub warp: f32,
    pub hold_depth: f32,
    pub hold_period: i32,
    pub delay_time: f32,
    pub delay_amount: f32,
    pub delay_feedback: f32,
    pub chaos_depth: f32,
    pub chaos_step: f32,
}

impl Params {
    /// Pulse width as the square oscillator's phase shift.
    pub fn pwm(&self) -> f32 {
        (self.pulse_width - 0.5) * TAU
    }
}

/// Smoothing and mapping from raw channels to `Params`.
pub struct ControlSurface {
    cutoff: ParamSmoother,
    resonance: ParamSmoother,
    pulse_width: ParamSmoother,
    sample_rate: f32,
}

impl ControlSurface {
    /// Smoothers advance once per `read`, with the time constant counted at
    /// the audio sample rate.
    pub fn new(config: &SynthConfig) -> Self {
        Self {
            cutoff: ParamSmoother::new(config.smoothing_ms, config.sample_rate),
            resonance: ParamSmoother::new(config.smoothing_ms, config.sample_rate),
            pulse_width: ParamSmoother::new(config.smoothing_ms, config.sample_rate),
            sample_rate: config.sample_rate,
        }
    }

    /// Start the smoothers at `source`'s current readings instead of zero.
    pub fn prime<S: ControlSource + ?Sized>(&mut self, source: &mut S) {
        let raw = read_all(source);
        self.cutoff.reset(raw[ControlChannel::Cutoff.index()]);
        self.resonance.reset(raw[ControlChannel::Resonance.index()]);
        self.pulse_width.reset(raw[ControlChannel::PulseWidth.index()] / RAW_SCALE);
    }

    pub fn read<S: ControlSource + ?Sized>(&mut self, source: &mut S) -> Params {
        let raw = read_all(source);
        let at = |channel: ControlChannel| raw[channel.index()];

        let cutoff = self.cutoff.process(at(ControlChannel::Cutoff));
        let resonance = self.resonance.process(at(ControlChannel::Resonance));
        let pulse_width = self.pulse_width.process(at(ControlChannel::PulseWidth) / RAW_SCALE);

        let delay_mix = (at(ControlChannel::DelayMix) / RAW_SCALE * 0.9).clamp(0.0, 0.9);
        let delay_time = at(ControlChannel::DelayTime);
        let depth = at(ControlChannel::HoldDepth);

        Params {
            cutoff: cutoff.clamp(MIN_CUTOFF_HZ, MAX_CUTOFF_RATIO * self.sample_rate),
            q: (1.1 - resonance / RAW_SCALE * 1.05).clamp(0.05, 1.1),
            pulse_width: pulse_width.clamp(0.0, 1.0),
            warp: (at(ControlChannel::Warp) / RAW_SCALE * 0.9).clamp(0.0, 0.9),
            hold_depth: (depth / 2048.0).trunc(),
            hold_period: at(ControlChannel::HoldPeriod) as i32,
            delay_time: (delay_time / RAW_SCALE).clamp(0.0, 1.0),
            delay_amount: delay_mix,
            delay_feedback: delay_mix,
            chaos_depth: depth / RAW_SCALE,
            chaos_step: delay_time / 100_000.0 + 0.00001,
        }
    }
}

fn read_all<S: ControlSource + ?Sized>(source: &mut S) -> [f32; CHANNELS] {
    ControlChannel::ALL.map(|channel| source.read(channel).min(RAW_MAX) as f32)
}
