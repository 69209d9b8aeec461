use std::f32::consts::{PI, TAU};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Phase-Accumulator Oscillators
=============================

Every waveform here is a total function of the oscillator state: read the
current phase, produce a sample, then advance

    phase += delta + fm

and wrap the phase back into the waveform's canonical interval.

  form        interval           output
  ----------  -----------------  ------------------------------------------
  Sine        [0, 2π)            sin(phase)
  Ramp        [-π, π)            phase / π
  Sawtooth    [-π, π)            -phase / π
  Square      [-π, π) and        ramp(phase)·warp + ramp(-pulse)·(1 - warp)
              [pwm-π, pwm+π)
  Contour     [-π, π)            difference of two smoothed cosine taps
  Triangle    [0, 2π]            square-root shaped rise / fall segments

Square runs a second phase track (`pulse_phase`) whose wrap bound is shifted
by `pwm`. The two ramps drift apart by the shift, so blending them with
`warp` moves the edge of the resulting pulse: duty cycle via asymmetric wrap.
Square always swings the full ±1 and ignores `amplitude` and `am`.

Contour is the recursive "Tomisawa" shape: each tap is a cosine whose phase
is pushed by its own one-pole-averaged output. The feedback amount falls as
frequency rises and never goes negative.

A single `advance` wraps at most once per call for ordinary increments.
Larger or negative increments fall back to a euclidean remainder so the
interval always holds.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Waveform {
    Sine,
    Ramp,
    Sawtooth,
    #[default]
    Square,
    Contour,
    Triangle,
}

impl Waveform {
    pub const ALL: [Waveform; 6] = [
        Waveform::Sine,
        Waveform::Ramp,
        Waveform::Sawtooth,
        Waveform::Square,
        Waveform::Contour,
        Waveform::Triangle,
    ];

    /// Lower bound of the primary phase interval.
    pub fn phase_floor(self) -> f32 {
        match self {
            Waveform::Sine | Waveform::Triangle => 0.0,
            Waveform::Ramp | Waveform::Sawtooth | Waveform::Square | Waveform::Contour => -PI,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Ramp => "ramp",
            Waveform::Sawtooth => "sawtooth",
            Waveform::Square => "square",
            Waveform::Contour => "contour",
            Waveform::Triangle => "triangle",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Oscillator {
    pub waveform: Waveform,

    phase: f32,
    pulse_phase: f32, // Square's secondary track
    tap_a: f32,       // Contour feedback memories
    tap_b: f32,

    pub delta: f32,
    pub frequency: f32,
    pub amplitude: f32,

    pub fm: f32,
    pub am: f32,
    pub pwm: f32,
    pub warp: f32,
}

impl Oscillator {
    pub fn new(waveform: Waveform) -> Self {
        Self {
            waveform,
            phase: 0.0,
            pulse_phase: PI,
            tap_a: 0.0,
            tap_b: 0.0,
            delta: 0.0,
            frequency: 0.0,
            amplitude: 1.0,
            fm: 0.0,
            am: 0.0,
            pwm: 0.0,
            warp: 0.0,
        }
    }

    pub fn sine() -> Self {
        Self::new(Waveform::Sine)
    }

    pub fn square() -> Self {
        Self::new(Waveform::Square)
    }

    /// Set the phase increment from a frequency in Hz.
    pub fn set_frequency(&mut self, hz: f32, sample_rate: f32) {
        self.frequency = hz;
        self.delta = hz * TAU / sample_rate;
    }

    /// Restart the cycle: primary phase at zero, pulse track at π.
    ///
    /// Feedback memories are kept so a restarted contour wave stays smooth.
    pub fn restart(&mut self) {
        self.phase = 0.0;
        self.pulse_phase = PI;
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn pulse_phase(&self) -> f32 {
        self.pulse_phase
    }

    /// Produce one sample and advance the phase.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        let amplitude = self.amplitude * (1.0 + self.am);
        let step = self.delta + self.fm;

        match self.waveform {
            Waveform::Sine => {
                let out = self.phase.sin() * amplitude;
                self.phase = wrap(self.phase + step, 0.0);
                out
            }
            Waveform::Ramp => {
                let out = self.phase / PI * amplitude;
                self.phase = wrap(self.phase + step, -PI);
                out
            }
            Waveform::Sawtooth => {
                let out = -self.phase / PI * amplitude;
                self.phase = wrap(self.phase + step, -PI);
                out
            }
            Waveform::Square => {
                let saw = self.phase / PI;
                let ramp = -self.pulse_phase / PI;
                // Full scale regardless of amplitude
                let out = saw * self.warp + ramp * (1.0 - self.warp);

                self.phase = wrap(self.phase + step, -PI);
                self.pulse_phase = wrap(self.pulse_phase + step, self.pwm - PI);
                out
            }
            Waveform::Contour => {
                let feedback = (1.0 - 0.0001 * self.frequency).max(0.0);

                self.phase = wrap(self.phase + step, -PI);

                let a = (self.phase + feedback * self.tap_a).cos();
                self.tap_a = 0.5 * (a + self.tap_a);

                let offset = (self.pwm * 1.9 + 0.05) * PI;
                let b = (self.phase + feedback * self.tap_b + offset).cos();
                self.tap_b = 0.5 * (b + self.tap_b);

                (a - b) * amplitude
            }
            Waveform::Triangle => {
                let rise = self.pwm * TAU;
                let fall = TAU - rise;
                let rise_slope = if rise != 0.0 { 2.0 * amplitude / rise } else { 0.0 };
                let fall_slope = if fall != 0.0 { 2.0 * amplitude / fall } else { 0.0 };

                let shaped = self.phase.sqrt();
                let out = if self.phase < rise {
                    -amplitude + shaped * rise_slope
                } else {
                    amplitude - (shaped - rise) * fall_slope
                };

                let next = self.phase + step;
                self.phase = if (0.0..=TAU).contains(&next) {
                    next
                } else {
                    let wrapped = next.rem_euclid(TAU);
                    if wrapped.is_finite() {
                        wrapped
                    } else {
                        0.0
                    }
                };
                out
            }
        }
    }

    /// Fill a buffer with consecutive samples.
    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.advance();
        }
    }
}

/// Wrap `phase` into `[lower, lower + 2π)`. Non-finite input lands on `lower`.
#[inline]
fn wrap(phase: f32, lower: f32) -> f32 {
    let upper = lower + TAU;
    if phase >= lower && phase < upper {
        return phase;
    }
    let once = if phase >= upper { phase - TAU } else { phase + TAU };
    if once >= lower && once < upper {
        return once;
    }
    let wrapped = lower + (phase - lower).rem_euclid(TAU);
    if wrapped >= lower && wrapped < upper {
        wrapped
    } else {
        lower
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zero_crossings(samples: &[f32]) -> usize {
        let mut last_sign = 0.0f32;
        let mut crossings = 0;
        for &s in samples {
            if s == 0.0 {
                continue;
            }
            let sign = s.signum();
            if last_sign != 0.0 && sign != last_sign {
                crossings += 1;
            }
            last_sign = sign;
        }
        crossings
    }

    #[test]
    fn phase_stays_in_canonical_interval() {
        for waveform in Waveform::ALL {
            let mut osc = Oscillator::new(waveform);
            osc.delta = TAU / 2048.0 * 7.3;
            osc.pwm = 0.4;
            osc.warp = 0.3;
            for _ in 0..20_000 {
                osc.advance();
                let phase = osc.phase();
                let lower = waveform.phase_floor();
                if waveform == Waveform::Triangle {
                    assert!((0.0..=TAU).contains(&phase), "{phase}");
                } else {
                    assert!(phase >= lower && phase < lower + TAU, "{:?}: {phase}", waveform);
                }
            }
        }
    }

    #[test]
    fn square_pulse_track_respects_pwm_shift() {
        let mut osc = Oscillator::square();
        osc.delta = 0.01;
        osc.pwm = 0.8;
        for _ in 0..10_000 {
            osc.advance();
            let p = osc.pulse_phase();
            let lower = osc.pwm - PI;
            assert!(p >= lower && p < lower + TAU, "pulse phase {p}");
        }
    }

    #[test]
    fn negative_modulation_still_wraps() {
        let mut osc = Oscillator::new(Waveform::Ramp);
        osc.delta = 0.01;
        osc.fm = -0.5;
        for _ in 0..1000 {
            osc.advance();
            assert!((-PI..PI).contains(&osc.phase()));
        }
    }

    #[test]
    fn square_cycle_crosses_zero_twice() {
        let mut osc = Oscillator::square();
        osc.delta = TAU / 2048.0;
        osc.amplitude = 1.0;
        osc.pwm = 0.0;

        let mut buffer = vec![0.0f32; 2048];
        osc.render(&mut buffer);

        assert_eq!(zero_crossings(&buffer), 2);
    }

    #[test]
    fn sine_matches_closed_form() {
        let mut osc = Oscillator::sine();
        osc.set_frequency(441.0, 44_100.0);
        let mut buffer = vec![0.0f32; 64];
        osc.render(&mut buffer);

        let expected = (TAU * 441.0 * 12.0 / 44_100.0).sin();
        assert!((buffer[12] - expected).abs() < 1e-4);
    }

    #[test]
    fn ramp_and_sawtooth_are_mirrors() {
        let mut ramp = Oscillator::new(Waveform::Ramp);
        let mut saw = Oscillator::new(Waveform::Sawtooth);
        ramp.delta = 0.05;
        saw.delta = 0.05;
        for _ in 0..500 {
            let r = ramp.advance();
            let s = saw.advance();
            assert!((r + s).abs() < 1e-6);
            assert!(r.abs() <= 1.0 + 1e-6);
        }
    }

    #[test]
    fn contour_feedback_clamps_at_high_frequency() {
        let mut osc = Oscillator::new(Waveform::Contour);
        osc.set_frequency(20_000.0, 44_100.0);
        for _ in 0..4096 {
            let out = osc.advance();
            assert!(out.is_finite());
            assert!(out.abs() <= 2.0 + 1e-6);
        }
    }

    #[test]
    fn triangle_stays_finite_at_extreme_pulse_width() {
        for pwm in [0.0, 0.5, 1.0] {
            let mut osc = Oscillator::new(Waveform::Triangle);
            osc.delta = TAU / 512.0;
            osc.pwm = pwm;
            for _ in 0..2048 {
                assert!(osc.advance().is_finite(), "pwm {pwm}");
            }
        }
    }

    #[test]
    fn amplitude_modulation_scales_output() {
        let mut plain = Oscillator::sine();
        let mut modulated = Oscillator::sine();
        plain.delta = 0.1;
        modulated.delta = 0.1;
        modulated.am = 1.0;
        for _ in 0..100 {
            let p = plain.advance();
            let m = modulated.advance();
            assert!((m - 2.0 * p).abs() < 1e-6);
        }
    }

    #[test]
    fn square_ignores_amplitude() {
        let mut osc = Oscillator::square();
        osc.delta = TAU / 2048.0;
        osc.amplitude = 0.5;
        let mut buffer = vec![0.0; 2048];
        osc.render(&mut buffer);
        let peak = buffer.iter().fold(0.0f32, |m, s| m.max(s.abs()));
        assert!(peak > 0.99 && peak <= 1.0, "{peak}");
    }
}
