use std::f32::consts::{PI, TAU};

/// One-pole lowpass for control values.
///
/// `time_ms` is the time constant: the pole sits at
/// `exp(-2π / (time_ms · 0.001 · sample_rate))`. The output starts at zero,
/// so the first few readings after construction ramp up from silence.
#[derive(Debug, Clone)]
pub struct ParamSmoother {
    a: f32,
    b: f32,
    value: f32,
}

impl ParamSmoother {
    pub fn new(time_ms: f32, sample_rate: f32) -> Self {
        let mut smoother = Self {
            a: 0.0,
            b: 1.0,
            value: 0.0,
        };
        smoother.set_time(time_ms, sample_rate);
        smoother
    }

    /// Change the time constant; the current value is kept.
    pub fn set_time(&mut self, time_ms: f32, sample_rate: f32) {
        let time_ms = time_ms.max(crate::MIN_TIME_MS);
        self.a = (-TAU / (time_ms * 0.001 * sample_rate)).exp();
        self.b = 1.0 - self.a;
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.value = input * self.b + self.value * self.a;
        self.value
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn reset(&mut self, value: f32) {
        self.value = value;
    }
}

/// Self-modulating two-pole smoother.
///
/// Two cascaded one-poles whose shared gain rises with the distance between
/// them: slow input changes are smoothed hard at the 2 Hz base cutoff, fast
/// jumps open the filter up so the output catches up without lag.
#[derive(Debug, Clone)]
pub struct DynamicSmoother {
    base: f32,
    sensitivity: f32,
    low1: f32,
    low2: f32,
}

impl DynamicSmoother {
    pub const BASE_FREQUENCY: f32 = 2.0;
    pub const SENSITIVITY: f32 = 2.0;

    pub fn new(sample_rate: f32) -> Self {
        Self::with_params(Self::BASE_FREQUENCY, Self::SENSITIVITY, sample_rate)
    }

    pub fn with_params(frequency: f32, sensitivity: f32, sample_rate: f32) -> Self {
        let w = frequency / sample_rate;
        let u = (PI * w).tan();
        Self {
            base: 2.0 * u / (1.0 + u),
            sensitivity,
            low1: 0.0,
            low2: 0.0,
        }
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let low1 = self.low1;
        let low2 = self.low2;
        let g = (self.base + self.sensitivity * (low1 - low2).abs()).min(1.0);
        self.low1 = low1 + g * (input - low1);
        self.low2 = low2 + g * (self.low1 - low2);
        self.low2
    }

    pub fn reset(&mut self) {
        self.low1 = 0.0;
        self.low2 = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 44_100.0;

    #[test]
    fn smoother_converges_to_constant() {
        let mut smoother = ParamSmoother::new(2.0, SR);
        let mut out = 0.0;
        for _ in 0..2_000 {
            out = smoother.process(1000.0);
        }
        assert!((out - 1000.0).abs() < 1e-2, "{out}");
    }

    #[test]
    fn longer_time_is_slower() {
        let mut fast = ParamSmoother::new(2.0, SR);
        let mut slow = ParamSmoother::new(20.0, SR);
        for _ in 0..20 {
            fast.process(1.0);
            slow.process(1.0);
        }
        assert!(fast.value() > slow.value());
        assert!(slow.value() > 0.0);
    }

    #[test]
    fn zero_time_passes_through_almost_immediately() {
        let mut smoother = ParamSmoother::new(0.0, SR);
        assert!(smoother.process(1.0) > 0.99);
    }

    #[test]
    fn dynamic_smoother_tracks_steps_faster_than_base_cutoff() {
        let mut dynamic = DynamicSmoother::new(SR);
        let mut plain = ParamSmoother::new(1000.0 / DynamicSmoother::BASE_FREQUENCY, SR);
        for _ in 0..200 {
            dynamic.process(1.0);
            plain.process(1.0);
        }
        let out = dynamic.process(1.0);
        assert!(out > plain.value(), "{out} vs {}", plain.value());
        assert!(out <= 1.0);
    }

    #[test]
    fn dynamic_smoother_settles() {
        let mut dynamic = DynamicSmoother::new(SR);
        let mut out = 0.0;
        for _ in 0..(SR as usize) {
            out = dynamic.process(0.25);
        }
        assert!((out - 0.25).abs() < 1e-3);
    }
}
