//! Dynamics chain: DC blocker, envelope follower, limiter.
//!
//! The limiter has no lookahead and no gain computer of its own. It divides
//! the signal by `exp(envelope - threshold)` whenever the follower sits above
//! the threshold, giving a soft exponential knee whose timing comes entirely
//! from the follower's attack and release.

/// One-zero one-pole highpass with its pole at 0.995.
#[derive(Debug, Clone, Default)]
pub struct DcBlocker {
    x1: f32,
    y1: f32,
}

impl DcBlocker {
    pub const POLE: f32 = 0.995;

    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.y1 = input - self.x1 + Self::POLE * self.y1;
        self.x1 = input;
        self.y1
    }

    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.y1 = 0.0;
    }
}

/// Peak follower with separate attack and release times.
///
/// Each time is how long the follower takes to cover 99% of a step.
#[derive(Debug, Clone)]
pub struct EnvelopeFollower {
    attack: f32,
    release: f32,
    envelope: f32,
}

impl EnvelopeFollower {
    pub fn new(attack_ms: f32, release_ms: f32, sample_rate: f32) -> Self {
        Self {
            attack: Self::coefficient(attack_ms, sample_rate),
            release: Self::coefficient(release_ms, sample_rate),
            envelope: 0.0,
        }
    }

    fn coefficient(ms: f32, sample_rate: f32) -> f32 {
        let ms = ms.max(crate::MIN_TIME_MS);
        0.01f32.powf(1.0 / (ms * sample_rate * 0.001))
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let level = input.abs();
        let coef = if level > self.envelope {
            self.attack
        } else {
            self.release
        };
        self.envelope = coef * (self.envelope - level) + level;
        self.envelope
    }

    pub fn envelope(&self) -> f32 {
        self.envelope
    }

    pub fn reset(&mut self) {
        self.envelope = 0.0;
    }
}

#[derive(Debug, Clone)]
pub struct Limiter {
    follower: EnvelopeFollower,
    pub threshold: f32,
}

impl Limiter {
    pub fn new(attack_ms: f32, release_ms: f32, threshold: f32, sample_rate: f32) -> Self {
        Self {
            follower: EnvelopeFollower::new(attack_ms, release_ms, sample_rate),
            threshold,
        }
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let envelope = self.follower.process(input);
        if envelope > self.threshold {
            input / (envelope - self.threshold).exp()
        } else {
            input
        }
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    pub fn envelope(&self) -> f32 {
        self.follower.envelope()
    }

    pub fn reset(&mut self) {
        self.follower.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 44_100.0;

    #[test]
    fn dc_blocker_removes_offset() {
        let mut dc = DcBlocker::new();
        let mut out = 0.0;
        for i in 0..20_000 {
            out = dc.process(0.5 + 0.1 * (i as f32 * 0.3).sin());
        }
        assert!(out.abs() < 0.15, "{out}");

        let mean: f32 = (0..4410)
            .map(|i| dc.process(0.5 + 0.1 * ((20_000 + i) as f32 * 0.3).sin()))
            .sum::<f32>()
            / 4410.0;
        assert!(mean.abs() < 0.01, "{mean}");
    }

    #[test]
    fn follower_attack_covers_99_percent() {
        let mut follower = EnvelopeFollower::new(1.0, 100.0, SR);
        let samples = (1.0 * SR * 0.001) as usize;
        for _ in 0..samples {
            follower.process(1.0);
        }
        assert!(follower.envelope() > 0.98, "{}", follower.envelope());
    }

    #[test]
    fn follower_release_is_slower_than_attack() {
        let mut follower = EnvelopeFollower::new(0.5, 50.0, SR);
        for _ in 0..1000 {
            follower.process(1.0);
        }
        for _ in 0..22 {
            follower.process(0.0);
        }
        assert!(follower.envelope() > 0.5);
    }

    #[test]
    fn limiter_is_identity_below_threshold() {
        let mut limiter = Limiter::new(0.5, 3.0, 0.5, SR);
        for i in 0..4096 {
            let x = 0.4 * (i as f32 * 0.05).sin();
            let y = limiter.process(x);
            assert!(limiter.envelope() <= limiter.threshold);
            assert_eq!(y, x);
        }
    }

    #[test]
    fn limiter_reduces_magnitude_above_threshold() {
        let mut limiter = Limiter::new(0.5, 3.0, 0.5, SR);
        let mut limited = 0;
        for i in 0..4096 {
            let x = 2.0 * (i as f32 * 0.05).sin();
            let y = limiter.process(x);
            if limiter.envelope() > limiter.threshold {
                if x != 0.0 {
                    assert!(y.abs() < x.abs(), "x={x} y={y}");
                }
                limited += 1;
            } else {
                assert_eq!(y, x);
            }
        }
        assert!(limited > 0);
    }
}
