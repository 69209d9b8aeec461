/*
Looping Segment Envelope
========================

A free-running envelope made of straight segments. Each stage has a length
in samples and a target level; the output ramps linearly from the previous
stage's level to this stage's level over that length, then moves on. After
the last stage it wraps to the first, so the shape repeats forever:

  level
    a0 ┐    ╱╲        ╱╲
       │   ╱  ╲      ╱  ╲
    a1 └──╱────╲────╱────╲──→ time
           t0  t1   t0  t1

Slopes are derived once, cyclically: stage 0 ramps from the last stage's
level, so the loop closes without a jump. The output starts at the last
stage's level.

There is no gate and no retrigger. Use it as a slow modulation source.
*/

pub const STAGES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stage {
    pub samples: u32,
    pub level: f32,
}

#[derive(Debug, Clone)]
pub struct LoopEnvelope {
    stages: [Stage; STAGES],
    slopes: [f32; STAGES],
    stage: usize,
    elapsed: u32,
    level: f32,
}

impl LoopEnvelope {
    /// Stage lengths below one sample are raised to one.
    pub fn new(stages: [Stage; STAGES]) -> Self {
        let stages = stages.map(|stage| Stage {
            samples: stage.samples.max(1),
            level: stage.level,
        });

        let mut slopes = [0.0; STAGES];
        let mut previous = stages[STAGES - 1].level;
        for (slope, stage) in slopes.iter_mut().zip(stages.iter()) {
            *slope = (stage.level - previous) / stage.samples as f32;
            previous = stage.level;
        }

        Self {
            stages,
            slopes,
            stage: 0,
            elapsed: 0,
            level: stages[STAGES - 1].level,
        }
    }

    /// Triangle between `low` and `high` with rise and fall given in ms.
    pub fn triangle(low: f32, high: f32, rise_ms: f32, fall_ms: f32, sample_rate: f32) -> Self {
        let samples = |ms: f32| (ms * 0.001 * sample_rate).round().max(1.0) as u32;
        Self::new([
            Stage {
                samples: samples(rise_ms),
                level: high,
            },
            Stage {
                samples: samples(fall_ms),
                level: low,
            },
        ])
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        if self.elapsed >= self.stages[self.stage].samples {
            self.elapsed = 0;
            self.stage = (self.stage + 1) % STAGES;
            // Land exactly on the finished stage's level to stop float drift
            self.level = self.stages[(self.stage + STAGES - 1) % STAGES].level;
        }
        self.level += self.slopes[self.stage];
        self.elapsed += 1;
        self.level
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample();
        }
    }

    pub fn stage(&self) -> usize {
        self.stage
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn reset(&mut self) {
        self.stage = 0;
        self.elapsed = 0;
        self.level = self.stages[STAGES - 1].level;
    }
}
