use crate::dsp::mix::crossfade;
use crate::MAX_DELAY_SAMPLES;

/// Circular feedback delay with a wet/dry blend.
///
/// `time` is a fraction of the full capacity in `[0, 1]`: the read tap sits
/// `round(time * MAX_DELAY_SAMPLES)` samples behind the write head. The tap
/// is the wet signal, and it is written back into the line under `feedback`:
///
/// ```text
///     tap     = line[w - offset]
///     line[w] = in + tap * feedback
///     out     = crossfade(tap, in, amount)
/// ```
///
/// A zero offset reads the slot about to be overwritten, i.e. the sample
/// written one full capacity ago.
///
/// The hardware delay blended the written value `in + tap * feedback`
/// instead of the bare tap, which comes out as `in + tap * feedback * amount`.
/// Blending the bare tap keeps `feedback = 0` an exact
/// `crossfade(in[t - offset], in[t], amount)`.
pub struct DelayLine {
    buffer: Vec<f32>,
    write_pos: usize,

    pub time: f32,
    pub feedback: f32,
    pub amount: f32,
}

impl DelayLine {
    pub fn new() -> Self {
        Self {
            buffer: vec![0.0; MAX_DELAY_SAMPLES],
            write_pos: 0,
            time: 0.0,
            feedback: 0.5,
            amount: 0.5,
        }
    }

    /// Distance between the write head and the read tap, in samples.
    pub fn offset(&self) -> usize {
        let offset = (self.time.clamp(0.0, 1.0) * MAX_DELAY_SAMPLES as f32).round() as usize;
        offset.min(MAX_DELAY_SAMPLES)
    }

    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        let offset = self.offset() % MAX_DELAY_SAMPLES;
        let read_pos = (self.write_pos + MAX_DELAY_SAMPLES - offset) % MAX_DELAY_SAMPLES;

        let tap = self.buffer[read_pos];
        self.buffer[self.write_pos] = sample + tap * self.feedback;
        self.write_pos = (self.write_pos + 1) % MAX_DELAY_SAMPLES;

        crossfade(tap, sample, self.amount)
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}

impl Default for DelayLine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feedback_free_line_returns_input_after_offset() {
        let mut delay = DelayLine::new();
        delay.feedback = 0.0;
        delay.amount = 0.7;
        delay.time = 0.01;
        let offset = delay.offset();
        assert_eq!(offset, (0.01 * MAX_DELAY_SAMPLES as f32).round() as usize);

        let input: Vec<f32> = (0..offset * 3).map(|i| (i as f32 * 0.37).sin()).collect();
        for (t, &x) in input.iter().enumerate() {
            let out = delay.process(x);
            let delayed = if t >= offset { input[t - offset] } else { 0.0 };
            assert_eq!(out, crossfade(delayed, x, delay.amount), "t={t}");
        }
    }

    #[test]
    fn dry_amount_passes_input() {
        let mut delay = DelayLine::new();
        delay.amount = 0.0;
        delay.feedback = 0.9;
        delay.time = 0.001;
        for i in 0..1000 {
            let x = (i as f32 * 0.1).sin();
            assert!((delay.process(x) - x).abs() < 1e-6);
        }
    }

    #[test]
    fn impulse_echoes_decay_by_feedback() {
        let mut delay = DelayLine::new();
        delay.feedback = 0.5;
        delay.amount = 1.0;
        delay.time = 0.002;
        let offset = delay.offset();

        let mut out = vec![0.0f32; offset * 3 + 1];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = delay.process(if i == 0 { 1.0 } else { 0.0 });
        }
        assert_eq!(out[0], 0.0);
        assert!((out[offset] - 1.0).abs() < 1e-6);
        assert!((out[2 * offset] - 0.5).abs() < 1e-6);
        assert!((out[3 * offset] - 0.25).abs() < 1e-6);
        assert_eq!(out[offset + 1], 0.0);
    }

    #[test]
    fn wet_side_is_the_bare_tap() {
        let mut delay = DelayLine::new();
        delay.time = 4.0 / MAX_DELAY_SAMPLES as f32;
        delay.feedback = 0.5;
        delay.amount = 0.5;

        let out: Vec<f32> = (0..5)
            .map(|i| delay.process(if i == 0 { 1.0 } else { 0.0 }))
            .collect();
        assert_eq!(out[0], 0.5);
        // Echo at the tap, not the fed-back write
        assert_eq!(out[4], 0.5);
    }

    #[test]
    fn full_time_reads_one_capacity_back() {
        let mut delay = DelayLine::new();
        delay.time = 1.0;
        assert_eq!(delay.offset(), MAX_DELAY_SAMPLES);
        assert_eq!(delay.process(1.0), crossfade(0.0, 1.0, delay.amount));
    }

    #[test]
    fn reset_clears_history() {
        let mut delay = DelayLine::new();
        delay.time = 0.001;
        delay.amount = 1.0;
        for _ in 0..200 {
            delay.process(1.0);
        }
        delay.reset();
        assert_eq!(delay.process(0.0), 0.0);
    }
}
