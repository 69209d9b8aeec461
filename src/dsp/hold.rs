/// Sample-and-hold with a period counted in samples.
///
/// The held value is refreshed once the internal counter has run past
/// `period`: the first refresh lands on call `period + 2`, then every
/// `period + 1` calls. A negative period refreshes on every call.
#[derive(Debug, Clone, Default)]
pub struct SampleHold {
    elapsed: i32,
    value: f32,
}

impl SampleHold {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn process(&mut self, input: f32, period: i32) -> f32 {
        if self.elapsed > period {
            self.elapsed = 0;
            self.value = input;
        }
        self.elapsed += 1;
        self.value
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn reset(&mut self) {
        self.elapsed = 0;
        self.value = 0.0;
    }
}
