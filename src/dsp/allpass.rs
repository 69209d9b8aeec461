/// First-order all-pass.
///
/// Unity magnitude at every frequency; `coefficient` in (-1, 1) moves the
/// frequency where the phase shift crosses 90 degrees.
#[derive(Debug, Clone, Default)]
pub struct AllPass {
    state: f32,
    pub coefficient: f32,
}

impl AllPass {
    pub fn new(coefficient: f32) -> Self {
        Self {
            state: 0.0,
            coefficient,
        }
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let out = self.state + self.coefficient * input;
        self.state = input - self.coefficient * out;
        out
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.state = 0.0;
    }
}
