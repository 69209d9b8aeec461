use std::f32::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Trapezoidal State-Variable Filters
==================================

All three filters here are zero-delay-feedback topologies: the analog
prototype is integrated with the trapezoidal rule, and the feedback inside
one sample period is solved algebraically instead of being delayed by a
sample. The cutoff is prewarped so the digital response matches the analog
one at the cutoff frequency:

    g = tan(π · cutoff / sample_rate)

Every filter carries exactly two integrator states (ic1eq, ic2eq). `init`
re-derives the coefficients only; the integrators are left alone so a sweep
of cutoff or Q while audio is running does not click. Call `reset` to clear
them explicitly.

| filter          | second argument         | outputs                          |
| --------------- | ----------------------- | -------------------------------- |
| Svf             | Q (k = 1/Q)             | low, band, high, notch, peak, all |
| ResonantSvf     | Q (k = 2 - 1/Q)         | low                              |
| ToneFilter      | damping (Q > 0)         | low                              |

Nothing is clamped here. Cutoff at or above Nyquist, or Q outside a sane
range, produces garbage or blows up; the control surface clamps first.
*/

/// Selects one tap of the multi-output SVF.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    LowPass,
    BandPass,
    HighPass,
    Notch,
    Peak,
    AllPass,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FilterOutputs {
    pub lowpass: f32,
    pub bandpass: f32,
    pub highpass: f32,
    pub notch: f32,
    pub peak: f32,
    pub allpass: f32,
}

impl FilterOutputs {
    pub fn select(&self, filter_type: FilterType) -> f32 {
        match filter_type {
            FilterType::LowPass => self.lowpass,
            FilterType::BandPass => self.bandpass,
            FilterType::HighPass => self.highpass,
            FilterType::Notch => self.notch,
            FilterType::Peak => self.peak,
            FilterType::AllPass => self.allpass,
        }
    }
}

#[inline]
fn prewarp(cutoff_hz: f32, sample_rate: f32) -> f32 {
    (PI * cutoff_hz / sample_rate).tan()
}

/// Multi-output state-variable filter.
#[derive(Debug, Clone)]
pub struct Svf {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory

    g: f32,
    k: f32,
    a: f32,
    b: f32,

    sample_rate: f32,
    filter_type: FilterType,
}

impl Svf {
    pub fn new(filter_type: FilterType, sample_rate: f32) -> Self {
        let mut filter = Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            g: 0.0,
            k: 0.0,
            a: 0.0,
            b: 0.0,
            sample_rate,
            filter_type,
        };
        filter.init(1000.0, 0.707);
        filter
    }

    pub fn lowpass(cutoff_hz: f32, q: f32, sample_rate: f32) -> Self {
        let mut filter = Self::new(FilterType::LowPass, sample_rate);
        filter.init(cutoff_hz, q);
        filter
    }

    pub fn highpass(cutoff_hz: f32, q: f32, sample_rate: f32) -> Self {
        let mut filter = Self::new(FilterType::HighPass, sample_rate);
        filter.init(cutoff_hz, q);
        filter
    }

    pub fn bandpass(cutoff_hz: f32, q: f32, sample_rate: f32) -> Self {
        let mut filter = Self::new(FilterType::BandPass, sample_rate);
        filter.init(cutoff_hz, q);
        filter
    }

    /// Recompute coefficients. Integrator state is kept.
    pub fn init(&mut self, cutoff_hz: f32, q: f32) {
        self.g = prewarp(cutoff_hz, self.sample_rate);
        self.k = 1.0 / q;
        self.a = 1.0 / (1.0 + self.g * (self.g + self.k));
        self.b = self.g * self.a;
    }

    pub fn next_sample(&mut self, sample: f32) -> FilterOutputs {
        let v1 = self.a * self.ic1eq + self.b * (sample - self.ic2eq);
        let v2 = self.ic2eq + self.g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        let lowpass = v2;
        let bandpass = v1;
        let highpass = sample - self.k * v1 - v2;

        FilterOutputs {
            lowpass,
            bandpass,
            highpass,
            notch: lowpass + highpass,
            peak: lowpass - highpass,
            allpass: lowpass + highpass - self.k * bandpass,
        }
    }

    /// Process one sample and return the configured tap.
    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        self.next_sample(sample).select(self.filter_type)
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    pub fn set_type(&mut self, filter_type: FilterType) {
        self.filter_type = filter_type;
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }
}

/// Sallen-Key style lowpass driven directly by a resonance coefficient.
///
/// `k` is the feedback gain around the two stages. The analog prototype has
/// `Q = 1 / (2 - k)`, so `k` must stay below 2.
#[derive(Debug, Clone)]
pub struct ResonantSvf {
    ic1eq: f32,
    ic2eq: f32,
    k: f32,
    a0: f32,
    a1: f32,
    a2: f32,
    a3: f32,
    a4: f32,
    a5: f32,
    g: f32,
    sample_rate: f32,
}

impl ResonantSvf {
    pub fn new(sample_rate: f32) -> Self {
        let mut filter = Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            k: 0.0,
            a0: 0.0,
            a1: 0.0,
            a2: 0.0,
            a3: 0.0,
            a4: 0.0,
            a5: 0.0,
            g: 0.0,
            sample_rate,
        };
        filter.init(1000.0, 0.707);
        filter
    }

    /// Recompute coefficients from cutoff and Q. Integrator state is kept.
    pub fn init(&mut self, cutoff_hz: f32, q: f32) {
        self.g = prewarp(cutoff_hz, self.sample_rate);
        self.set_resonance(2.0 - 1.0 / q);
    }

    /// Set the feedback coefficient directly.
    pub fn set_resonance(&mut self, k: f32) {
        let g = self.g;
        self.k = k;
        self.a0 = 1.0 / ((1.0 + g) * (1.0 + g) - g * k);
        self.a1 = k * self.a0;
        self.a2 = (1.0 + g) * self.a0;
        self.a3 = g * self.a2;
        self.a4 = 1.0 / (1.0 + g);
        self.a5 = g * self.a4;
    }

    pub fn resonance(&self) -> f32 {
        self.k
    }

    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        let v1 = self.a1 * self.ic2eq + self.a2 * self.ic1eq + self.a3 * sample;
        let v2 = self.a4 * self.ic2eq + self.a5 * v1;
        self.ic1eq = 2.0 * (v1 - self.k * v2) - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;
        v2
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }
}

/// The main tone filter of the wavetable pipeline.
///
/// Coefficients come from `sin(w)` and `sin(2w)` instead of `tan`, which
/// keeps them bounded right up to Nyquist. The second argument enters as the
/// damping term: lower values resonate harder.
#[derive(Debug, Clone)]
pub struct ToneFilter {
    ic1eq: f32,
    ic2eq: f32,
    g0: f32,
    g1: f32,
    g2: f32,
    sample_rate: f32,
}

impl ToneFilter {
    pub fn new(sample_rate: f32) -> Self {
        let mut filter = Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            g0: 0.0,
            g1: 0.0,
            g2: 0.0,
            sample_rate,
        };
        filter.init(1000.0, 1.0);
        filter
    }

    /// Recompute coefficients. Integrator state is kept.
    pub fn init(&mut self, cutoff_hz: f32, q: f32) {
        let w = PI * cutoff_hz / self.sample_rate;
        let s1 = w.sin();
        let s2 = (2.0 * w).sin();
        let nrm = 1.0 / (2.0 + q * s2);
        self.g0 = s2 * nrm;
        self.g1 = (-2.0 * s1 * s1 - q * s2) * nrm;
        self.g2 = (2.0 * s1 * s1) * nrm;
    }

    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        let t0 = sample - self.ic2eq;
        let t1 = self.g0 * t0 + self.g1 * self.ic1eq;
        let t2 = self.g2 * t0 + self.g0 * self.ic1eq;
        let v2 = t2 + self.ic2eq;
        self.ic1eq += 2.0 * t1;
        self.ic2eq += 2.0 * t2;
        v2
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }
}
