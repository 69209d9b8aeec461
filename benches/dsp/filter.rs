//! Benchmarks for the three state-variable filters.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use grib::dsp::filter::{ResonantSvf, Svf, ToneFilter};

use crate::BLOCK_SIZES;

const SR: f32 = 44_100.0;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        let mut svf = Svf::lowpass(1000.0, 0.707, SR);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("svf_lowpass", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                svf.render(black_box(&mut buffer));
            })
        });

        // All six taps computed, all summed
        let mut svf = Svf::lowpass(1000.0, 0.707, SR);
        group.bench_with_input(BenchmarkId::new("svf_all_taps", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for &x in &input {
                    let o = svf.next_sample(black_box(x));
                    sum += o.lowpass + o.bandpass + o.highpass + o.notch + o.peak + o.allpass;
                }
                sum
            })
        });

        let mut resonant = ResonantSvf::new(SR);
        resonant.init(1000.0, 4.0);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("resonant", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                resonant.render(black_box(&mut buffer));
            })
        });

        let mut tone = ToneFilter::new(SR);
        tone.init(1000.0, 0.5);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("tone", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                tone.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
