//! Benchmarks for the dynamics chain and utilities around it.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use grib::dsp::distortion::saturate_buffer;
use grib::dsp::dynamics::{DcBlocker, Limiter};
use grib::dsp::smooth::DynamicSmoother;

use crate::BLOCK_SIZES;

const SR: f32 = 44_100.0;

pub fn bench_dynamics(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/dynamics");

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.05).sin() * 1.5).collect();

        let mut limiter = Limiter::new(0.5, 3.0, 0.5, SR);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("limiter", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                limiter.render(black_box(&mut buffer));
            })
        });

        let mut dc = DcBlocker::new();
        group.bench_with_input(BenchmarkId::new("dc_blocker", size), &size, |b, _| {
            b.iter(|| input.iter().map(|&x| dc.process(black_box(x))).sum::<f32>())
        });

        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("saturate", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                saturate_buffer(black_box(&mut buffer), 0.5, 0.5, 0.8);
            })
        });

        let mut smoother = DynamicSmoother::new(SR);
        group.bench_with_input(BenchmarkId::new("dynamic_smoother", size), &size, |b, _| {
            b.iter(|| input.iter().map(|&x| smoother.process(black_box(x))).sum::<f32>())
        });
    }

    group.finish();
}
