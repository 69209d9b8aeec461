//! Benchmarks for the feedback delay line.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use grib::dsp::delay::DelayLine;

use crate::BLOCK_SIZES;

pub fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/delay");

    // Fractions of the full 32768-sample line
    let times: &[f32] = &[0.01, 0.1, 0.9];

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.1).sin()).collect();

        for &time in times {
            let mut delay = DelayLine::new();
            delay.time = time;
            delay.feedback = 0.5;
            delay.amount = 0.5;
            let mut buffer = input.clone();
            group.bench_with_input(
                BenchmarkId::new(format!("render_{}pct", (time * 100.0) as u32), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        buffer.copy_from_slice(&input);
                        delay.render(black_box(&mut buffer));
                    })
                },
            );
        }

        // Time swept every sample
        let mut delay = DelayLine::new();
        group.bench_with_input(BenchmarkId::new("swept", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for (i, &x) in input.iter().enumerate() {
                    delay.time = 0.05 + (i as f32 * 0.01).sin() * 0.04;
                    sum += delay.process(black_box(x));
                }
                sum
            })
        });
    }

    group.finish();
}
