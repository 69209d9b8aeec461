//! Benchmarks for the guarded chaotic generators.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use grib::dsp::chaos::{GeneratorKind, Guarded};

const STEPS: usize = 2048;

pub fn bench_chaos(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/chaos");

    for kind in GeneratorKind::ALL {
        let mut generator = Guarded::from_kind(kind);
        group.bench_with_input(BenchmarkId::new(format!("{kind:?}"), STEPS), &STEPS, |b, &n| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for _ in 0..n {
                    sum += generator.process();
                }
                black_box(sum)
            })
        });
    }

    group.finish();
}
