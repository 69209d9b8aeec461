//! Benchmark for one full wavetable recompute, control read included.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use grib::control::{ControlSurface, FixedControls};
use grib::dsp::chaos::GeneratorKind;
use grib::wavetable::WavetableProducer;
use grib::SynthConfig;

pub fn bench_recompute(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/recompute");

    let cases = [
        ("plain", None),
        ("chaos_fm", Some(GeneratorKind::Helmholtz)),
    ];

    for (name, modulator) in cases {
        let config = SynthConfig {
            modulator,
            ..SynthConfig::default()
        };
        let mut surface = ControlSurface::new(&config);
        let mut producer = WavetableProducer::new(&config);
        let mut source = FixedControls([1500, 3000, 64, 1000, 400, 2048, 1200, 1000]);
        let mut table = vec![0i16; config.wavetable_len];

        group.bench_with_input(
            BenchmarkId::new(name, config.wavetable_len),
            &config.wavetable_len,
            |b, _| {
                b.iter(|| {
                    let params = surface.read(&mut source);
                    producer.render(black_box(&params), black_box(&mut table));
                })
            },
        );
    }

    group.finish();
}
