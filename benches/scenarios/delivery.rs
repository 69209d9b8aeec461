//! Benchmark for the drain callback and the float adapter in front of it.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use grib::playback::{buffer_pool, AudioDelivery, StreamAdapter};
use grib::telemetry;
use grib::wavetable::exchange;
use grib::SynthConfig;

pub fn bench_delivery(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/delivery");
    let config = SynthConfig::default();

    // Drain straight into the pool, recycling on the sink side
    let (_publisher, reader) = exchange(config.wavetable_len);
    let (pool, mut sink) = buffer_pool(config.pool_depth, config.frames_per_buffer);
    let (writer, _telemetry) = telemetry::ring();
    let mut delivery = AudioDelivery::new(&config, reader, pool, writer);
    group.bench_with_input(
        BenchmarkId::new("on_drain", config.frames_per_buffer),
        &config.frames_per_buffer,
        |b, _| {
            b.iter(|| {
                delivery.on_drain();
                if let Some(buffer) = sink.next_ready() {
                    black_box(buffer.samples()[0]);
                    sink.release(buffer);
                }
            })
        },
    );

    for &size in crate::BLOCK_SIZES {
        let (_publisher, reader) = exchange(config.wavetable_len);
        let (pool, sink) = buffer_pool(config.pool_depth, config.frames_per_buffer);
        let (writer, _telemetry) = telemetry::ring();
        let mut adapter = StreamAdapter::new(AudioDelivery::new(&config, reader, pool, writer), sink);
        let mut output = vec![0.0f32; size * 2];
        group.bench_with_input(BenchmarkId::new("adapter_stereo", size), &size, |b, _| {
            b.iter(|| adapter.fill(black_box(&mut output), 2))
        });
    }

    group.finish();
}
