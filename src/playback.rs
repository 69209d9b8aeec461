//! Audio delivery: fixed-point table playback into a small pool of stereo
//! buffers.
//!
//! The pool models a DMA-fed audio peripheral. Buffers start out free. The
//! drain callback takes a free one, fills it and hands it to the ready queue;
//! the sink plays ready buffers and returns them to the free queue. When no
//! free buffer is available the callback gives up for that cycle and counts
//! an underrun.
//!
//! Nothing on this path allocates, blocks or logs.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rtrb::{Consumer, Producer, RingBuffer};

use crate::telemetry::TelemetryWriter;
use crate::wavetable::TableReader;
use crate::{SynthConfig, FRACTIONAL_BITS};

/// Full scale of an output sample as produced by `Playback`.
pub const OUTPUT_FULL_SCALE: f32 = 2_147_483_648.0;

/// Q16 read position into the wavetable.
#[derive(Debug, Clone)]
pub struct Playback {
    position: u64,
    position_max: u64,
    pub step: u32,
    pub volume: u8,
}

impl Playback {
    pub fn new(config: &SynthConfig) -> Self {
        Self {
            position: 0,
            // An empty table still needs a nonzero wrap point
            position_max: config.position_max().max(1),
            step: config.step,
            volume: config.volume,
        }
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    /// Table index for the current position.
    #[inline]
    pub fn index(&self) -> usize {
        (self.position >> FRACTIONAL_BITS) as usize
    }

    #[inline]
    pub fn advance(&mut self) {
        let next = self.position + self.step as u64;
        let max = self.position_max;
        self.position = if next < max {
            next
        } else if next - max < max {
            next - max
        } else {
            next % max
        };
    }

    /// Produce one output sample and advance.
    ///
    /// The sample is `(volume * table[index]) << 8`, which fits an `i32` for
    /// every volume and table value.
    #[inline]
    pub fn next_sample(&mut self, table: &[i16]) -> i32 {
        let value = table.get(self.index()).copied().unwrap_or(0);
        self.advance();
        (self.volume as i32 * value as i32) << 8
    }
}

/// One interleaved stereo buffer from the pool.
#[derive(Debug)]
pub struct AudioBuffer {
    samples: Box<[i32]>,
    sample_count: usize,
}

impl AudioBuffer {
    fn new(frames: usize) -> Self {
        Self {
            samples: vec![0; frames * 2].into_boxed_slice(),
            sample_count: 0,
        }
    }

    pub fn max_frames(&self) -> usize {
        self.samples.len() / 2
    }

    /// Frames written by the last fill.
    pub fn frames(&self) -> usize {
        self.sample_count
    }

    /// The filled part, interleaved left/right.
    pub fn samples(&self) -> &[i32] {
        &self.samples[..self.sample_count * 2]
    }
}

/// Callback-side view of the pool.
pub struct PoolProducer {
    free_rx: Consumer<AudioBuffer>,
    ready_tx: Producer<AudioBuffer>,
}

/// Sink-side view of the pool.
pub struct PoolConsumer {
    ready_rx: Consumer<AudioBuffer>,
    free_tx: Producer<AudioBuffer>,
}

pub fn buffer_pool(depth: usize, frames: usize) -> (PoolProducer, PoolConsumer) {
    let depth = depth.max(1);
    let (mut free_tx, free_rx) = RingBuffer::new(depth);
    let (ready_tx, ready_rx) = RingBuffer::new(depth);
    for _ in 0..depth {
        let _ = free_tx.push(AudioBuffer::new(frames));
    }
    (
        PoolProducer { free_rx, ready_tx },
        PoolConsumer { ready_rx, free_tx },
    )
}

impl PoolProducer {
    #[inline]
    pub fn take(&mut self) -> Option<AudioBuffer> {
        self.free_rx.pop().ok()
    }

    #[inline]
    pub fn give(&mut self, buffer: AudioBuffer) {
        // Every buffer belongs to exactly one queue, each sized for all of them
        let _ = self.ready_tx.push(buffer);
    }
}

impl PoolConsumer {
    #[inline]
    pub fn next_ready(&mut self) -> Option<AudioBuffer> {
        self.ready_rx.pop().ok()
    }

    #[inline]
    pub fn release(&mut self, buffer: AudioBuffer) {
        let _ = self.free_tx.push(buffer);
    }

    pub fn ready(&self) -> usize {
        self.ready_rx.slots()
    }
}

/// Counters readable from any thread.
#[derive(Debug, Default)]
pub struct DeliveryStats {
    underruns: AtomicU64,
    buffers: AtomicU64,
}

impl DeliveryStats {
    pub fn underruns(&self) -> u64 {
        self.underruns.load(Ordering::Relaxed)
    }

    pub fn buffers(&self) -> u64 {
        self.buffers.load(Ordering::Relaxed)
    }
}

/// The drain callback and everything it owns.
pub struct AudioDelivery {
    playback: Playback,
    table: TableReader,
    pool: PoolProducer,
    telemetry: TelemetryWriter,
    stride: usize,
    stats: Arc<DeliveryStats>,
}

impl AudioDelivery {
    pub fn new(
        config: &SynthConfig,
        table: TableReader,
        pool: PoolProducer,
        telemetry: TelemetryWriter,
    ) -> Self {
        Self {
            playback: Playback::new(config),
            table,
            pool,
            telemetry,
            stride: config.telemetry_stride.max(1),
            stats: Arc::new(DeliveryStats::default()),
        }
    }

    pub fn stats(&self) -> Arc<DeliveryStats> {
        Arc::clone(&self.stats)
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    pub fn playback_mut(&mut self) -> &mut Playback {
        &mut self.playback
    }

    /// Fill one pool buffer. Returns false on underrun, leaving the playback
    /// position where it was.
    pub fn on_drain(&mut self) -> bool {
        let Some(mut buffer) = self.pool.take() else {
            self.stats.underruns.fetch_add(1, Ordering::Relaxed);
            return false;
        };

        self.table.refresh();
        let table = self.table.table();

        for (i, frame) in buffer.samples.chunks_exact_mut(2).enumerate() {
            let sample = self.playback.next_sample(table);
            frame[0] = sample;
            frame[1] = sample;
            if i % self.stride == 0 {
                self.telemetry.push(sample);
            }
        }
        buffer.sample_count = buffer.max_frames();

        self.pool.give(buffer);
        self.stats.buffers.fetch_add(1, Ordering::Relaxed);
        true
    }
}

/// Adapts the pool to a host audio callback that wants float frames.
///
/// Each time the current buffer runs dry the adapter returns it to the pool
/// and fires the drain callback, the way the peripheral's DMA-complete
/// interrupt would. Output is silence while no ready buffer exists.
pub struct StreamAdapter {
    delivery: AudioDelivery,
    sink: PoolConsumer,
    current: Option<AudioBuffer>,
    cursor: usize,
}

impl StreamAdapter {
    pub fn new(delivery: AudioDelivery, sink: PoolConsumer) -> Self {
        Self {
            delivery,
            sink,
            current: None,
            cursor: 0,
        }
    }

    pub fn delivery(&self) -> &AudioDelivery {
        &self.delivery
    }

    /// Fill interleaved `output` with `channels` channels per frame.
    ///
    /// Left goes to channel 0, right to channel 1, extra channels get left.
    pub fn fill(&mut self, output: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        for frame in output.chunks_mut(channels) {
            let (left, right) = self.next_frame();
            for (c, slot) in frame.iter_mut().enumerate() {
                let value = if c == 1 { right } else { left };
                *slot = value as f32 / OUTPUT_FULL_SCALE;
            }
        }
    }

    #[inline]
    fn next_frame(&mut self) -> (i32, i32) {
        loop {
            if let Some(buffer) = self.current.as_ref() {
                if self.cursor < buffer.frames() {
                    let samples = buffer.samples();
                    let frame = (samples[self.cursor * 2], samples[self.cursor * 2 + 1]);
                    self.cursor += 1;
                    return frame;
                }
            }

            if let Some(done) = self.current.take() {
                self.sink.release(done);
            }
            self.cursor = 0;

            if self.sink.ready() == 0 {
                self.delivery.on_drain();
            }
            match self.sink.next_ready() {
                Some(buffer) => self.current = Some(buffer),
                None => return (0, 0),
            }
        }
    }
}
