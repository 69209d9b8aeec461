//! Lossy telemetry from the audio context to the display context.
//!
//! The ring never blocks and never refuses a write: the writer overwrites
//! whatever is in the next slot, read or not. The reader walks its own cursor
//! and accepts that it may see stale or skipped values. Slots are atomics, so
//! a torn read is impossible even though there is no synchronization between
//! the cursors.
//!
//! The refresh signal is the inter-core FIFO: the control context posts a
//! token after each wavetable recompute, and the display redraws from the
//! ring when it sees one.

use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
use std::sync::Arc;

use rtrb::{Consumer, Producer, RingBuffer};

use crate::TELEMETRY_LEN;

struct Shared {
    data: [AtomicI32; TELEMETRY_LEN],
    write: AtomicUsize,
}

/// Audio-side half of the telemetry ring.
pub struct TelemetryWriter {
    shared: Arc<Shared>,
    cursor: usize,
}

/// Display-side half of the telemetry ring.
pub struct TelemetryReader {
    shared: Arc<Shared>,
    cursor: usize,
}

pub fn ring() -> (TelemetryWriter, TelemetryReader) {
    let shared = Arc::new(Shared {
        data: std::array::from_fn(|_| AtomicI32::new(0)),
        write: AtomicUsize::new(0),
    });
    (
        TelemetryWriter {
            shared: Arc::clone(&shared),
            cursor: 0,
        },
        TelemetryReader { shared, cursor: 0 },
    )
}

impl TelemetryWriter {
    /// Advance the cursor, then store.
    #[inline]
    pub fn push(&mut self, value: i32) {
        self.cursor = (self.cursor + 1) % TELEMETRY_LEN;
        self.shared.data[self.cursor].store(value, Ordering::Relaxed);
        self.shared.write.store(self.cursor, Ordering::Release);
    }
}

impl TelemetryReader {
    /// Advance the cursor, then load. Always returns a value, possibly stale.
    #[inline]
    pub fn pop(&mut self) -> i32 {
        self.cursor = (self.cursor + 1) % TELEMETRY_LEN;
        self.shared.data[self.cursor].load(Ordering::Relaxed)
    }

    /// Fill `out` with consecutive reads.
    pub fn read_into(&mut self, out: &mut [i32]) {
        for slot in out.iter_mut() {
            *slot = self.pop();
        }
    }

    /// Most recently written value.
    pub fn latest(&self) -> i32 {
        let cursor = self.shared.write.load(Ordering::Acquire);
        self.shared.data[cursor].load(Ordering::Relaxed)
    }

    /// How far the writer is ahead of the reader, modulo the ring length.
    pub fn lag(&self) -> usize {
        let write = self.shared.write.load(Ordering::Acquire);
        (write + TELEMETRY_LEN - self.cursor) % TELEMETRY_LEN
    }
}

/// Token posted after every recompute.
pub const REFRESH: u16 = 1;

const SIGNAL_DEPTH: usize = 8;

pub struct RefreshSender {
    tx: Producer<u16>,
}

pub struct RefreshReceiver {
    rx: Consumer<u16>,
}

pub fn refresh_signal() -> (RefreshSender, RefreshReceiver) {
    let (tx, rx) = RingBuffer::new(SIGNAL_DEPTH);
    (RefreshSender { tx }, RefreshReceiver { rx })
}

impl RefreshSender {
    /// Post a refresh. Returns false when the display is already behind by a
    /// full FIFO; the token is dropped since pending ones cover it.
    pub fn notify(&mut self) -> bool {
        self.tx.push(REFRESH).is_ok()
    }
}

impl RefreshReceiver {
    /// Drain every pending token; true if any asked for a redraw.
    pub fn take(&mut self) -> bool {
        let mut refresh = false;
        while let Ok(token) = self.rx.pop() {
            refresh |= token == REFRESH;
        }
        refresh
    }
}
