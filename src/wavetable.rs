//! Wavetable production and the lock-free handoff to the audio context.
//!
//! Three tables circulate between the two contexts. At any moment one is
//! being played, at most one is being written, and the rest are in flight on
//! one of two rings:
//!
//! ```text
//!   control ──fresh──▶ audio
//!   control ◀─recycle── audio
//! ```
//!
//! Ownership moves with the box, so the reader can only ever see a table the
//! writer has finished with. The audio side never allocates or frees: both
//! rings are deep enough to hold every table at once, so pushes cannot fail.

use std::f32::consts::TAU;

use rtrb::{Consumer, Producer, RingBuffer};

use crate::control::Params;
use crate::dsp::chaos::{Attractor, Guarded};
use crate::dsp::delay::DelayLine;
use crate::dsp::dynamics::{DcBlocker, Limiter};
use crate::dsp::filter::ToneFilter;
use crate::dsp::hold::SampleHold;
use crate::dsp::Oscillator;
use crate::SynthConfig;

const TABLES: usize = 3;

/// Oscillator level into the tone filter.
const SOURCE_GAIN: f32 = 0.5;

pub type Table = Box<[i16]>;

type Modulator = Guarded<Box<dyn Attractor>>;

/// Control-side end of the exchange.
pub struct TablePublisher {
    fresh_tx: Producer<Table>,
    recycle_rx: Consumer<Table>,
    back: Option<Table>,
}

/// Audio-side end of the exchange.
pub struct TableReader {
    current: Table,
    fresh_rx: Consumer<Table>,
    recycle_tx: Producer<Table>,
}

/// Build the exchange for tables of `len` samples.
///
/// The reader starts on a full-scale cosine so playback has something to
/// play before the first recompute lands. A zero `len` gives empty tables,
/// which play back as silence.
pub fn exchange(len: usize) -> (TablePublisher, TableReader) {
    let (fresh_tx, fresh_rx) = RingBuffer::new(TABLES);
    let (mut recycle_tx, recycle_rx) = RingBuffer::new(TABLES);

    let current: Table = (0..len)
        .map(|i| (32767.0 * (i as f32 * TAU / len as f32).cos()) as i16)
        .collect();

    for _ in 1..TABLES {
        let spare: Table = vec![0i16; len].into_boxed_slice();
        // Ring holds TABLES, we push TABLES - 1
        let _ = recycle_tx.push(spare);
    }

    (
        TablePublisher {
            fresh_tx,
            recycle_rx,
            back: None,
        },
        TableReader {
            current,
            fresh_rx,
            recycle_tx,
        },
    )
}

impl TablePublisher {
    /// A table to write into, or `None` while the reader still holds them all.
    pub fn back_buffer(&mut self) -> Option<&mut [i16]> {
        if self.back.is_none() {
            self.back = self.recycle_rx.pop().ok();
        }
        self.back.as_deref_mut()
    }

    /// Hand the back table to the reader. Returns false if there was none.
    pub fn publish(&mut self) -> bool {
        let Some(table) = self.back.take() else {
            return false;
        };
        match self.fresh_tx.push(table) {
            Ok(()) => true,
            Err(rtrb::PushError::Full(table)) => {
                self.back = Some(table);
                false
            }
        }
    }
}

impl TableReader {
    /// Switch to the newest published table, if any. Call at buffer
    /// boundaries only. Returns true when the table changed.
    #[inline]
    pub fn refresh(&mut self) -> bool {
        let mut changed = false;
        while let Ok(fresh) = self.fresh_rx.pop() {
            let stale = std::mem::replace(&mut self.current, fresh);
            // Recycle ring holds every table; this cannot be full
            let _ = self.recycle_tx.push(stale);
            changed = true;
        }
        changed
    }

    #[inline]
    pub fn table(&self) -> &[i16] {
        &self.current
    }
}

/// The per-iteration signal chain that renders one table.
///
/// Oscillator phase restarts every pass so the table holds exactly one cycle.
/// Filter, delay, limiter, DC blocker and sample-and-hold state carry over
/// from pass to pass.
pub struct WavetableProducer {
    oscillator: Oscillator,
    filter: ToneFilter,
    delay: DelayLine,
    limiter: Limiter,
    dc: DcBlocker,
    hold: SampleHold,
    modulator: Option<Modulator>,
    amplitude: f32,
    table_gain: f32,
}

impl WavetableProducer {
    pub fn new(config: &SynthConfig) -> Self {
        let mut oscillator = Oscillator::new(config.waveform);
        oscillator.amplitude = config.amplitude;

        Self {
            oscillator,
            filter: ToneFilter::new(config.sample_rate),
            delay: DelayLine::new(),
            limiter: Limiter::new(
                config.limiter_attack_ms,
                config.limiter_release_ms,
                config.limiter_threshold,
                config.sample_rate,
            ),
            dc: DcBlocker::new(),
            hold: SampleHold::new(),
            modulator: config.modulator.map(Modulator::from_kind),
            amplitude: config.amplitude,
            table_gain: config.table_gain,
        }
    }

    /// Recompute `table` from `params`. Every slot is overwritten.
    pub fn render(&mut self, params: &Params, table: &mut [i16]) {
        if table.is_empty() {
            return;
        }

        self.prepare(params, table.len());

        for slot in table.iter_mut() {
            let chaos = match self.modulator.as_mut() {
                Some(modulator) => modulator.process() * params.chaos_depth,
                None => 0.0,
            };

            let mut out = self.oscillator.advance() * SOURCE_GAIN;
            out = self.filter.process(out);
            out = self.delay.process(out);
            out = self.limiter.process(out);
            out = self.dc.process(out);

            self.oscillator.fm = self.hold.process(out, params.hold_period) * params.hold_depth + chaos;

            *slot = quantize(out * self.table_gain);
        }
    }

    /// Load `params` into the chain and restart the oscillator for a table
    /// of `len` samples.
    fn prepare(&mut self, params: &Params, len: usize) {
        self.filter.init(params.cutoff, params.q);

        self.delay.time = params.delay_time;
        self.delay.amount = params.delay_amount;
        self.delay.feedback = params.delay_feedback;

        // One cycle per table, independent of the sample rate
        let osc = &mut self.oscillator;
        osc.delta = TAU / len as f32;
        osc.amplitude = self.amplitude;
        osc.pwm = params.pwm();
        osc.warp = params.warp;
        osc.restart();

        if let Some(modulator) = self.modulator.as_mut() {
            modulator.inner_mut().set_step_size(params.chaos_step);
        }
    }

    /// Number of times the chaos modulator has been pulled back from a
    /// non-finite state.
    pub fn modulator_resets(&self) -> u32 {
        self.modulator.as_ref().map_or(0, Modulator::resets)
    }
}

/// Float to table sample. Saturates out-of-range values, NaN becomes zero.
#[inline]
pub fn quantize(value: f32) -> i16 {
    value as i16
}
