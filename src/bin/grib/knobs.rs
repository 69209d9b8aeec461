//! Virtual control surface: eight knobs shared between the UI and the
//! control thread.

use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Arc;

use grib::control::{ControlChannel, ControlSource, CHANNELS, RAW_MAX};

/// Starting positions, roughly a bright square with a short slap delay.
const INITIAL: [u16; CHANNELS] = [2000, 0, 64, 1500, 400, 2048, 1000, 0];

pub struct Knobs {
    raw: [AtomicU16; CHANNELS],
}

impl Knobs {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            raw: INITIAL.map(AtomicU16::new),
        })
    }

    pub fn get(&self, channel: ControlChannel) -> u16 {
        self.raw[channel.index()].load(Ordering::Relaxed)
    }

    /// Turn a knob by `delta`, stopping at the ends of the range.
    pub fn nudge(&self, channel: ControlChannel, delta: i32) {
        let slot = &self.raw[channel.index()];
        let value = (slot.load(Ordering::Relaxed) as i32 + delta).clamp(0, RAW_MAX as i32);
        slot.store(value as u16, Ordering::Relaxed);
    }
}

/// Control-thread handle onto the knobs.
pub struct KnobSource(pub Arc<Knobs>);

impl ControlSource for KnobSource {
    fn read(&mut self, channel: ControlChannel) -> u16 {
        self.0.get(channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nudge_clamps_to_raw_range() {
        let knobs = Knobs::new();
        knobs.nudge(ControlChannel::Warp, -10_000);
        assert_eq!(knobs.get(ControlChannel::Warp), 0);
        knobs.nudge(ControlChannel::Warp, 10_000);
        assert_eq!(knobs.get(ControlChannel::Warp), RAW_MAX);
    }

    #[test]
    fn source_reads_shared_values() {
        let knobs = Knobs::new();
        let mut source = KnobSource(Arc::clone(&knobs));
        knobs.nudge(ControlChannel::Cutoff, 100);
        assert_eq!(source.read(ControlChannel::Cutoff), INITIAL[0] + 100);
    }
}
