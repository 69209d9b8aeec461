//! Scenario benchmarks: the two hot loops of the engine.

mod delivery;
mod recompute;

pub use delivery::bench_delivery;
pub use recompute::bench_recompute;
