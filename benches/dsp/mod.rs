//! Benchmarks for low-level DSP primitives.

mod chaos;
mod delay;
mod dynamics;
mod filter;
mod oscillator;

pub use chaos::bench_chaos;
pub use delay::bench_delay;
pub use dynamics::bench_dynamics;
pub use filter::bench_filter;
pub use oscillator::bench_oscillator;
