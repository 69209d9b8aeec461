//! grib - wavetable synthesizer in the terminal
//!
//! Run with: cargo run --release
//!
//! Logging defaults to warnings; set RUST_LOG=debug for control-loop detail.

mod app;
mod knobs;
mod ui;

use app::Grib;
use grib::SynthConfig;
use simple_logger::SimpleLogger;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    SimpleLogger::new()
        .with_level(log::LevelFilter::Warn)
        .env()
        .init()?;

    Grib::new(SynthConfig::default()).run()
}
