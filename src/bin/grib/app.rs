//! Grib - wires the engine to the host: cpal as the audio sink, a control
//! thread standing in for the recompute core, and the terminal UI as the
//! display core.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use grib::control::ControlSurface;
use grib::playback::{buffer_pool, AudioDelivery, StreamAdapter};
use grib::telemetry::{self, RefreshSender};
use grib::wavetable::{self, TablePublisher, WavetableProducer};
use grib::SynthConfig;

use super::knobs::{KnobSource, Knobs};
use super::ui::UiApp;

/// Pause between recomputes, about what eight settled multiplexer reads
/// cost on hardware.
const CONTROL_PERIOD: Duration = Duration::from_millis(8);

pub struct Grib {
    config: SynthConfig,
}

impl Grib {
    pub fn new(config: SynthConfig) -> Self {
        Self { config }
    }

    pub fn run(self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let stream_config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let channels = stream_config.channels() as usize;
        let config = SynthConfig {
            sample_rate: stream_config.sample_rate().0 as f32,
            ..self.config
        };
        log::info!(
            "output {} Hz, {} channels, {:.1} Hz pitch",
            config.sample_rate,
            channels,
            config.frequency()
        );

        let (publisher, reader) = wavetable::exchange(config.wavetable_len);
        let (pool, sink) = buffer_pool(config.pool_depth, config.frames_per_buffer);
        let (writer, telemetry) = telemetry::ring();
        let (refresh_tx, refresh_rx) = telemetry::refresh_signal();

        let delivery = AudioDelivery::new(&config, reader, pool, writer);
        let stats = delivery.stats();
        let mut adapter = StreamAdapter::new(delivery, sink);

        let stream = device
            .build_output_stream(
                &stream_config.into(),
                move |data: &mut [f32], _| adapter.fill(data, channels),
                |err| log::error!("audio stream error: {err}"),
                None,
            )
            .wrap_err("failed to build output stream")?;
        stream.play().wrap_err("failed to start output stream")?;

        let knobs = Knobs::new();
        let quit = Arc::new(AtomicBool::new(false));
        let control = spawn_control(
            config.clone(),
            publisher,
            refresh_tx,
            KnobSource(Arc::clone(&knobs)),
            Arc::clone(&quit),
        )?;

        let mut app = UiApp::new(telemetry, refresh_rx, knobs, stats, &config);
        let mut terminal = ratatui::init();
        let result = app.run(&mut terminal);
        ratatui::restore();

        quit.store(true, Ordering::Relaxed);
        if control.join().is_err() {
            log::error!("control thread panicked");
        }
        drop(stream);

        result
    }
}

/// The recompute loop: read knobs, render into the back table, publish,
/// signal the display.
fn spawn_control(
    config: SynthConfig,
    mut publisher: TablePublisher,
    mut refresh: RefreshSender,
    mut source: KnobSource,
    quit: Arc<AtomicBool>,
) -> EyreResult<JoinHandle<()>> {
    thread::Builder::new()
        .name("grib-control".into())
        .spawn(move || {
            let mut surface = ControlSurface::new(&config);
            let mut producer = WavetableProducer::new(&config);
            surface.prime(&mut source);

            let mut starved = 0u64;
            while !quit.load(Ordering::Relaxed) {
                let params = surface.read(&mut source);

                match publisher.back_buffer() {
                    Some(table) => {
                        producer.render(&params, table);
                        publisher.publish();
                        refresh.notify();
                    }
                    None => {
                        starved += 1;
                        log::debug!("audio side holds every table ({starved} waits)");
                    }
                }

                thread::sleep(CONTROL_PERIOD);
            }

            log::debug!(
                "control loop stopped, {} modulator resets",
                producer.modulator_resets()
            );
        })
        .wrap_err("failed to spawn control thread")
}
