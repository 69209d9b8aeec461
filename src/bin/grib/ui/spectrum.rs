//! Spectrum of the telemetry history
//!
//! The history is decimated output (every stride-th frame), so the analyzer
//! runs at `sample_rate / stride` and its top bin is that rate's Nyquist.

use std::f32::consts::TAU;
use std::sync::Arc;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};

const FLOOR_DB: f64 = -100.0;

pub struct SpectrumAnalyzer {
    window: Vec<f32>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    bin_hz: f64,
    /// (frequency_hz, magnitude_db) for bins 1..len/2
    spectrum: Vec<(f64, f64)>,
}

impl SpectrumAnalyzer {
    pub fn new(len: usize, sample_rate: f32) -> Self {
        let len = len.max(2);
        let fft = FftPlanner::new().plan_fft_forward(len);

        // Hann
        let window = (0..len)
            .map(|i| 0.5 * (1.0 - (TAU * i as f32 / (len - 1) as f32).cos()))
            .collect();

        let bin_hz = sample_rate as f64 / len as f64;
        let spectrum = (1..len / 2).map(|k| (k as f64 * bin_hz, FLOOR_DB)).collect();

        Self {
            window,
            fft,
            scratch: vec![Complex::new(0.0, 0.0); len],
            bin_hz,
            spectrum,
        }
    }

    /// Recompute from `buffer`; ignored unless it matches the FFT size.
    pub fn update(&mut self, buffer: &[f32]) {
        if buffer.len() != self.window.len() {
            return;
        }

        for ((slot, &sample), &w) in self.scratch.iter_mut().zip(buffer).zip(&self.window) {
            *slot = Complex::new(sample * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        for (k, (freq, db)) in self.spectrum.iter_mut().enumerate() {
            let bin = self.scratch[k + 1];
            let power = (bin.re * bin.re + bin.im * bin.im).max(1e-12);
            *freq = (k + 1) as f64 * self.bin_hz;
            *db = (10.0 * (power as f64).log10()).max(FLOOR_DB);
        }
    }

    pub fn data(&self) -> &[(f64, f64)] {
        &self.spectrum
    }
}

pub fn render_spectrum(frame: &mut Frame, area: Rect, spectrum: &[(f64, f64)]) {
    let block = Block::default().title(" Spectrum ").borders(Borders::ALL);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(spectrum);

    let max_freq = spectrum.last().map_or(1.0, |(f, _)| *f).max(1.0);
    let max_db = spectrum.iter().map(|(_, db)| *db).fold(FLOOR_DB, f64::max);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, max_freq])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([FLOOR_DB, max_db.max(0.0) + 10.0])
                .labels(vec!["-100", "-50", "0"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
