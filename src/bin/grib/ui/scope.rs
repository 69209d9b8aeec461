//! Telemetry scope
//!
//! Plots the last telemetry lap onto a virtual 128x64 panel: each raw
//! sample divided by 0x80FFFF and offset to the middle row.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

use grib::playback::OUTPUT_FULL_SCALE;

pub const PANEL_ROWS: i32 = 64;
const ROW_SCALE: i32 = 0x80FFFF;

/// Panel row of a raw output sample, clamped to the panel.
pub fn row(value: i32) -> i32 {
    (value / ROW_SCALE + PANEL_ROWS / 2).clamp(0, PANEL_ROWS - 1)
}

/// Raw output sample to [-1, 1).
pub fn normalize(value: i32) -> f32 {
    value as f32 / OUTPUT_FULL_SCALE
}

pub fn render_scope(frame: &mut Frame, area: Rect, history: &[i32]) {
    let block = Block::default().title(" Scope ").borders(Borders::ALL);

    let data: Vec<(f64, f64)> = history
        .iter()
        .enumerate()
        .map(|(i, &value)| (i as f64, row(value) as f64))
        .collect();

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Scatter)
        .style(Style::default().fg(Color::Cyan))
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, history.len().max(1) as f64])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([0.0, PANEL_ROWS as f64])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
