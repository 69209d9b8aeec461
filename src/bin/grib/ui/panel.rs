//! Knob panel: one gauge per control channel.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, LineGauge},
    Frame,
};

use grib::control::{ControlChannel, CHANNELS, RAW_MAX};

use crate::knobs::Knobs;

pub fn render_panel(frame: &mut Frame, area: Rect, knobs: &Knobs, selected: usize) {
    let block = Block::default().title(" Controls ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1); CHANNELS])
        .split(inner);

    for (i, (channel, row)) in ControlChannel::ALL.iter().zip(rows.iter()).enumerate() {
        let raw = knobs.get(*channel);
        let style = if i == selected {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };

        let gauge = LineGauge::default()
            .label(format!("{} {:<12}{:>5}", channel.index(), channel.label(), raw))
            .ratio(raw as f64 / RAW_MAX as f64)
            .style(style)
            .filled_style(style);

        frame.render_widget(gauge, *row);
    }
}
