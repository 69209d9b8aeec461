//! Status line - pitch, volume, scope level and delivery health

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use grib::SynthConfig;

use super::scope::normalize;

/// Fixed facts about the running engine.
pub struct StatusInfo {
    pub sample_rate: f32,
    pub pitch_hz: f32,
    pub volume: u8,
    pub waveform: &'static str,
}

impl StatusInfo {
    pub fn from_config(config: &SynthConfig) -> Self {
        Self {
            sample_rate: config.sample_rate,
            pitch_hz: config.frequency(),
            volume: config.volume,
            waveform: config.waveform.name(),
        }
    }
}

/// Peak and RMS of the telemetry history, in output full scale.
pub struct ScopeStats {
    pub peak: f32,
    pub rms: f32,
}

impl ScopeStats {
    pub fn from_history(history: &[i32]) -> Self {
        if history.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = history.iter().fold(0.0f32, |acc, &v| acc.max(normalize(v).abs()));
        let sum: f32 = history.iter().map(|&v| normalize(v) * normalize(v)).sum();
        Self {
            peak,
            rms: (sum / history.len() as f32).sqrt(),
        }
    }
}

/// Delivery and display counters sampled once per redraw.
pub struct Health {
    pub underruns: u64,
    pub buffers: u64,
    /// Telemetry slots the display was behind at the last refresh.
    pub lag: usize,
    pub redraws: u64,
}

impl Health {
    /// Share of drain events that found no free buffer.
    pub fn underrun_ratio(&self) -> f32 {
        let drains = self.underruns + self.buffers;
        if drains == 0 {
            0.0
        } else {
            self.underruns as f32 / drains as f32
        }
    }
}

pub fn render_status(frame: &mut Frame, area: Rect, info: &StatusInfo, scope: &ScopeStats, health: &Health) {
    let underruns = health.underruns;
    let block = Block::default().title(" grib ").borders(Borders::ALL);

    let line = Line::from(vec![
        Span::styled(
            format!(" {} {:.1} Hz  ", info.waveform, info.pitch_hz),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("vol {}  ", info.volume),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("{:.1}kHz  ", info.sample_rate / 1000.0),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("Peak: {:.2}  RMS: {:.2}  ", scope.peak, scope.rms),
            Style::default().fg(Color::Magenta),
        ),
        Span::styled(
            format!("underruns {underruns} ({:.1}%)  ", health.underrun_ratio() * 100.0),
            Style::default().fg(if underruns == 0 { Color::Green } else { Color::Red }),
        ),
        Span::styled(
            format!("buffers {}  lag {}  ", health.buffers, health.lag),
            Style::default().fg(Color::White),
        ),
        Span::styled(format!("frames {}", health.redraws), Style::default().fg(Color::DarkGray)),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_of_silence_are_zero() {
        let stats = ScopeStats::from_history(&[0; 16]);
        assert_eq!(stats.peak, 0.0);
        assert_eq!(stats.rms, 0.0);
    }

    #[test]
    fn stats_of_constant_level() {
        let half = 1 << 30;
        let stats = ScopeStats::from_history(&[half, -half, half, -half]);
        assert!((stats.peak - 0.5).abs() < 1e-6);
        assert!((stats.rms - 0.5).abs() < 1e-6);
    }

    #[test]
    fn underrun_ratio_counts_every_drain() {
        let idle = Health {
            underruns: 0,
            buffers: 0,
            lag: 0,
            redraws: 0,
        };
        assert_eq!(idle.underrun_ratio(), 0.0);

        let starved = Health {
            underruns: 1,
            buffers: 3,
            lag: 5,
            redraws: 2,
        };
        assert_eq!(starved.underrun_ratio(), 0.25);
    }
}
