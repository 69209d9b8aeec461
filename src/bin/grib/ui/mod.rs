//! Terminal display: the telemetry scope, its spectrum, the knob panel and
//! a status line.
//!
//! Redraws are paced by refresh tokens from the control thread, the same way
//! the display core waited on the inter-core FIFO.

mod panel;
mod scope;
mod spectrum;
mod status;

use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};

use grib::control::{ControlChannel, CHANNELS};
use grib::playback::DeliveryStats;
use grib::telemetry::{RefreshReceiver, TelemetryReader};
use grib::{SynthConfig, TELEMETRY_LEN};

use super::knobs::Knobs;
use panel::render_panel;
use scope::render_scope;
use spectrum::{render_spectrum, SpectrumAnalyzer};
use status::{render_status, Health, ScopeStats, StatusInfo};

const FINE_STEP: i32 = 16;
const COARSE_STEP: i32 = 256;

pub struct UiApp {
    telemetry: TelemetryReader,
    refresh: RefreshReceiver,
    knobs: Arc<Knobs>,
    stats: Arc<DeliveryStats>,
    /// Latest telemetry lap, raw output samples
    history: Vec<i32>,
    spectrum: SpectrumAnalyzer,
    info: StatusInfo,
    selected: usize,
    lag: usize,
    redraws: u64,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        telemetry: TelemetryReader,
        refresh: RefreshReceiver,
        knobs: Arc<Knobs>,
        stats: Arc<DeliveryStats>,
        config: &SynthConfig,
    ) -> Self {
        let telemetry_rate = config.sample_rate / config.telemetry_stride.max(1) as f32;
        Self {
            telemetry,
            refresh,
            knobs,
            stats,
            history: vec![0; TELEMETRY_LEN],
            spectrum: SpectrumAnalyzer::new(TELEMETRY_LEN, telemetry_rate),
            info: StatusInfo::from_config(config),
            selected: 0,
            lag: 0,
            redraws: 0,
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            if self.refresh.take() {
                self.lag = self.telemetry.lag();
                self.telemetry.read_into(&mut self.history);
                let normalized: Vec<f32> = self.history.iter().map(|&v| scope::normalize(v)).collect();
                self.spectrum.update(&normalized);
                self.redraws += 1;
            }

            terminal.draw(|frame| self.render(frame))?;

            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        let coarse = key.modifiers.contains(KeyModifiers::SHIFT);
                        self.handle_key(key.code, coarse);
                    }
                }
            }
        }

        Ok(())
    }

    fn selected_channel(&self) -> ControlChannel {
        ControlChannel::ALL[self.selected]
    }

    fn handle_key(&mut self, key: KeyCode, coarse: bool) {
        let step = if coarse { COARSE_STEP } else { FINE_STEP };
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = (self.selected + CHANNELS - 1) % CHANNELS;
            }
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => {
                self.selected = (self.selected + 1) % CHANNELS;
            }
            KeyCode::Left | KeyCode::Char('h') => self.knobs.nudge(self.selected_channel(), -step),
            KeyCode::Right | KeyCode::Char('l') => self.knobs.nudge(self.selected_channel(), step),
            KeyCode::PageDown => self.knobs.nudge(self.selected_channel(), -COARSE_STEP),
            KeyCode::PageUp => self.knobs.nudge(self.selected_channel(), COARSE_STEP),
            KeyCode::Char(c) => {
                if let Some(digit) = c.to_digit(10) {
                    if (digit as usize) < CHANNELS {
                        self.selected = digit as usize;
                    }
                }
            }
            _ => {}
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),  // Status
                Constraint::Min(10),    // Scope + spectrum
                Constraint::Length(10), // Knobs
                Constraint::Length(1),  // Help
            ])
            .split(area);

        let scope_stats = ScopeStats::from_history(&self.history);
        let health = Health {
            underruns: self.stats.underruns(),
            buffers: self.stats.buffers(),
            lag: self.lag,
            redraws: self.redraws,
        };
        render_status(frame, rows[0], &self.info, &scope_stats, &health);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[1]);
        render_scope(frame, columns[0], &self.history);
        render_spectrum(frame, columns[1], self.spectrum.data());

        render_panel(frame, rows[2], &self.knobs, self.selected);

        let help = Paragraph::new(" [Q] Quit  [↑↓/0-7] Select  [←→] Turn  [Shift/PgUp/PgDn] Coarse")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, rows[3]);
    }
}
