//! TUI module for practice
//!
//! One card per widget in a 3x2 grid, a status line and a help bar.

mod metronome;
mod notes;
mod trainers;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::app::App;

use metronome::render_metronome;
use notes::render_notes;
use trainers::{render_pitch, render_stopwatch, render_symbols, render_warmup};

/// Bordered card with a title; every widget sits in one.
pub(crate) fn card(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {title} "))
        .title_style(Style::default().fg(Color::LightBlue))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
}

/// Render the whole UI
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),  // Header
            Constraint::Min(8),     // Top row
            Constraint::Min(8),     // Bottom row
            Constraint::Length(1),  // Status
            Constraint::Length(1),  // Help bar
        ])
        .split(area);

    let header = Paragraph::new(" Practice Companion")
        .style(Style::default().fg(Color::LightBlue));
    frame.render_widget(header, chunks[0]);

    let [metronome, stopwatch, warmup] = columns(chunks[1]);
    render_metronome(frame, metronome, &app.metronome);
    render_stopwatch(frame, stopwatch, &app.stopwatch);
    render_warmup(frame, warmup, &app.warmup);

    let [pitch, symbols, notes] = columns(chunks[2]);
    render_pitch(frame, pitch, &app.pitch);
    render_symbols(frame, symbols, &app.symbols);
    render_notes(frame, notes, &app.recent_notes, app.note_input.as_deref());

    if let Some(status) = &app.status {
        let line = Paragraph::new(format!(" {status}"))
            .style(Style::default().fg(Color::Yellow));
        frame.render_widget(line, chunks[3]);
    }

    let help = Paragraph::new(Line::from(help_text(app.note_input.is_some())))
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[4]);
}

fn columns(area: Rect) -> [Rect; 3] {
    let split = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);
    [split[0], split[1], split[2]]
}

fn help_text(typing: bool) -> &'static str {
    if typing {
        " [Enter] Save note  [Esc] Cancel"
    } else {
        " [Q] Quit  [Space] Metronome  [↑↓/PgUp PgDn] Tempo  [T/R] Timer  [W] Warmup  \
         [P] Pitch  [1-0 - =] Guess  [O] Replay  [V/N] Symbols  [I] Note"
    }
}
