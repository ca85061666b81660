//! Metronome card - tempo, tempo slider, beat light

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph},
    Frame,
};

use practice_companion::{clock::AudioBackend, practice::Metronome, Tempo};

use super::card;

/// Render the metronome card
pub fn render_metronome<B: AudioBackend>(frame: &mut Frame, area: Rect, metronome: &Metronome<B>) {
    let block = card("Metronome");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Tempo readout
            Constraint::Length(1), // Slider
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Play state + beat light
        ])
        .split(inner);

    let tempo = metronome.tempo();
    let readout = Paragraph::new(Line::from(vec![
        Span::styled(
            format!("{}", tempo.bpm()),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" BPM", Style::default().fg(Color::Gray)),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(readout, rows[0]);

    let span = (Tempo::MAX.bpm() - Tempo::MIN.bpm()) as f64;
    let slider = Gauge::default()
        .gauge_style(Style::default().fg(Color::LightBlue))
        .ratio((tempo.bpm() - Tempo::MIN.bpm()) as f64 / span)
        .label(format!("{} ─ {}", Tempo::MIN.bpm(), Tempo::MAX.bpm()));
    frame.render_widget(slider, rows[1]);

    let (label, color) = if metronome.is_running() {
        ("■ Stop", Color::Red)
    } else {
        ("▶ Start", Color::Green)
    };
    let light = if metronome.is_flashing() { "●" } else { "○" };
    let state = Paragraph::new(Line::from(vec![
        Span::styled(label, Style::default().fg(color)),
        Span::raw("   "),
        Span::styled(light, Style::default().fg(Color::Yellow)),
        Span::styled(
            format!("  beat {}", metronome.beat_count()),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(state, rows[3]);
}
