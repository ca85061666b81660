//! Stopwatch, warmup, pitch trainer and symbols cards

use rand::Rng;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use practice_companion::{
    clock::AudioBackend,
    practice::{
        pitch::guess_choices, PitchTrainer, Stopwatch, SymbolsDeck, TrainerStatus, Verdict,
        WarmupPicker,
    },
};

use super::{super::app::GUESS_KEYS, card};

pub fn render_stopwatch(frame: &mut Frame, area: Rect, stopwatch: &Stopwatch) {
    let state = if stopwatch.is_running() {
        Span::styled("running", Style::default().fg(Color::Green))
    } else {
        Span::styled("paused", Style::default().fg(Color::Yellow))
    };

    let body = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            stopwatch.display(),
            Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(state),
    ])
    .alignment(Alignment::Center)
    .block(card("Timer"));
    frame.render_widget(body, area);
}

pub fn render_warmup<R: Rng>(frame: &mut Frame, area: Rect, warmup: &WarmupPicker<R>) {
    let body = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            warmup.current(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(card("Warmup"));
    frame.render_widget(body, area);
}

pub fn render_pitch<B: AudioBackend, R: Rng>(
    frame: &mut Frame,
    area: Rect,
    pitch: &PitchTrainer<B, R>,
) {
    let mut lines = Vec::new();

    match pitch.status() {
        TrainerStatus::Ready => {
            lines.push(Line::from(""));
            lines.push(Line::from("Press [P] to hear a note"));
        }
        TrainerStatus::Guessing => {
            // Four buttons per row, like the answer grid
            for row in guess_choices().chunks(4).zip(GUESS_KEYS.chunks(4)) {
                let spans: Vec<Span> = row
                    .0
                    .iter()
                    .zip(row.1)
                    .map(|(note, key)| {
                        Span::styled(
                            format!("[{key}] {:<4}", note.name),
                            Style::default().fg(Color::Gray),
                        )
                    })
                    .collect();
                lines.push(Line::from(spans));
            }

            let verdict = match pitch.verdict() {
                Some(v @ Verdict::Correct) => {
                    Span::styled(v.to_string(), Style::default().fg(Color::Green))
                }
                Some(v @ Verdict::Wrong { .. }) => {
                    Span::styled(v.to_string(), Style::default().fg(Color::Red))
                }
                None => Span::raw("Which note was it?  [O] replay"),
            };
            lines.push(Line::from(""));
            lines.push(Line::from(verdict));
        }
    }

    let body = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(card("Pitch Trainer"));
    frame.render_widget(body, area);
}

pub fn render_symbols<R: Rng>(frame: &mut Frame, area: Rect, symbols: &SymbolsDeck<R>) {
    let card_face = symbols.card();
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            card_face.term,
            Style::default()
                .fg(Color::LightMagenta)
                .add_modifier(Modifier::BOLD | Modifier::ITALIC),
        )),
    ];
    match symbols.definition() {
        Some(definition) => lines.push(Line::from(Span::styled(
            definition,
            Style::default().fg(Color::Gray),
        ))),
        None => lines.push(Line::from(Span::styled(
            "[V] reveal",
            Style::default().fg(Color::DarkGray),
        ))),
    }

    let body = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(card("Symbols"));
    frame.render_widget(body, area);
}
