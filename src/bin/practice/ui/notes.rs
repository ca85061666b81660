//! Practice log card - recent notes and the input line

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use practice_companion::practice::NoteEntry;

use super::card;

pub fn render_notes(frame: &mut Frame, area: Rect, recent: &[NoteEntry], input: Option<&str>) {
    let mut lines = Vec::new();

    match input {
        Some(text) => lines.push(Line::from(vec![
            Span::styled("> ", Style::default().fg(Color::LightBlue)),
            Span::raw(text.to_owned()),
            Span::styled("_", Style::default().fg(Color::LightBlue)),
        ])),
        None => lines.push(Line::from(Span::styled(
            "[I] add a note",
            Style::default().fg(Color::DarkGray),
        ))),
    }

    if recent.is_empty() {
        lines.push(Line::from(Span::styled(
            "No notes yet",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for entry in recent {
        lines.push(Line::from(vec![
            Span::styled(format!("#{} ", entry.id), Style::default().fg(Color::DarkGray)),
            Span::raw(entry.text.clone()),
        ]));
    }

    let body = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(card("Notes"));
    frame.render_widget(body, area);
}
