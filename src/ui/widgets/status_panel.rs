// src/ui/widgets/status_panel.rs
//! Analyzer status panel widget.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
};

use crate::audio::pitch::NOTE_NAMES;
use crate::protocol::StateMessage;
use crate::ui::layout::status_layout;
use crate::ui::status::StatusLines;

/// Render the three status lines and the live meters.
pub fn render_status_panel(
    f: &mut Frame<'_>,
    area: Rect,
    lines: &StatusLines,
    latest: Option<&StateMessage>,
) {
    let title = latest.map_or_else(
        || " Musical Lights ".to_string(),
        |msg| format!(" Musical Lights: {} ", msg.mode),
    );
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let layout = status_layout(inner);

    let text: Vec<Line> = lines
        .lines()
        .iter()
        .enumerate()
        .map(|(i, l)| {
            if i == 0 {
                Line::from(Span::styled(
                    l.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(l.clone())
            }
        })
        .collect();
    f.render_widget(Paragraph::new(text), layout.text);

    let (level, kick, snare) = latest.map_or((0.0, 0.0, 0.0), |m| (m.level, m.kick, m.snare));
    let meters = [
        ("level", level, Color::Magenta),
        ("kick", kick, Color::Yellow),
        ("snare", snare, Color::Cyan),
    ];
    for ((label, value, color), area) in meters.into_iter().zip(layout.meters) {
        f.render_widget(
            Gauge::default()
                .gauge_style(Style::default().fg(color))
                .ratio(f64::from(value).clamp(0.0, 1.0))
                .label(label),
            area,
        );
    }

    let note = latest
        .and_then(|m| m.note)
        .map(|n| NOTE_NAMES[n as usize % 12])
        .unwrap_or("-");
    let help = Line::from(vec![
        Span::styled(format!(" {} ", note), Style::default().fg(Color::Green)),
        Span::raw(" m mode  n/p track  space pause  q quit"),
    ]);
    f.render_widget(
        Paragraph::new(help).alignment(Alignment::Center),
        layout.help,
    );
}
