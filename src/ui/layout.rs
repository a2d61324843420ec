// src/ui/layout.rs
//! Layout computation for the UI panels.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Areas of the analyzer status panel.
pub struct StatusLayout {
    /// The three status lines
    pub text: Rect,
    /// Level, kick and snare gauges, top to bottom
    pub meters: [Rect; 3],
    pub help: Rect,
}

/// Areas of the renderer strip preview.
pub struct StripLayout {
    pub strip: Rect,
    pub footer: Rect,
}

/// Split the inner area of the status block.
pub fn status_layout(area: Rect) -> StatusLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    StatusLayout {
        text: rows[0],
        meters: [rows[1], rows[2], rows[3]],
        help: rows[5],
    }
}

/// Reserve one footer line under the strip.
pub fn strip_layout(area: Rect) -> StripLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    StripLayout {
        strip: rows[0],
        footer: rows[1],
    }
}
