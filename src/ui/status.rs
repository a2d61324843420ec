// src/ui/status.rs
//! Three-line status display for the analyzer.
//!
//! Showing status is fire and forget: implementations swallow their own
//! failures so a broken display never interrupts analysis.

use std::time::{Duration, Instant};

use log::{debug, info};

use super::tui::TerminalSession;
use super::widgets::render_status_panel;
use crate::audio::metadata::{DISPLAY_NAME_LEN, truncate};
use crate::mode::Mode;
use crate::protocol::StateMessage;

/// Minimum time between redraws triggered only by meter changes.
const METER_REFRESH: Duration = Duration::from_millis(50);

/// The three short text lines.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusLines([String; 3]);

impl StatusLines {
    pub fn new(first: impl Into<String>, second: impl Into<String>, third: impl Into<String>) -> Self {
        Self([first.into(), second.into(), third.into()])
    }

    pub fn lines(&self) -> &[String; 3] {
        &self.0
    }

    pub fn no_songs() -> Self {
        Self::new("No songs", "", "")
    }

    /// Track start. The last line shows the tempo when known, else the mode.
    pub fn playing(track: &str, bpm: Option<f64>, mode: Mode) -> Self {
        let third = match bpm {
            Some(bpm) => format!("BPM: {:.0}", bpm),
            None => mode.name().to_string(),
        };
        Self::new("Playing:", truncate(track, DISPLAY_NAME_LEN), third)
    }

    pub fn mode_changed(mode: Mode, track: &str) -> Self {
        Self::new("Mode:", mode.name(), truncate(track, DISPLAY_NAME_LEN))
    }

    pub fn paused(track: &str) -> Self {
        Self::new("Paused", truncate(track, DISPLAY_NAME_LEN), "")
    }

    pub fn resumed(track: &str, mode: Mode) -> Self {
        Self::new("Playing", truncate(track, DISPLAY_NAME_LEN), mode.name())
    }
}

pub trait StatusDisplay {
    /// Replace the shown text.
    fn show(&mut self, lines: &StatusLines);

    /// Latest outgoing state, for displays that visualize it.
    fn meters(&mut self, _msg: &StateMessage) {}
}

/// Status lines written to the log, once per change.
#[derive(Debug, Default)]
pub struct LogStatus {
    last: Option<StatusLines>,
}

impl LogStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&StatusLines> {
        self.last.as_ref()
    }
}

impl StatusDisplay for LogStatus {
    fn show(&mut self, lines: &StatusLines) {
        if self.last.as_ref() == Some(lines) {
            return;
        }
        let [a, b, c] = lines.lines();
        info!("{} {} {}", a, b, c);
        self.last = Some(lines.clone());
    }
}

/// Status panel drawn in the terminal.
pub struct TuiStatus {
    session: TerminalSession,
    lines: StatusLines,
    latest: Option<StateMessage>,
    last_draw: Option<Instant>,
}

impl TuiStatus {
    pub fn new(session: TerminalSession) -> Self {
        Self {
            session,
            lines: StatusLines::default(),
            latest: None,
            last_draw: None,
        }
    }

    fn redraw(&mut self) {
        let lines = &self.lines;
        let latest = self.latest.as_ref();
        if let Err(e) = self.session.draw(|f| {
            let area = f.area();
            render_status_panel(f, area, lines, latest);
        }) {
            debug!("Status draw failed: {}", e);
        }
        self.last_draw = Some(Instant::now());
    }
}

impl StatusDisplay for TuiStatus {
    fn show(&mut self, lines: &StatusLines) {
        self.lines = lines.clone();
        self.redraw();
    }

    fn meters(&mut self, msg: &StateMessage) {
        self.latest = Some(*msg);
        if self.last_draw.is_none_or(|t| t.elapsed() >= METER_REFRESH) {
            self.redraw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playing_prefers_tempo_over_mode() {
        let with_bpm = StatusLines::playing("song.mp3", Some(127.6), Mode::Music);
        assert_eq!(with_bpm.lines()[2], "BPM: 128");
        let without = StatusLines::playing("song.mp3", None, Mode::Chase);
        assert_eq!(without.lines()[2], "Chase");
    }

    #[test]
    fn track_names_are_truncated() {
        let lines = StatusLines::paused("a_very_long_track_name.mp3");
        assert_eq!(lines.lines()[1], "a_very_long_tra");
    }

    #[test]
    fn log_status_remembers_last_lines() {
        let mut status = LogStatus::new();
        status.show(&StatusLines::no_songs());
        status.show(&StatusLines::no_songs());
        assert_eq!(status.last(), Some(&StatusLines::no_songs()));
    }
}
