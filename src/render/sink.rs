// src/render/sink.rs
//! Where finished frames go.

use log::debug;
use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::pixels::PixelBuffer;
use crate::error::Result;
use crate::ui::layout::strip_layout;
use crate::ui::tui::TerminalSession;
use crate::ui::widgets::StripView;

/// Receiver of one complete frame per rendered message.
pub trait PixelSink {
    fn push(&mut self, pixels: &PixelBuffer) -> Result<()>;

    /// Short status text, for sinks that can show it.
    fn annotate(&mut self, _caption: &str) {}
}

/// Sink that keeps only the last frame and a count.
#[derive(Debug, Default)]
pub struct HeadlessSink {
    frames: u64,
    last: Option<PixelBuffer>,
}

impl HeadlessSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_frame(&self) -> Option<&PixelBuffer> {
        self.last.as_ref()
    }
}

impl PixelSink for HeadlessSink {
    fn push(&mut self, pixels: &PixelBuffer) -> Result<()> {
        self.frames += 1;
        match &mut self.last {
            Some(last) => last.clone_from(pixels),
            None => self.last = Some(pixels.clone()),
        }
        if self.frames % 1000 == 0 {
            debug!("{} frames pushed", self.frames);
        }
        Ok(())
    }
}

/// Terminal preview of the strip.
pub struct TerminalStrip {
    session: TerminalSession,
    frames: u64,
    caption: String,
}

impl TerminalStrip {
    pub fn new(session: TerminalSession) -> Self {
        Self {
            session,
            frames: 0,
            caption: "waiting for analyzer".to_string(),
        }
    }

}

impl PixelSink for TerminalStrip {
    fn annotate(&mut self, caption: &str) {
        caption.clone_into(&mut self.caption);
    }

    fn push(&mut self, pixels: &PixelBuffer) -> Result<()> {
        self.frames += 1;
        let frames = self.frames;
        let caption = &self.caption;
        self.session.draw(|f| {
            let block = Block::default()
                .borders(Borders::ALL)
                .title(format!(" Strip: {} LEDs ", pixels.len()));
            let area = f.area();
            let inner = block.inner(area);
            f.render_widget(block, area);

            let layout = strip_layout(inner);
            f.render_widget(StripView::new(pixels), layout.strip);

            let footer = Line::from(vec![
                Span::styled(format!(" frame {} ", frames), Style::default().fg(Color::DarkGray)),
                Span::raw(caption.as_str()),
            ]);
            f.render_widget(Paragraph::new(footer), layout.footer);
        })?;
        Ok(())
    }
}
