// src/ui/widgets/strip.rs
//! LED strip preview: one coloured block per pixel, wrapped row by row.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Color,
    widgets::Widget,
};

use crate::render::{PixelBuffer, Rgb};

const CELL: &str = "█";

pub struct StripView<'a> {
    pixels: &'a PixelBuffer,
}

impl<'a> StripView<'a> {
    pub fn new(pixels: &'a PixelBuffer) -> Self {
        Self { pixels }
    }
}

fn cell_color(p: Rgb) -> Color {
    Color::Rgb(p.r, p.g, p.b)
}

impl Widget for StripView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let width = area.width as usize;
        for (i, &p) in self.pixels.pixels().iter().enumerate() {
            let row = i / width;
            if row >= area.height as usize {
                break;
            }
            let x = area.x + (i % width) as u16;
            let y = area.y + row as u16;
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_symbol(CELL).set_fg(cell_color(p));
            }
        }
    }
}
