// src/render/mod.rs
//! Render module - pixel primitives, mode animations and frame sinks.

pub mod modes;
pub mod pixels;
pub mod sink;

pub use modes::{ModeRenderer, hue_color};
pub use pixels::{PixelBuffer, Rgb};
pub use sink::{HeadlessSink, PixelSink, TerminalStrip};
