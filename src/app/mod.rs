// src/app/mod.rs
//! Application module - the analyzer and renderer control loops.

pub mod analyzer;
pub mod renderer;

pub use analyzer::{Analyzer, TrackEnd};
pub use renderer::Renderer;
