// src/lib.rs
//! musical-lights library: audio analysis, state protocol and LED rendering.

pub mod app;
pub mod audio;
pub mod cli;
pub mod config;
pub mod error;
pub mod fs;
pub mod mode;
pub mod protocol;
pub mod render;
pub mod transport;
pub mod ui;

pub use error::{Error, Result};
