// src/ui/widgets/mod.rs
//! Custom widgets for the terminal UI.

pub mod status_panel;
pub mod strip;

// Re-export widget rendering functions
pub use status_panel::render_status_panel;
pub use strip::StripView;
