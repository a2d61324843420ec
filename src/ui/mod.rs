// src/ui/mod.rs
//! UI module - control input, status display and the terminal front end.

pub mod input;
pub mod keybindings;
pub mod layout;
pub mod status;
pub mod tui;
pub mod widgets;

pub use input::{ControlEvent, ControlInput, Debouncer, KeyboardInput, NoInput};
pub use status::{LogStatus, StatusDisplay, StatusLines, TuiStatus};
pub use tui::TerminalSession;
