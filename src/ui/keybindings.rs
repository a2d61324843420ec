// src/ui/keybindings.rs
//! Keyboard input handling and key mappings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::input::ControlEvent;

/// Raw mode swallows SIGINT, so Ctrl+C has to be mapped by hand.
fn is_interrupt(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c'))
}

/// Convert a key event to a control event.
pub fn key_to_event(key: &KeyEvent) -> Option<ControlEvent> {
    if is_interrupt(key) {
        return Some(ControlEvent::Quit);
    }

    match key.code {
        KeyCode::Char('m') | KeyCode::Char('M') => Some(ControlEvent::AdvanceMode),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Right => Some(ControlEvent::NextTrack),
        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Left => {
            Some(ControlEvent::PreviousTrack)
        }
        KeyCode::Char(' ') => Some(ControlEvent::TogglePlayPause),
        KeyCode::Char('q') | KeyCode::Esc => Some(ControlEvent::Quit),
        _ => None,
    }
}
