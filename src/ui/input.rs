// src/ui/input.rs
//! Discrete control events and where they come from.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};

use super::keybindings::key_to_event;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlEvent {
    AdvanceMode,
    NextTrack,
    PreviousTrack,
    TogglePlayPause,
    Quit,
}

/// Source of control events, polled once per loop iteration.
pub trait ControlInput {
    /// Events that occurred since the last poll. Never blocks.
    fn poll(&mut self) -> Result<Vec<ControlEvent>>;
}

/// Rejects repeats of the same event closer together than `min_gap`.
#[derive(Debug)]
pub struct Debouncer {
    min_gap: Duration,
    last: HashMap<ControlEvent, Instant>,
}

impl Debouncer {
    pub fn new(min_gap: Duration) -> Self {
        Self {
            min_gap,
            last: HashMap::new(),
        }
    }

    /// Whether `event` at `now` counts. Rejected repeats do not extend the gap.
    pub fn accept(&mut self, event: ControlEvent, now: Instant) -> bool {
        let ready = self
            .last
            .get(&event)
            .is_none_or(|&prev| now.saturating_duration_since(prev) >= self.min_gap);
        if ready {
            self.last.insert(event, now);
        }
        ready
    }
}

/// Keyboard of the controlling terminal. Needs raw mode to see single keys.
pub struct KeyboardInput {
    debouncer: Debouncer,
}

impl KeyboardInput {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debouncer: Debouncer::new(debounce),
        }
    }
}

impl ControlInput for KeyboardInput {
    fn poll(&mut self) -> Result<Vec<ControlEvent>> {
        let mut events = Vec::new();
        while event::poll(Duration::ZERO)? {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if let Some(ev) = key_to_event(&key) {
                if self.debouncer.accept(ev, Instant::now()) {
                    events.push(ev);
                }
            }
        }
        Ok(events)
    }
}

/// No controls at all (headless runs stop on a signal).
#[derive(Debug, Default)]
pub struct NoInput;

impl ControlInput for NoInput {
    fn poll(&mut self) -> Result<Vec<ControlEvent>> {
        Ok(Vec::new())
    }
}
