// src/mode.rs
//! Display modes and the analyzer-side mode state machine.

use std::fmt;

use crate::audio::TickFeatures;
use crate::protocol::StateMessage;

/// The six mutually exclusive display modes, in cycling order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    #[default]
    Music,
    Ambient,
    Off,
    Tree,
    Chase,
    Sparkle,
}

impl Mode {
    /// All modes in cycling order.
    pub const ALL: [Mode; 6] = [
        Mode::Music,
        Mode::Ambient,
        Mode::Off,
        Mode::Tree,
        Mode::Chase,
        Mode::Sparkle,
    ];

    /// Wire index of the mode.
    pub fn index(self) -> u8 {
        match self {
            Mode::Music => 0,
            Mode::Ambient => 1,
            Mode::Off => 2,
            Mode::Tree => 3,
            Mode::Chase => 4,
            Mode::Sparkle => 5,
        }
    }

    pub fn from_index(index: i64) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i))
            .copied()
    }

    /// The mode after this one, wrapping from the last to the first.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() as usize + 1) % Self::ALL.len()]
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Music => "Music",
            Mode::Ambient => "Ambient",
            Mode::Off => "Off",
            Mode::Tree => "Tree",
            Mode::Chase => "Chase",
            Mode::Sparkle => "Sparkle",
        }
    }

    /// Shape one tick of features into the message this mode sends.
    ///
    /// Only Music carries the full musical payload; Ambient and the pattern
    /// modes forward the level, Off sends nothing at all.
    pub fn message(self, features: &TickFeatures) -> StateMessage {
        let level = features.spectral.level;
        match self {
            Mode::Music => StateMessage {
                mode: self,
                note: features.pitch.note,
                level,
                glissando: features.pitch.glissando,
                kick: features.envelope.kick,
                snare: features.envelope.snare,
            },
            Mode::Ambient | Mode::Tree | Mode::Chase | Mode::Sparkle => StateMessage {
                level,
                ..StateMessage::silent(self)
            },
            Mode::Off => StateMessage::silent(Mode::Off),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Process-wide current mode on the analyzer side.
#[derive(Debug, Clone, Default)]
pub struct ModeState {
    current: Mode,
}

impl ModeState {
    pub fn new(initial: Mode) -> Self {
        Self { current: initial }
    }

    pub fn current(&self) -> Mode {
        self.current
    }

    /// Handle an "advance mode" event.
    ///
    /// Entering Off yields a message to send right away so the strip goes
    /// dark without waiting for the next tick.
    pub fn advance(&mut self) -> Option<StateMessage> {
        self.current = self.current.next();
        (self.current == Mode::Off).then(|| StateMessage::silent(Mode::Off))
    }

    /// Message for this tick in the current mode.
    pub fn message(&self, features: &TickFeatures) -> StateMessage {
        self.current.message(features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{EnvelopeState, PitchReading, SpectralFeatures};

    fn busy_tick() -> TickFeatures {
        TickFeatures {
            spectral: SpectralFeatures {
                lead_freq: Some(440.0),
                bass: 0.3,
                mid: 0.4,
                high: 0.1,
                level: 0.6,
            },
            pitch: PitchReading {
                note: Some(9),
                glissando: 0.02,
            },
            envelope: EnvelopeState {
                kick: 0.7,
                snare: 0.2,
            },
        }
    }

    #[test]
    fn six_advances_return_to_start() {
        for start in Mode::ALL {
            let mut state = ModeState::new(start);
            for _ in 0..6 {
                state.advance();
            }
            assert_eq!(state.current(), start);
        }
    }

    #[test]
    fn cycle_order() {
        let mut state = ModeState::default();
        let visited: Vec<Mode> = (0..6)
            .map(|_| {
                state.advance();
                state.current()
            })
            .collect();
        assert_eq!(
            visited,
            vec![Mode::Ambient, Mode::Off, Mode::Tree, Mode::Chase, Mode::Sparkle, Mode::Music]
        );
    }

    #[test]
    fn entering_off_emits_blank_message() {
        let mut state = ModeState::new(Mode::Ambient);
        assert_eq!(state.advance(), Some(StateMessage::silent(Mode::Off)));
        assert_eq!(state.advance(), None);
    }

    #[test]
    fn index_round_trips() {
        for mode in Mode::ALL {
            assert_eq!(Mode::from_index(mode.index() as i64), Some(mode));
        }
        assert_eq!(Mode::from_index(-1), None);
        assert_eq!(Mode::from_index(6), None);
    }

    #[test]
    fn music_carries_full_payload() {
        let msg = Mode::Music.message(&busy_tick());
        assert_eq!(msg.note, Some(9));
        assert_eq!(msg.kick, 0.7);
        assert_eq!(msg.snare, 0.2);
        assert_eq!(msg.glissando, 0.02);
    }

    #[test]
    fn other_modes_zero_musical_fields() {
        for mode in [Mode::Ambient, Mode::Tree, Mode::Chase, Mode::Sparkle] {
            let msg = mode.message(&busy_tick());
            assert_eq!(msg.mode, mode);
            assert_eq!(msg.note, None);
            assert_eq!(msg.level, 0.6);
            assert_eq!((msg.glissando, msg.kick, msg.snare), (0.0, 0.0, 0.0));
        }
        assert_eq!(
            Mode::Off.message(&busy_tick()),
            StateMessage::silent(Mode::Off)
        );
    }
}
