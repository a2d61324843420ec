// src/protocol.rs
//! Wire format between analyzer and renderer.
//!
//! One message type, one line of ASCII per message:
//! `STATE <mode> <note> <level:.2> <glissando:.3> <kick:.2> <snare:.2>\n`

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::mode::Mode;

/// Leading token of every state line.
pub const TAG: &str = "STATE";

/// Tokens in a well-formed line, tag included.
pub const TOKEN_COUNT: usize = 7;

/// Wire value for "no note".
const NO_NOTE: i64 = -1;

/// Why a line was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProtocolError {
    #[error("empty line")]
    Empty,

    #[error("expected 7 tokens, got {0}")]
    TokenCount(usize),

    #[error("unknown tag {0:?}")]
    UnknownTag(String),

    #[error("invalid {field}: {value:?}")]
    InvalidField { field: &'static str, value: String },

    #[error("unknown mode {0}")]
    UnknownMode(i64),

    #[error("note class {0} out of range")]
    NoteOutOfRange(i64),
}

/// Snapshot of analyzer state sent once per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateMessage {
    pub mode: Mode,
    /// Pitch class 0..=11, `None` for no note
    pub note: Option<u8>,
    pub level: f32,
    pub glissando: f32,
    pub kick: f32,
    pub snare: f32,
}

impl StateMessage {
    /// Message with no musical content for `mode`.
    pub fn silent(mode: Mode) -> Self {
        Self {
            mode,
            note: None,
            level: 0.0,
            glissando: 0.0,
            kick: 0.0,
            snare: 0.0,
        }
    }

    /// Encode as a newline-terminated line.
    pub fn to_line(&self) -> String {
        format!("{}\n", self)
    }
}

impl fmt::Display for StateMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let note = self.note.map_or(NO_NOTE, i64::from);
        write!(
            f,
            "{} {} {} {:.2} {:.3} {:.2} {:.2}",
            TAG,
            self.mode.index(),
            note,
            self.level,
            self.glissando,
            self.kick,
            self.snare
        )
    }
}

impl FromStr for StateMessage {
    type Err = ProtocolError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        decode(line)
    }
}

/// Decode one line (without its newline).
pub fn decode(line: &str) -> Result<StateMessage, ProtocolError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.is_empty() {
        return Err(ProtocolError::Empty);
    }
    if tokens.len() != TOKEN_COUNT {
        return Err(ProtocolError::TokenCount(tokens.len()));
    }
    if tokens[0] != TAG {
        return Err(ProtocolError::UnknownTag(tokens[0].to_string()));
    }

    let mode_index = parse_int("mode", tokens[1])?;
    let mode = Mode::from_index(mode_index).ok_or(ProtocolError::UnknownMode(mode_index))?;

    let note = match parse_int("note", tokens[2])? {
        NO_NOTE => None,
        n @ 0..=11 => Some(n as u8),
        n => return Err(ProtocolError::NoteOutOfRange(n)),
    };

    Ok(StateMessage {
        mode,
        note,
        level: parse_float("level", tokens[3])?,
        glissando: parse_float("glissando", tokens[4])?,
        kick: parse_float("kick", tokens[5])?,
        snare: parse_float("snare", tokens[6])?,
    })
}

fn parse_int(field: &'static str, token: &str) -> Result<i64, ProtocolError> {
    token.parse().map_err(|_| ProtocolError::InvalidField {
        field,
        value: token.to_string(),
    })
}

fn parse_float(field: &'static str, token: &str) -> Result<f32, ProtocolError> {
    token
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ProtocolError::InvalidField {
            field,
            value: token.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn music() -> StateMessage {
        StateMessage {
            mode: Mode::Music,
            note: Some(9),
            level: 0.456,
            glissando: -0.1234,
            kick: 1.0,
            snare: 0.25,
        }
    }

    #[test]
    fn encodes_fixed_precision_fields() {
        assert_eq!(music().to_string(), "STATE 0 9 0.46 -0.123 1.00 0.25");
        assert_eq!(music().to_line(), "STATE 0 9 0.46 -0.123 1.00 0.25\n");
    }

    #[test]
    fn silent_music_line() {
        assert_eq!(
            StateMessage::silent(Mode::Music).to_string(),
            "STATE 0 -1 0.00 0.000 0.00 0.00"
        );
    }

    #[test]
    fn decodes_well_formed_line() {
        let msg = decode("STATE 4 -1 0.50 0.000 0.00 0.00").unwrap();
        assert_eq!(msg.mode, Mode::Chase);
        assert_eq!(msg.note, None);
        assert_eq!(msg.level, 0.5);
    }

    #[test]
    fn accepts_integer_floats_and_extra_spacing() {
        // Older analyzers sent bare zeros for the off message
        let msg: StateMessage = "  STATE 2 -1 0 0   0 0 ".parse().unwrap();
        assert_eq!(msg, StateMessage::silent(Mode::Off));
    }

    #[test]
    fn rejects_wrong_token_count() {
        assert_eq!(decode("STATE 0 9 0.5"), Err(ProtocolError::TokenCount(4)));
        assert_eq!(
            decode("STATE 0 9 0.5 0.0 0.0 0.0 extra"),
            Err(ProtocolError::TokenCount(8))
        );
        assert_eq!(decode("   "), Err(ProtocolError::Empty));
    }

    #[test]
    fn rejects_unknown_tag() {
        assert_eq!(
            decode("STAT 0 9 0.5 0.0 0.0 0.0"),
            Err(ProtocolError::UnknownTag("STAT".into()))
        );
    }

    #[test]
    fn rejects_non_numeric_fields() {
        assert!(matches!(
            decode("STATE zero 9 0.5 0.0 0.0 0.0"),
            Err(ProtocolError::InvalidField { field: "mode", .. })
        ));
        assert!(matches!(
            decode("STATE 0 9 loud 0.0 0.0 0.0"),
            Err(ProtocolError::InvalidField { field: "level", .. })
        ));
        assert!(matches!(
            decode("STATE 0 9 0.5 0.0 NaN 0.0"),
            Err(ProtocolError::InvalidField { field: "kick", .. })
        ));
    }

    #[test]
    fn rejects_out_of_range_mode_and_note() {
        assert_eq!(
            decode("STATE 6 -1 0.5 0.0 0.0 0.0"),
            Err(ProtocolError::UnknownMode(6))
        );
        assert_eq!(
            decode("STATE 0 12 0.5 0.0 0.0 0.0"),
            Err(ProtocolError::NoteOutOfRange(12))
        );
    }

    #[test]
    fn round_trip_keeps_wire_precision() {
        let decoded = decode(&music().to_string()).unwrap();
        assert_eq!(decoded.mode, Mode::Music);
        assert_eq!(decoded.note, Some(9));
        assert!((decoded.level - 0.46).abs() < 1e-6);
        assert!((decoded.glissando + 0.123).abs() < 1e-6);
    }
}
