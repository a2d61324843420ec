// src/audio/pitch.rs
//! Lead frequency to smoothed pitch class.

use crate::config::PitchConfig;

/// Note names indexed by pitch class.
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Pitch reported for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PitchReading {
    /// 0 (C) to 11 (B), `None` when no note has ever been heard
    pub note: Option<u8>,
    /// Fractional semitone offset of this tick's detection, 0 without one
    pub glissando: f32,
}

/// Continuous MIDI pitch of `freq`, or `None` for non-positive input.
pub fn midi_from_freq(freq: f32, reference_hz: f32) -> Option<f32> {
    if freq > 0.0 && reference_hz > 0.0 {
        Some(69.0 + 12.0 * (freq / reference_hz).log2())
    } else {
        None
    }
}

/// Pitch class of a continuous MIDI pitch.
pub fn class_of(midi: f32) -> u8 {
    (midi.round() as i64).rem_euclid(12) as u8
}

/// Unsmoothed pitch class and glissando of `freq` against A440.
pub fn pitch_class(freq: f32) -> Option<(u8, f32)> {
    midi_from_freq(freq, 440.0).map(|midi| (class_of(midi), midi - midi.round()))
}

/// Exponential pitch smoother.
///
/// Fresh detections are low-passed to hide jitter between neighbouring FFT
/// bins; ticks without one let the smoothed pitch release toward zero.
#[derive(Debug, Clone)]
pub struct PitchTracker {
    smoothed: Option<f32>,
    config: PitchConfig,
}

impl PitchTracker {
    pub fn new(config: PitchConfig) -> Self {
        Self {
            smoothed: None,
            config,
        }
    }

    /// Advance one tick with this tick's lead frequency, if any.
    pub fn update(&mut self, lead_freq: Option<f32>) -> PitchReading {
        let raw = lead_freq.and_then(|f| midi_from_freq(f, self.config.reference_hz));

        match raw {
            Some(midi) => {
                let smoothed = match self.smoothed {
                    Some(prev) => {
                        self.config.smoothing * prev + (1.0 - self.config.smoothing) * midi
                    }
                    None => midi,
                };
                self.smoothed = Some(smoothed);
                PitchReading {
                    note: Some(class_of(smoothed)),
                    glissando: midi - midi.round(),
                }
            }
            None => {
                let note = self.smoothed.map(|prev| {
                    let released = prev * self.config.release;
                    self.smoothed = Some(released);
                    class_of(released)
                });
                PitchReading {
                    note,
                    glissando: 0.0,
                }
            }
        }
    }

    /// Current smoothed MIDI pitch.
    pub fn smoothed(&self) -> Option<f32> {
        self.smoothed
    }

    pub fn reset(&mut self) {
        self.smoothed = None;
    }
}
