// src/audio/envelope.rs
//! Adaptive-threshold onset follower producing kick and snare envelopes.

use ringbuf::{HeapRb, traits::*};

use crate::config::EnvelopeConfig;

/// Decaying onset indicators, both in [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EnvelopeState {
    pub kick: f32,
    pub snare: f32,
}

/// Rolling window of past band energies.
struct EnergyHistory {
    ring: HeapRb<f32>,
}

impl EnergyHistory {
    fn new(capacity: usize) -> Self {
        Self {
            ring: HeapRb::new(capacity.max(1)),
        }
    }

    fn push(&mut self, energy: f32) {
        self.ring.push_overwrite(energy);
    }

    fn mean(&self) -> f32 {
        let count = self.ring.occupied_len();
        if count == 0 {
            return 0.0;
        }
        self.ring.iter().sum::<f32>() / count as f32
    }

    fn clear(&mut self) {
        self.ring.clear();
    }
}

/// Kick (bass band) and snare (mid band) onset detector.
///
/// An onset fires when the current energy beats both an absolute floor and a
/// multiple of the last second's mean, so quiet and loud passages both
/// trigger.
pub struct RhythmEnvelope {
    bass_history: EnergyHistory,
    mid_history: EnergyHistory,
    state: EnvelopeState,
    config: EnvelopeConfig,
}

impl RhythmEnvelope {
    /// `history_len` is the number of ticks in one second.
    pub fn new(history_len: usize, config: EnvelopeConfig) -> Self {
        Self {
            bass_history: EnergyHistory::new(history_len),
            mid_history: EnergyHistory::new(history_len),
            state: EnvelopeState::default(),
            config,
        }
    }

    /// Feed one tick of band energies and return the updated envelopes.
    pub fn update(&mut self, bass: f32, mid: f32) -> EnvelopeState {
        self.bass_history.push(bass);
        self.mid_history.push(mid);

        let kick_onset = is_onset(
            bass,
            self.bass_history.mean(),
            self.config.kick_floor,
            self.config.kick_multiplier,
        );
        let snare_onset = is_onset(
            mid,
            self.mid_history.mean(),
            self.config.snare_floor,
            self.config.snare_multiplier,
        );

        self.state.kick = step(self.state.kick, kick_onset, self.config.decay);
        self.state.snare = step(self.state.snare, snare_onset, self.config.decay);
        self.state
    }

    pub fn state(&self) -> EnvelopeState {
        self.state
    }

    /// Forget all history, as at the start of a new track.
    pub fn reset(&mut self) {
        self.bass_history.clear();
        self.mid_history.clear();
        self.state = EnvelopeState::default();
    }
}

fn is_onset(energy: f32, mean: f32, floor: f32, multiplier: f32) -> bool {
    mean > 0.0 && energy > floor.max(multiplier * mean)
}

fn step(value: f32, onset: bool, decay: f32) -> f32 {
    let next = if onset { 1.0 } else { value * decay };
    next.clamp(0.0, 1.0)
}
