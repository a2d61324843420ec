// src/audio/pipeline.rs
//! Per-track feature pipeline: history → spectrum → pitch + envelopes.

use crate::config::Config;

use super::analyzer::{SpectralAnalyzer, SpectralFeatures};
use super::envelope::{EnvelopeState, RhythmEnvelope};
use super::history::AudioHistory;
use super::pitch::{PitchReading, PitchTracker};

/// Everything the analyzer knows after one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickFeatures {
    pub spectral: SpectralFeatures,
    pub pitch: PitchReading,
    pub envelope: EnvelopeState,
}

/// Owns all analysis state for one playback session.
///
/// Build a fresh one per track; nothing carries over between songs.
pub struct FeaturePipeline {
    history: AudioHistory,
    analyzer: SpectralAnalyzer,
    envelope: RhythmEnvelope,
    pitch: PitchTracker,
    /// Reused normalized copy of the history
    window: Vec<f32>,
}

impl FeaturePipeline {
    pub fn new(config: &Config) -> Self {
        let window_samples = config.audio.window_samples();
        Self {
            history: AudioHistory::new(window_samples),
            analyzer: SpectralAnalyzer::new(config.audio.sample_rate, config.analysis.clone()),
            envelope: RhythmEnvelope::new(config.audio.fps as usize, config.envelope.clone()),
            pitch: PitchTracker::new(config.pitch.clone()),
            window: Vec::with_capacity(window_samples),
        }
    }

    /// Roll `frame` into the history and analyze the whole window.
    pub fn process(&mut self, frame: &[i16]) -> TickFeatures {
        self.history.push_frame(frame);
        self.history.normalized_into(&mut self.window);

        let spectral = self.analyzer.analyze(&self.window);
        let envelope = self.envelope.update(spectral.bass, spectral.mid);
        let pitch = self.pitch.update(spectral.lead_freq);

        TickFeatures {
            spectral,
            pitch,
            envelope,
        }
    }
}
