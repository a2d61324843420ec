// src/audio/mod.rs
//! Audio module - decoding boundary, feature extraction and track metadata.

pub mod analyzer;
pub mod decoder;
pub mod envelope;
pub mod history;
pub mod metadata;
pub mod pipeline;
pub mod pitch;

// Re-export commonly used types
pub use analyzer::{SpectralAnalyzer, SpectralFeatures};
pub use decoder::DecoderProcess;
pub use envelope::{EnvelopeState, RhythmEnvelope};
pub use history::AudioHistory;
pub use metadata::{TrackInfo, display_name, load_track_info};
pub use pipeline::{FeaturePipeline, TickFeatures};
pub use pitch::{PitchReading, PitchTracker};
