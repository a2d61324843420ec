// src/config/mod.rs
//! Configuration for both processes, loaded from TOML.
//!
//! Every tunable lives here with the defaults the installation was tuned
//! with. Sections missing from the file fall back to those defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Full configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub audio: AudioConfig,
    pub analysis: AnalysisConfig,
    pub envelope: EnvelopeConfig,
    pub pitch: PitchConfig,
    pub transport: TransportConfig,
    pub strip: StripConfig,
    pub player: PlayerConfig,
}

/// Audio stream format and tick rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub sample_rate: u32,
    /// Analyzer ticks per second
    pub fps: u32,
    /// Number of frames kept in the analysis window
    pub analysis_window: usize,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            fps: 40,
            analysis_window: 3,
        }
    }
}

impl AudioConfig {
    /// Samples consumed per tick.
    pub fn frame_size(&self) -> usize {
        (self.sample_rate / self.fps.max(1)) as usize
    }

    /// Length of the rolling audio history.
    pub fn window_samples(&self) -> usize {
        self.frame_size() * self.analysis_window
    }
}

/// Inclusive frequency range in Hz.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub low: f32,
    pub high: f32,
}

impl Band {
    pub const fn new(low: f32, high: f32) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, freq: f32) -> bool {
        freq >= self.low && freq <= self.high
    }
}

/// Spectral analysis tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub bass: Band,
    pub mid: Band,
    pub high: Band,
    /// Minimum peak magnitude in the mid band for a lead frequency
    pub pitch_confidence: f32,
    /// `level = min(1, overall * level_gain)`
    pub level_gain: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            bass: Band::new(40.0, 150.0),
            mid: Band::new(200.0, 2000.0),
            high: Band::new(4000.0, 8000.0),
            pitch_confidence: 0.2,
            level_gain: 4.0,
        }
    }
}

/// Onset thresholds and envelope decay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvelopeConfig {
    pub kick_floor: f32,
    pub kick_multiplier: f32,
    pub snare_floor: f32,
    pub snare_multiplier: f32,
    /// Per-tick multiplicative decay when no onset fires
    pub decay: f32,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            kick_floor: 0.01,
            kick_multiplier: 1.6,
            snare_floor: 0.01,
            snare_multiplier: 1.4,
            decay: 0.85,
        }
    }
}

/// Pitch smoothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PitchConfig {
    pub reference_hz: f32,
    /// Weight of the previous smoothed value on a fresh detection
    pub smoothing: f32,
    /// Multiplier applied to the smoothed pitch on ticks without a detection
    pub release: f32,
}

impl Default for PitchConfig {
    fn default() -> Self {
        Self {
            reference_hz: 440.0,
            smoothing: 0.75,
            release: 0.9,
        }
    }
}

/// Local socket between the two processes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    pub socket_path: PathBuf,
    /// Renderer poll cadence
    pub poll_interval_ms: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            socket_path: PathBuf::from("/tmp/musical_lights.sock"),
            poll_interval_ms: 10,
        }
    }
}

/// LED strip geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StripConfig {
    pub led_count: usize,
}

impl Default for StripConfig {
    fn default() -> Self {
        Self { led_count: 300 }
    }
}

/// Playlist and external decoder settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub songs_dir: PathBuf,
    pub tempo_table: PathBuf,
    /// Decoder executable
    pub ffmpeg: PathBuf,
    /// ALSA output device; `None` decodes for analysis only
    pub audio_device: Option<String>,
    pub debounce_ms: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            songs_dir: PathBuf::from("songs"),
            tempo_table: PathBuf::from("bpm_table.json"),
            ffmpeg: PathBuf::from("ffmpeg"),
            audio_device: Some("plughw:CARD=Headphones,DEV=0".to_string()),
            debounce_ms: 50,
        }
    }
}

impl Config {
    /// Parse a configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the explicit path if given, else the per-user file if it exists,
    /// else the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match default_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }
}

/// `<config_dir>/musical-lights/config.toml`
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("musical-lights").join("config.toml"))
}
