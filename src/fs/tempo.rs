// src/fs/tempo.rs
//! Pre-computed tempo lookup, keyed by track file name.
//!
//! The table is written by an offline tempo estimator as
//! `{ "<file name>": { "bpm": <f64> } }`.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::{debug, warn};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
struct TempoEntry {
    #[serde(default)]
    bpm: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct TempoTable {
    entries: HashMap<String, TempoEntry>,
}

impl TempoTable {
    pub fn parse(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Load from `path`. A missing or unreadable table is empty.
    pub fn load(path: &Path) -> Self {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                debug!("No tempo table at {}: {}", path.display(), e);
                return Self::default();
            }
        };
        match Self::parse(&text) {
            Ok(table) => {
                debug!("Loaded {} tempo entries", table.len());
                table
            }
            Err(e) => {
                warn!("Ignoring tempo table {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tempo of the track named `name`, if known and positive.
    pub fn bpm(&self, name: &str) -> Option<f64> {
        self.entries
            .get(name)
            .and_then(|e| e.bpm)
            .filter(|bpm| bpm.is_finite() && *bpm > 0.0)
    }

    /// Tempo of the track at `path`, looked up by its file name.
    pub fn bpm_for(&self, path: &Path) -> Option<f64> {
        path.file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| self.bpm(n))
    }
}
