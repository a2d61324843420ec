// src/fs/mod.rs
//! Filesystem module - song discovery, type detection and the tempo table.

pub mod detection;
pub mod playlist;
pub mod tempo;

// Re-export commonly used types
pub use detection::{MediaKind, detect_media_kind, is_audio};
pub use playlist::Playlist;
pub use tempo::TempoTable;
