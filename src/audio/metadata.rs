// src/audio/metadata.rs
//! Track metadata extraction using Lofty.

use std::path::Path;

use anyhow::Result;
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::probe::Probe;
use lofty::tag::Accessor;

/// Longest track name the status display can show.
pub const DISPLAY_NAME_LEN: usize = 15;

/// Tag data for the current track.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackInfo {
    pub title: Option<String>,
    pub artist: Option<String>,
    /// Total track length in seconds.
    pub duration_secs: u64,
}

/// Read tags and duration from an audio file.
pub fn load_track_info(path: &Path) -> Result<TrackInfo> {
    let tagged_file = Probe::open(path)?.read()?;

    let (title, artist) = match tagged_file.primary_tag() {
        Some(tag) => (
            tag.title().map(|t| t.trim().to_string()).filter(|t| !t.is_empty()),
            tag.artist().map(|a| a.trim().to_string()).filter(|a| !a.is_empty()),
        ),
        None => (None, None),
    };

    Ok(TrackInfo {
        title,
        artist,
        duration_secs: tagged_file.properties().duration().as_secs(),
    })
}

/// Short name for the status display: tag title, else the file name.
pub fn display_name(path: &Path) -> String {
    let name = load_track_info(path)
        .ok()
        .and_then(|info| info.title)
        .unwrap_or_else(|| {
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        });
    truncate(&name, DISPLAY_NAME_LEN)
}

/// First `max` characters of `s`, respecting UTF-8 boundaries.
pub fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untagged_file_falls_back_to_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Jingle Bell Rock.mp3");
        std::fs::write(&path, b"not really audio").unwrap();
        assert_eq!(display_name(&path), "Jingle Bell Roc");
    }

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate("Noël", 3), "Noë");
        assert_eq!(truncate("abc", 15), "abc");
    }
}
