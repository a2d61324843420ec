// src/fs/playlist.rs
//! Sorted, wrapping list of the tracks in the songs directory.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use super::detection::is_audio;
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct Playlist {
    dir: PathBuf,
    tracks: Vec<PathBuf>,
    index: usize,
}

impl Playlist {
    /// Empty playlist over `dir`. Call [`Playlist::scan`] to fill it.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            tracks: Vec::new(),
            index: 0,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Re-read the directory. The current track stays current if it is
    /// still there. Returns the number of tracks found.
    pub fn scan(&mut self) -> Result<usize> {
        let current = self.current().map(Path::to_path_buf);

        let mut tracks: Vec<PathBuf> = fs::read_dir(&self.dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| is_audio(p))
            .collect();
        tracks.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        debug!("{} tracks in {}", tracks.len(), self.dir.display());

        self.index = current
            .and_then(|c| tracks.iter().position(|t| *t == c))
            .unwrap_or(0);
        self.tracks = tracks;
        Ok(self.tracks.len())
    }

    pub fn tracks(&self) -> &[PathBuf] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&Path> {
        self.tracks.get(self.index).map(PathBuf::as_path)
    }

    /// Step forward one track, wrapping to the first.
    pub fn next(&mut self) {
        if !self.tracks.is_empty() {
            self.index = (self.index + 1) % self.tracks.len();
        }
    }

    /// Step back one track, wrapping to the last.
    pub fn previous(&mut self) {
        if !self.tracks.is_empty() {
            self.index = (self.index + self.tracks.len() - 1) % self.tracks.len();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn songs(names: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for name in names {
            fs::write(dir.path().join(name), b"data").unwrap();
        }
        dir
    }

    fn names(p: &Playlist) -> Vec<String> {
        p.tracks()
            .iter()
            .map(|t| t.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn scan_keeps_sorted_audio_only() {
        let dir = songs(&["b.mp3", "a.flac", "cover.jpg", "readme.txt", "c.wav"]);
        let mut p = Playlist::new(dir.path());
        assert_eq!(p.scan().unwrap(), 3);
        assert_eq!(names(&p), vec!["a.flac", "b.mp3", "c.wav"]);
    }

    #[test]
    fn next_and_previous_wrap() {
        let dir = songs(&["1.mp3", "2.mp3", "3.mp3"]);
        let mut p = Playlist::new(dir.path());
        p.scan().unwrap();
        p.previous();
        assert_eq!(p.index(), 2);
        p.next();
        assert_eq!(p.index(), 0);
        p.next();
        assert_eq!(p.index(), 1);
    }

    #[test]
    fn rescan_keeps_current_track() {
        let dir = songs(&["b.mp3", "c.mp3"]);
        let mut p = Playlist::new(dir.path());
        p.scan().unwrap();
        p.next();
        fs::write(dir.path().join("a.mp3"), b"data").unwrap();
        p.scan().unwrap();
        assert_eq!(p.current().unwrap().file_name().unwrap(), "c.mp3");
        assert_eq!(p.index(), 2);
    }

    #[test]
    fn empty_directory() {
        let dir = songs(&[]);
        let mut p = Playlist::new(dir.path());
        assert_eq!(p.scan().unwrap(), 0);
        assert!(p.current().is_none());
        p.next();
        p.previous();
        assert_eq!(p.index(), 0);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let mut p = Playlist::new("/nonexistent/musical-lights/songs");
        assert!(p.scan().is_err());
    }
}
