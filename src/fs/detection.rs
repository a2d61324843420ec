// src/fs/detection.rs
//! Audio file detection using magic numbers and extension-based fallback.

use std::{fmt, io, path::Path};

use infer::{Infer, MatcherType};
use mime_guess::MimeGuess;

/// What a directory entry holds, as far as the player cares.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum MediaKind {
    Audio,
    Video,
    Other,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MediaKind::Audio => "Audio",
            MediaKind::Video => "Video",
            MediaKind::Other => "Other",
        };
        write!(f, "{}", s)
    }
}

/// Detect the media kind of a file.
pub fn detect_media_kind(path: &Path) -> io::Result<MediaKind> {
    // 1. Try magic-number sniffing
    if let Some(kind) = Infer::new().get_from_path(path)? {
        return Ok(match kind.matcher_type() {
            MatcherType::Audio => MediaKind::Audio,
            MatcherType::Video => MediaKind::Video,
            _ => MediaKind::Other,
        });
    }

    // 2. Fallback to extension-based lookup
    let kind = match MimeGuess::from_path(path).first() {
        Some(mime) if mime.type_() == mime_guess::mime::AUDIO => MediaKind::Audio,
        Some(mime) if mime.type_() == mime_guess::mime::VIDEO => MediaKind::Video,
        _ => MediaKind::Other,
    };
    Ok(kind)
}

/// Whether `path` is a regular file the decoder should be given.
pub fn is_audio(path: &Path) -> bool {
    path.is_file() && matches!(detect_media_kind(path), Ok(MediaKind::Audio))
}
