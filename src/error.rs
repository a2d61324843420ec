// src/error.rs
//! Error types shared by the analyzer and renderer processes.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the library.
///
/// Transient transport faults and malformed protocol lines are never turned
/// into these; they are absorbed where they happen. What remains are startup
/// faults and failures talking to the external decoder.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("invalid config file {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Another renderer is already listening on the socket path
    #[error("socket {} is already in use by a live listener", .0.display())]
    SocketInUse(PathBuf),

    /// The external decoder process could not be started or controlled
    #[error("decoder error: {0}")]
    Decoder(String),

    /// Sending a job-control signal to the decoder failed
    #[error("signal error: {0}")]
    Signal(#[from] nix::errno::Errno),
}

/// Result type for library operations
pub type Result<T> = std::result::Result<T, Error>;
