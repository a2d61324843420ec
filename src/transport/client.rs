// src/transport/client.rs
//! Analyzer side of the state socket.
//!
//! The connection is opened lazily and thrown away on the first write
//! failure; the next send tries again. Nothing here ever blocks waiting for
//! the renderer to appear.

use std::io::Write;
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::protocol::StateMessage;

/// Opportunistic sender of state lines.
pub struct StateSender {
    path: PathBuf,
    stream: Option<UnixStream>,
    sent: u64,
    dropped: u64,
}

impl StateSender {
    /// Sender for the socket at `path`. No connection is attempted yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            stream: None,
            sent: 0,
            dropped: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    /// Messages written successfully.
    pub fn sent(&self) -> u64 {
        self.sent
    }

    /// Messages discarded because no renderer was reachable.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Send one message. Returns whether it was written.
    ///
    /// A missing listener or broken connection is not an error: the message
    /// is dropped and the next call reconnects.
    pub fn send(&mut self, msg: &StateMessage) -> bool {
        if self.stream.is_none() {
            self.connect();
        }
        let Some(stream) = self.stream.as_mut() else {
            self.dropped += 1;
            return false;
        };

        match stream.write_all(msg.to_line().as_bytes()) {
            Ok(()) => {
                self.sent += 1;
                true
            }
            Err(e) => {
                debug!("State write to {} failed: {}", self.path.display(), e);
                self.stream = None;
                self.dropped += 1;
                false
            }
        }
    }

    /// Forget the current connection.
    pub fn disconnect(&mut self) {
        self.stream = None;
    }

    fn connect(&mut self) {
        match UnixStream::connect(&self.path) {
            Ok(stream) => {
                info!("Connected to renderer at {}", self.path.display());
                self.stream = Some(stream);
            }
            Err(e) => {
                debug!("Renderer not reachable at {}: {}", self.path.display(), e);
            }
        }
    }
}
