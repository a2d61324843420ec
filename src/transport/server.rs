// src/transport/server.rs
//! Renderer side of the state socket.
//!
//! A non-blocking listener serving at most one client. Each `poll` accepts
//! at most one pending connection, drains whatever the current client has
//! written and returns the decoded messages. It never blocks, so the render
//! loop keeps animating while nobody is connected.

use std::fs;
use std::io::{self, ErrorKind, Read};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use super::framing::LineAccumulator;
use crate::error::{Error, Result};
use crate::protocol::{self, StateMessage};

const READ_CHUNK: usize = 4096;

struct Connection {
    stream: UnixStream,
    lines: LineAccumulator,
}

impl Connection {
    fn new(stream: UnixStream) -> io::Result<Self> {
        stream.set_nonblocking(true)?;
        Ok(Self {
            stream,
            lines: LineAccumulator::new(),
        })
    }

    /// Read everything currently available. Returns false once the peer is gone.
    fn fill(&mut self) -> bool {
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            match self.stream.read(&mut chunk) {
                Ok(0) => return false,
                Ok(n) => self.lines.extend(&chunk[..n]),
                Err(e) if e.kind() == ErrorKind::WouldBlock => return true,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    debug!("State connection read failed: {}", e);
                    return false;
                }
            }
        }
    }
}

/// Single-client state listener.
pub struct StateListener {
    listener: UnixListener,
    path: PathBuf,
    conn: Option<Connection>,
    malformed: u64,
}

impl StateListener {
    /// Bind at `path`.
    ///
    /// A leftover socket file from a crashed renderer is removed. If another
    /// renderer still answers on it, binding fails with `SocketInUse`.
    pub fn bind(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if path.exists() {
            if UnixStream::connect(&path).is_ok() {
                return Err(Error::SocketInUse(path));
            }
            debug!("Removing stale socket {}", path.display());
            fs::remove_file(&path)?;
        }

        let listener = UnixListener::bind(&path)?;
        listener.set_nonblocking(true)?;
        info!("Listening for analyzer on {}", path.display());

        Ok(Self {
            listener,
            path,
            conn: None,
            malformed: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Lines that failed to decode since binding.
    pub fn malformed(&self) -> u64 {
        self.malformed
    }

    /// Collect every message that arrived since the last poll, in order.
    pub fn poll(&mut self) -> Vec<StateMessage> {
        let mut out = Vec::new();
        self.drain_current(&mut out);

        if let Some(conn) = self.accept() {
            if self.conn.is_some() {
                info!("New analyzer connection replaces the previous one");
            }
            self.conn = Some(conn);
            self.drain_current(&mut out);
        }
        out
    }

    fn accept(&mut self) -> Option<Connection> {
        match self.listener.accept() {
            Ok((stream, _)) => match Connection::new(stream) {
                Ok(conn) => {
                    info!("Analyzer connected");
                    Some(conn)
                }
                Err(e) => {
                    warn!("Could not configure analyzer connection: {}", e);
                    None
                }
            },
            Err(e) if e.kind() == ErrorKind::WouldBlock => None,
            Err(e) => {
                debug!("Accept failed: {}", e);
                None
            }
        }
    }

    fn drain_current(&mut self, out: &mut Vec<StateMessage>) {
        let Some(conn) = self.conn.as_mut() else {
            return;
        };
        let alive = conn.fill();

        while let Some(line) = conn.lines.next_line() {
            match protocol::decode(&line) {
                Ok(msg) => out.push(msg),
                Err(e) => {
                    self.malformed += 1;
                    debug!("Dropping malformed line {:?}: {}", line, e);
                }
            }
        }

        if !alive {
            if conn.lines.pending() > 0 {
                debug!("Discarding {} bytes of unterminated input", conn.lines.pending());
            }
            info!("Analyzer disconnected");
            self.conn = None;
        }
    }
}

impl Drop for StateListener {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            debug!("Could not remove {}: {}", self.path.display(), e);
        }
    }
}
