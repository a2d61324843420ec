// src/audio/decoder.rs
//! External decoder process: plays a track and streams mono PCM back.
//!
//! The decoder (ffmpeg) writes to the sound card and to its stdout at the
//! same time, so the analyzer sees what is being heard. Pausing suspends the
//! process itself rather than the analyzer loop.

use std::ffi::OsString;
use std::io::{self, Read};
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;

use crate::config::PlayerConfig;
use crate::error::{Error, Result};

/// How long a terminated decoder gets to exit before it is killed.
const TERMINATE_GRACE: Duration = Duration::from_secs(1);

/// A running decoder for one track.
pub struct DecoderProcess {
    child: Child,
    stdout: ChildStdout,
    paused: bool,
    /// Raw little-endian bytes of the frame being read
    bytes: Vec<u8>,
}

impl DecoderProcess {
    /// Start decoding `track`.
    pub fn spawn(track: &Path, config: &PlayerConfig, sample_rate: u32) -> Result<Self> {
        let child = Command::new(&config.ffmpeg)
            .args(decoder_args(track, config.audio_device.as_deref(), sample_rate))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::Decoder(format!("failed to start {}: {}", config.ffmpeg.display(), e)))?;

        info!("Decoder {} started for {}", child.id(), track.display());
        Self::from_child(child)
    }

    /// Wrap an already spawned process whose stdout is piped PCM.
    pub fn from_child(mut child: Child) -> Result<Self> {
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::Decoder("decoder stdout not captured".into()))?;

        Ok(Self {
            child,
            stdout,
            paused: false,
            bytes: Vec::new(),
        })
    }

    /// Block until `samples` samples are read or the stream ends.
    ///
    /// Returns the number of samples placed in `frame`; 0 means end of stream.
    pub fn read_frame(&mut self, frame: &mut Vec<i16>, samples: usize) -> io::Result<usize> {
        self.bytes.resize(samples * 2, 0);
        let mut filled = 0;
        while filled < self.bytes.len() {
            match self.stdout.read(&mut self.bytes[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        frame.clear();
        frame.extend(
            self.bytes[..filled]
                .chunks_exact(2)
                .map(|b| i16::from_le_bytes([b[0], b[1]])),
        );
        Ok(frame.len())
    }

    /// True once the process has exited.
    pub fn has_exited(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(Some(_)))
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Suspend playback and decoding.
    pub fn pause(&mut self) -> Result<()> {
        if !self.paused {
            kill(self.pid(), Signal::SIGSTOP)?;
            self.paused = true;
        }
        Ok(())
    }

    /// Continue after `pause`.
    pub fn resume(&mut self) -> Result<()> {
        if self.paused {
            kill(self.pid(), Signal::SIGCONT)?;
            self.paused = false;
        }
        Ok(())
    }

    /// Ask the decoder to stop, killing it if it lingers.
    pub fn terminate(&mut self) {
        if self.has_exited() {
            return;
        }
        // A stopped process would hold SIGTERM pending forever
        if let Err(e) = self.resume() {
            debug!("Failed to resume decoder before terminating: {}", e);
        }
        if let Err(e) = kill(self.pid(), Signal::SIGTERM) {
            debug!("SIGTERM to decoder failed: {}", e);
        }

        let deadline = Instant::now() + TERMINATE_GRACE;
        while Instant::now() < deadline {
            if self.has_exited() {
                return;
            }
            thread::sleep(Duration::from_millis(10));
        }

        warn!("Decoder {} ignored SIGTERM, killing", self.child.id());
        let _ = self.child.kill();
        let _ = self.child.wait();
    }

    fn pid(&self) -> Pid {
        Pid::from_raw(self.child.id() as i32)
    }
}

impl Drop for DecoderProcess {
    fn drop(&mut self) {
        self.terminate();
    }
}

/// Command line for the decoder.
///
/// With an output device the decoded audio is split: one branch to ALSA, one
/// downmixed to mono s16le on stdout. Without one, input is read at native
/// rate so analysis still runs in real time.
pub fn decoder_args(track: &Path, audio_device: Option<&str>, sample_rate: u32) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-hide_banner", "-loglevel", "error"]
        .iter()
        .map(OsString::from)
        .collect();

    if audio_device.is_none() {
        args.push("-re".into());
    }
    args.push("-i".into());
    args.push(track.as_os_str().to_os_string());

    let pcm_branch = format!("aresample={},pan=mono|c0=c0[pcm]", sample_rate);
    match audio_device {
        Some(device) => {
            args.push("-filter_complex".into());
            args.push(format!("[0:a]asplit=2[out1][out2];[out2]{}", pcm_branch).into());
            for arg in ["-map", "[out1]", "-f", "alsa", device] {
                args.push(arg.into());
            }
        }
        None => {
            args.push("-filter_complex".into());
            args.push(format!("[0:a]{}", pcm_branch).into());
        }
    }
    for arg in ["-map", "[pcm]", "-f", "s16le", "-"] {
        args.push(arg.into());
    }
    args
}
