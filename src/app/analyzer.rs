// src/app/analyzer.rs
//! Analyzer process: plays the playlist, extracts features per tick and
//! streams state lines to the renderer.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::audio::{DecoderProcess, FeaturePipeline, display_name};
use crate::config::Config;
use crate::error::Result;
use crate::fs::{Playlist, TempoTable};
use crate::mode::{Mode, ModeState};
use crate::transport::StateSender;
use crate::ui::{ControlEvent, ControlInput, StatusDisplay, StatusLines};

/// Idle step while paused.
const PAUSE_IDLE: Duration = Duration::from_millis(50);
/// How often an empty songs directory is rescanned.
const RESCAN_INTERVAL: Duration = Duration::from_secs(1);

/// Why playback of a track stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackEnd {
    /// The decoder reached end of stream.
    Finished,
    Next,
    Previous,
    /// The decoder could not be started.
    Failed,
    Quit,
}

pub struct Analyzer {
    config: Config,
    playlist: Playlist,
    tempo: TempoTable,
    modes: ModeState,
    sender: StateSender,
    shutdown: Arc<AtomicBool>,
}

impl Analyzer {
    pub fn new(config: Config, shutdown: Arc<AtomicBool>) -> Self {
        let playlist = Playlist::new(&config.player.songs_dir);
        let tempo = TempoTable::load(&config.player.tempo_table);
        let sender = StateSender::new(&config.transport.socket_path);
        Self {
            config,
            playlist,
            tempo,
            modes: ModeState::default(),
            sender,
            shutdown,
        }
    }

    pub fn mode(&self) -> Mode {
        self.modes.current()
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    fn stopping(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }

    /// Run until quit or shutdown.
    pub fn run(
        &mut self,
        input: &mut dyn ControlInput,
        status: &mut dyn StatusDisplay,
    ) -> Result<()> {
        self.rescan();
        info!(
            "Analyzer started: {} tracks, mode {}",
            self.playlist.len(),
            self.modes.current()
        );

        while !self.stopping() {
            let Some(track) = self.playlist.current().map(Path::to_path_buf) else {
                status.show(&StatusLines::no_songs());
                if self.idle(RESCAN_INTERVAL, input) {
                    break;
                }
                self.rescan();
                continue;
            };

            match self.play_track(&track, input, status) {
                TrackEnd::Finished | TrackEnd::Next => self.playlist.next(),
                TrackEnd::Previous => self.playlist.previous(),
                TrackEnd::Failed => {
                    if self.idle(RESCAN_INTERVAL, input) {
                        break;
                    }
                    self.playlist.next();
                }
                TrackEnd::Quit => break,
            }
        }

        info!(
            "Analyzer stopping: {} states sent, {} dropped",
            self.sender.sent(),
            self.sender.dropped()
        );
        Ok(())
    }

    fn rescan(&mut self) {
        if let Err(e) = self.playlist.scan() {
            debug!("Cannot scan {}: {}", self.playlist.dir().display(), e);
        }
    }

    /// Wait up to `duration` while still honouring quit. Returns true on quit.
    fn idle(&mut self, duration: Duration, input: &mut dyn ControlInput) -> bool {
        let deadline = Instant::now() + duration;
        while Instant::now() < deadline {
            if self.stopping() {
                return true;
            }
            if poll_input(input).contains(&ControlEvent::Quit) {
                return true;
            }
            thread::sleep(PAUSE_IDLE);
        }
        self.stopping()
    }

    /// Play one track until it ends or a control event moves on.
    pub fn play_track(
        &mut self,
        track: &Path,
        input: &mut dyn ControlInput,
        status: &mut dyn StatusDisplay,
    ) -> TrackEnd {
        let name = display_name(track);
        let bpm = self.tempo.bpm_for(track);
        status.show(&StatusLines::playing(&name, bpm, self.modes.current()));
        info!("Playing {}", track.display());

        let mut decoder =
            match DecoderProcess::spawn(track, &self.config.player, self.config.audio.sample_rate) {
                Ok(decoder) => decoder,
                Err(e) => {
                    warn!("Skipping {}: {}", track.display(), e);
                    return TrackEnd::Failed;
                }
            };

        let mut pipeline = FeaturePipeline::new(&self.config);
        let frame_size = self.config.audio.frame_size();
        let tick = Duration::from_secs_f64(0.5 / f64::from(self.config.audio.fps.max(1)));
        let mut frame = Vec::with_capacity(frame_size);

        loop {
            if self.stopping() {
                return TrackEnd::Quit;
            }

            for event in poll_input(input) {
                match event {
                    ControlEvent::AdvanceMode => {
                        if let Some(msg) = self.modes.advance() {
                            self.sender.send(&msg);
                        }
                        info!("Mode: {}", self.modes.current());
                        status.show(&StatusLines::mode_changed(self.modes.current(), &name));
                    }
                    ControlEvent::NextTrack => return TrackEnd::Next,
                    ControlEvent::PreviousTrack => return TrackEnd::Previous,
                    ControlEvent::TogglePlayPause => {
                        toggle_pause(&mut decoder);
                        let lines = if decoder.is_paused() {
                            StatusLines::paused(&name)
                        } else {
                            StatusLines::resumed(&name, self.modes.current())
                        };
                        status.show(&lines);
                    }
                    ControlEvent::Quit => return TrackEnd::Quit,
                }
            }

            if decoder.is_paused() {
                thread::sleep(PAUSE_IDLE);
                continue;
            }

            let read = match decoder.read_frame(&mut frame, frame_size) {
                Ok(n) => n,
                Err(e) => {
                    warn!("Decoder read failed: {}", e);
                    0
                }
            };
            if read == 0 {
                debug!("End of stream for {}", track.display());
                return TrackEnd::Finished;
            }

            let features = pipeline.process(&frame);
            let msg = self.modes.message(&features);
            self.sender.send(&msg);
            status.meters(&msg);

            thread::sleep(tick);
        }
    }
}

fn poll_input(input: &mut dyn ControlInput) -> Vec<ControlEvent> {
    input.poll().unwrap_or_else(|e| {
        debug!("Control input failed: {}", e);
        Vec::new()
    })
}

fn toggle_pause(decoder: &mut DecoderProcess) {
    let result = if decoder.is_paused() {
        decoder.resume()
    } else {
        decoder.pause()
    };
    match result {
        Ok(()) if decoder.is_paused() => info!("Paused"),
        Ok(()) => info!("Resumed"),
        Err(e) => warn!("Pause toggle failed: {}", e),
    }
}
