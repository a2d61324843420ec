// src/cli.rs
//! Command-line argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "musical-lights")]
#[command(about = "Audio-reactive LED strip: analyzer and renderer", long_about = None)]
pub struct Args {
    /// Configuration file (TOML)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// No terminal UI; log to stderr
    #[arg(long, global = true)]
    pub headless: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Play the songs directory and stream features to the renderer
    Analyze {
        /// Directory of tracks to play
        #[arg(long, value_name = "DIR")]
        songs: Option<PathBuf>,

        /// State socket path
        #[arg(long, value_name = "PATH")]
        socket: Option<PathBuf>,

        /// Decode for analysis only, without sound output
        #[arg(long)]
        no_playback: bool,
    },
    /// Listen for state and animate the strip
    Render {
        /// State socket path
        #[arg(long, value_name = "PATH")]
        socket: Option<PathBuf>,

        /// Number of LEDs on the strip
        #[arg(long, value_name = "N")]
        leds: Option<usize>,
    },
}

impl Command {
    /// Short name used for the log file.
    pub fn role(&self) -> &'static str {
        match self {
            Command::Analyze { .. } => "analyze",
            Command::Render { .. } => "render",
        }
    }

    /// Fold command-line overrides into the loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        match self {
            Command::Analyze {
                songs,
                socket,
                no_playback,
            } => {
                if let Some(songs) = songs {
                    config.player.songs_dir = songs.clone();
                }
                if let Some(socket) = socket {
                    config.transport.socket_path = socket.clone();
                }
                if *no_playback {
                    config.player.audio_device = None;
                }
            }
            Command::Render { socket, leds } => {
                if let Some(socket) = socket {
                    config.transport.socket_path = socket.clone();
                }
                if let Some(leds) = leds {
                    config.strip.led_count = *leds;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_after_subcommand() {
        let args = Args::try_parse_from(["musical-lights", "render", "--leds", "60", "-v"]).unwrap();
        assert!(args.verbose);
        assert_eq!(
            args.command,
            Command::Render {
                socket: None,
                leds: Some(60)
            }
        );
    }

    #[test]
    fn overrides_win_over_config() {
        let args = Args::try_parse_from([
            "musical-lights",
            "--headless",
            "analyze",
            "--songs",
            "/music",
            "--no-playback",
        ])
        .unwrap();
        assert!(args.headless);

        let mut config = Config::default();
        args.command.apply(&mut config);
        assert_eq!(config.player.songs_dir, PathBuf::from("/music"));
        assert_eq!(config.player.audio_device, None);
        assert_eq!(config.transport.socket_path, Config::default().transport.socket_path);
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Args::try_parse_from(["musical-lights"]).is_err());
    }
}
