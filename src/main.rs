// src/main.rs
//! musical-lights entry point.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use simplelog::{ColorChoice, Config as LogConfig, LevelFilter, TermLogger, TerminalMode, WriteLogger};

use musical_lights::app::{Analyzer, Renderer};
use musical_lights::cli::{Args, Command};
use musical_lights::config::Config;
use musical_lights::render::{HeadlessSink, TerminalStrip};
use musical_lights::ui::{KeyboardInput, LogStatus, NoInput, TerminalSession, TuiStatus};

fn log_path(role: &str) -> PathBuf {
    let dir = dirs::cache_dir()
        .map(|d| d.join("musical-lights"))
        .filter(|d| std::fs::create_dir_all(d).is_ok())
        .unwrap_or_else(std::env::temp_dir);
    dir.join(format!("{}.log", role))
}

/// Headless runs log to stderr; with the terminal UI up, to a file.
fn init_logging(verbose: bool, headless: bool, role: &str) -> Result<()> {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };

    if headless {
        TermLogger::init(level, LogConfig::default(), TerminalMode::Stderr, ColorChoice::Auto)
            .context("Failed to initialize logger")?;
    } else {
        let path = log_path(role);
        let file = File::create(&path)
            .with_context(|| format!("Cannot create log file {}", path.display()))?;
        WriteLogger::init(level, LogConfig::default(), file).context("Failed to initialize logger")?;
    }

    log::info!("musical-lights {} starting (log level: {:?})", role, level);
    Ok(())
}

fn install_shutdown_handler() -> Result<Arc<AtomicBool>> {
    let shutdown = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&shutdown);
    ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed))
        .context("Failed to install signal handler")?;
    Ok(shutdown)
}

fn run_analyzer(config: Config, headless: bool, shutdown: Arc<AtomicBool>) -> Result<()> {
    let debounce = Duration::from_millis(config.player.debounce_ms);
    let mut analyzer = Analyzer::new(config, shutdown);

    if headless {
        analyzer.run(&mut NoInput, &mut LogStatus::new())?;
    } else {
        let session = TerminalSession::enter().context("Failed to start terminal UI")?;
        let mut status = TuiStatus::new(session);
        analyzer.run(&mut KeyboardInput::new(debounce), &mut status)?;
    }
    Ok(())
}

fn run_renderer(config: Config, headless: bool, shutdown: Arc<AtomicBool>) -> Result<()> {
    let mut renderer = Renderer::bind(&config, shutdown).with_context(|| {
        format!(
            "Cannot listen on {}",
            config.transport.socket_path.display()
        )
    })?;

    if headless {
        renderer.run(&mut HeadlessSink::new(), &mut NoInput)?;
    } else {
        let session = TerminalSession::enter().context("Failed to start terminal UI")?;
        let mut sink = TerminalStrip::new(session);
        let debounce = Duration::from_millis(config.player.debounce_ms);
        renderer.run(&mut sink, &mut KeyboardInput::new(debounce))?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose, args.headless, args.command.role())?;

    let mut config = Config::load(args.config.as_deref())?;
    args.command.apply(&mut config);

    let shutdown = install_shutdown_handler()?;

    match args.command {
        Command::Analyze { .. } => run_analyzer(config, args.headless, shutdown),
        Command::Render { .. } => run_renderer(config, args.headless, shutdown),
    }
}
