// src/app/renderer.rs
//! Renderer process: listens for state lines and animates the strip.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use log::{debug, info};

use crate::config::Config;
use crate::error::Result;
use crate::mode::Mode;
use crate::render::{ModeRenderer, PixelSink};
use crate::transport::StateListener;
use crate::ui::{ControlEvent, ControlInput};

pub struct Renderer {
    listener: StateListener,
    renderer: ModeRenderer,
    poll_interval: Duration,
    shutdown: Arc<AtomicBool>,
    mode: Option<Mode>,
}

impl Renderer {
    /// Bind the state socket. Fails if another renderer owns it.
    pub fn bind(config: &Config, shutdown: Arc<AtomicBool>) -> Result<Self> {
        let listener = StateListener::bind(&config.transport.socket_path)?;
        Ok(Self {
            listener,
            renderer: ModeRenderer::new(config.strip.led_count),
            poll_interval: Duration::from_millis(config.transport.poll_interval_ms),
            shutdown,
            mode: None,
        })
    }

    pub fn listener(&self) -> &StateListener {
        &self.listener
    }

    pub fn renderer(&self) -> &ModeRenderer {
        &self.renderer
    }

    /// Poll and render until quit or shutdown, then black out the strip.
    pub fn run(&mut self, sink: &mut dyn PixelSink, input: &mut dyn ControlInput) -> Result<()> {
        info!("Renderer started with {} LEDs", self.renderer.pixels().len());

        while !self.shutdown.load(Ordering::Relaxed) {
            let quit = input
                .poll()
                .map(|events| events.contains(&ControlEvent::Quit))
                .unwrap_or_else(|e| {
                    debug!("Control input failed: {}", e);
                    false
                });
            if quit {
                break;
            }

            self.tick(sink);
            thread::sleep(self.poll_interval);
        }

        self.blackout(sink);
        info!(
            "Renderer stopping after {} frames, {} malformed lines",
            self.renderer.frame(),
            self.listener.malformed()
        );
        Ok(())
    }

    /// One poll: render and push every message that arrived, in order.
    /// Returns the number of frames pushed.
    pub fn tick(&mut self, sink: &mut dyn PixelSink) -> usize {
        let messages = self.listener.poll();
        for msg in &messages {
            if self.mode != Some(msg.mode) {
                info!("Rendering {}", msg.mode);
                self.mode = Some(msg.mode);
                sink.annotate(&format!("mode {}", msg.mode));
            }
            let pixels = self.renderer.render(msg);
            if let Err(e) = sink.push(pixels) {
                debug!("Pixel push failed: {}", e);
            }
        }
        messages.len()
    }

    /// Clear the strip and push the blank frame.
    pub fn blackout(&mut self, sink: &mut dyn PixelSink) {
        self.renderer.clear();
        if let Err(e) = sink.push(self.renderer.pixels()) {
            debug!("Blank frame push failed: {}", e);
        }
    }
}
