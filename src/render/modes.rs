// src/render/modes.rs
//! Per-mode animations over the pixel buffer.

use palette::{FromColor, Hsv, Srgb};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::pixels::{PixelBuffer, Rgb};
use crate::mode::Mode;
use crate::protocol::StateMessage;

const MUSIC_FADE: f32 = 0.80;
const AMBIENT_FADE: f32 = 0.95;
const TREE_FADE: f32 = 0.90;
const CHASE_FADE: f32 = 0.85;
const SPARKLE_FADE: f32 = 0.88;

/// Pixels per pitch class in Music mode.
const NOTE_SECTION: usize = 20;
const KICK_START: usize = 240;
const SNARE_START: usize = 270;
const DRUM_BAR: usize = 30;
const DRUM_THRESHOLD: f32 = 0.1;
const KICK_COLOR: Rgb = Rgb::new(255, 80, 0);
const SNARE_COLOR: Rgb = Rgb::new(200, 200, 255);

const AMBIENT_PERIOD: u64 = 600;
const AMBIENT_WASH: f32 = 0.2;

const TREE_SPARKLES: usize = 10;
const TREE_PALETTE: [Rgb; 6] = [
    Rgb::new(0, 180, 0),
    Rgb::new(0, 255, 40),
    Rgb::new(255, 0, 0),
    Rgb::new(255, 50, 0),
    Rgb::new(255, 180, 0),
    Rgb::new(255, 255, 40),
];

const CHASE_SPEED: f32 = 1.5;
const CHASE_TAPER: f32 = 0.3;

const SPARKLE_ATTEMPTS: usize = 15;
const SPARKLE_WHITE: Rgb = Rgb::new(255, 255, 255);
const SPARKLE_BLUE: Rgb = Rgb::new(120, 120, 255);

/// Color for `hue` in turns (wrapped into `[0, 1)`).
pub fn hue_color(hue: f32, saturation: f32, value: f32) -> Rgb {
    let hsv: Hsv = Hsv::new(hue.rem_euclid(1.0) * 360.0, saturation, value);
    let rgb: Srgb = Srgb::from_color(hsv);
    let rgb: Srgb<u8> = rgb.into_format();
    Rgb::new(rgb.red, rgb.green, rgb.blue)
}

/// Renderer-side animation state. One `render` call per received message.
pub struct ModeRenderer {
    pixels: PixelBuffer,
    frame: u64,
    chase_pos: f32,
    rng: StdRng,
}

impl ModeRenderer {
    pub fn new(led_count: usize) -> Self {
        Self::with_rng(led_count, StdRng::from_os_rng())
    }

    /// Deterministic renderer for the random modes.
    pub fn seeded(led_count: usize, seed: u64) -> Self {
        Self::with_rng(led_count, StdRng::seed_from_u64(seed))
    }

    fn with_rng(led_count: usize, rng: StdRng) -> Self {
        Self {
            pixels: PixelBuffer::new(led_count),
            frame: 0,
            chase_pos: 0.0,
            rng,
        }
    }

    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    /// Frames rendered so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn chase_position(&self) -> f32 {
        self.chase_pos
    }

    /// Black out the strip.
    pub fn clear(&mut self) {
        self.pixels.clear();
    }

    /// Advance the animation by one frame for `msg`.
    pub fn render(&mut self, msg: &StateMessage) -> &PixelBuffer {
        match msg.mode {
            Mode::Music => self.music(msg),
            Mode::Ambient => self.ambient(msg.level),
            Mode::Off => self.pixels.clear(),
            Mode::Tree => self.tree(),
            Mode::Chase => self.chase(),
            Mode::Sparkle => self.sparkle(),
        }
        self.frame += 1;
        &self.pixels
    }

    fn music(&mut self, msg: &StateMessage) {
        self.pixels.fade(MUSIC_FADE);
        if let Some(note) = msg.note {
            let hue = note as f32 / 12.0 + msg.glissando * 0.1;
            let color = hue_color(hue, 1.0, 1.0);
            let start = (note as usize % 12) * NOTE_SECTION;
            self.pixels
                .draw_bar(start, NOTE_SECTION, color, (msg.level * 3.0).min(1.0));
        }
        if msg.kick > DRUM_THRESHOLD {
            self.pixels.draw_bar(KICK_START, DRUM_BAR, KICK_COLOR, msg.kick);
        }
        if msg.snare > DRUM_THRESHOLD {
            self.pixels
                .draw_bar(SNARE_START, DRUM_BAR, SNARE_COLOR, msg.snare);
        }
    }

    fn ambient(&mut self, level: f32) {
        self.pixels.fade(AMBIENT_FADE);
        let hue = (self.frame % AMBIENT_PERIOD) as f32 / AMBIENT_PERIOD as f32;
        let value = (0.4 + 0.4 * level).clamp(0.0, 1.0);
        let color = hue_color(hue, 0.6, value);
        let len = self.pixels.len();
        self.pixels.draw_bar(0, len, color, AMBIENT_WASH);
    }

    fn tree(&mut self) {
        self.pixels.fade(TREE_FADE);
        let len = self.pixels.len();
        if len == 0 {
            return;
        }
        for _ in 0..TREE_SPARKLES {
            let idx = self.rng.random_range(0..len);
            let color = TREE_PALETTE[self.rng.random_range(0..TREE_PALETTE.len())];
            self.pixels.draw_bar(idx, 1, color, 1.0);
        }
    }

    fn chase(&mut self) {
        self.pixels.fade(CHASE_FADE);
        let len = self.pixels.len();
        if len == 0 {
            return;
        }
        let bar_len = (len / 15).max(10);
        self.chase_pos = (self.chase_pos + CHASE_SPEED) % len as f32;
        let head = self.chase_pos as usize;
        for i in 0..bar_len {
            let t = i as f32 / bar_len as f32;
            let hue = self.chase_pos / len as f32 + t;
            let color = hue_color(hue, 1.0, 1.0);
            self.pixels
                .draw_bar((head + i) % len, 1, color, 1.0 - CHASE_TAPER * t);
        }
    }

    fn sparkle(&mut self) {
        self.pixels.fade(SPARKLE_FADE);
        let len = self.pixels.len();
        if len == 0 {
            return;
        }
        for _ in 0..SPARKLE_ATTEMPTS {
            if !self.rng.random_bool(0.5) {
                continue;
            }
            let idx = self.rng.random_range(0..len);
            let color = if self.rng.random_bool(0.5) {
                SPARKLE_WHITE
            } else {
                SPARKLE_BLUE
            };
            self.pixels.draw_bar(idx, 1, color, 1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(mode: Mode) -> StateMessage {
        StateMessage::silent(mode)
    }

    fn lit(buf: &PixelBuffer) -> Vec<usize> {
        (0..buf.len())
            .filter(|&i| buf.get(i) != Some(Rgb::BLACK))
            .collect()
    }

    #[test]
    fn hue_wraps_and_hits_primaries() {
        assert_eq!(hue_color(0.0, 1.0, 1.0), Rgb::new(255, 0, 0));
        assert_eq!(hue_color(1.0, 1.0, 1.0), Rgb::new(255, 0, 0));
        assert_eq!(hue_color(-2.0 / 3.0, 1.0, 1.0), Rgb::new(0, 255, 0));
        assert_eq!(hue_color(0.5, 0.0, 0.0), Rgb::BLACK);
    }

    #[test]
    fn music_draws_note_section() {
        let mut r = ModeRenderer::seeded(300, 1);
        let m = StateMessage {
            note: Some(0),
            level: 1.0,
            ..msg(Mode::Music)
        };
        let buf = r.render(&m);
        assert_eq!(lit(buf), (0..20).collect::<Vec<_>>());
        assert_eq!(buf.get(0), Some(Rgb::new(255, 0, 0)));
    }

    #[test]
    fn music_drum_bars_need_threshold() {
        let mut r = ModeRenderer::seeded(300, 1);
        let quiet = StateMessage {
            kick: 0.1,
            snare: 0.05,
            ..msg(Mode::Music)
        };
        assert!(r.render(&quiet).is_dark());

        let hit = StateMessage {
            kick: 1.0,
            snare: 1.0,
            ..msg(Mode::Music)
        };
        let buf = r.render(&hit);
        assert_eq!(buf.get(240), Some(KICK_COLOR));
        assert_eq!(buf.get(269), Some(KICK_COLOR));
        assert_eq!(buf.get(270), Some(SNARE_COLOR));
        assert_eq!(buf.get(299), Some(SNARE_COLOR));
        assert_eq!(lit(buf).len(), 60);
    }

    #[test]
    fn music_trails_fade() {
        let mut r = ModeRenderer::seeded(300, 1);
        r.render(&StateMessage {
            kick: 1.0,
            ..msg(Mode::Music)
        });
        let buf = r.render(&msg(Mode::Music));
        // 255 * 0.8, 80 * 0.8
        assert_eq!(buf.get(240), Some(Rgb::new(204, 64, 0)));
    }

    #[test]
    fn off_clears_everything() {
        let mut r = ModeRenderer::seeded(300, 1);
        r.render(&msg(Mode::Sparkle));
        r.render(&StateMessage {
            kick: 1.0,
            ..msg(Mode::Music)
        });
        assert!(r.render(&msg(Mode::Off)).is_dark());
    }

    #[test]
    fn ambient_washes_whole_strip_evenly() {
        let mut r = ModeRenderer::seeded(300, 1);
        let buf = r.render(&msg(Mode::Ambient));
        let first = buf.get(0);
        assert_ne!(first, Some(Rgb::BLACK));
        assert!(buf.pixels().iter().all(|&p| Some(p) == first));
    }

    #[test]
    fn chase_advances_and_draws_bar() {
        let mut r = ModeRenderer::seeded(300, 1);
        let buf = r.render(&msg(Mode::Chase));
        // head at 1.5 -> pixels 1..21
        assert_eq!(lit(buf), (1..21).collect::<Vec<_>>());
        r.render(&msg(Mode::Chase));
        assert_eq!(r.chase_position(), 3.0);
    }

    #[test]
    fn chase_wraps_around_strip() {
        let mut r = ModeRenderer::seeded(30, 1);
        for _ in 0..20 {
            r.render(&msg(Mode::Chase));
        }
        // 20 * 1.5 = 30 wraps to 0
        assert_eq!(r.chase_position(), 0.0);
        assert_eq!(r.pixels().len(), 30);
    }

    #[test]
    fn tree_uses_festive_palette() {
        let mut r = ModeRenderer::seeded(300, 7);
        let buf = r.render(&msg(Mode::Tree));
        let lit = lit(buf);
        assert!(!lit.is_empty() && lit.len() <= TREE_SPARKLES);
        for i in lit {
            assert!(TREE_PALETTE.contains(&buf.get(i).unwrap()));
        }
    }

    #[test]
    fn sparkle_is_white_or_blue() {
        let mut r = ModeRenderer::seeded(300, 42);
        let buf = r.render(&msg(Mode::Sparkle));
        let lit = lit(buf);
        assert!(lit.len() <= SPARKLE_ATTEMPTS);
        for i in lit {
            let p = buf.get(i).unwrap();
            assert!(p == SPARKLE_WHITE || p == SPARKLE_BLUE);
        }
    }

    #[test]
    fn frame_counter_advances_per_message() {
        let mut r = ModeRenderer::seeded(10, 1);
        for mode in Mode::ALL {
            r.render(&msg(mode));
        }
        assert_eq!(r.frame(), 6);
    }
}
