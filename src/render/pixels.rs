// src/render/pixels.rs
//! Pixel buffer and the two per-frame primitives every mode is built from.

/// One 8-bit RGB pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    fn scaled(self, factor: f32) -> Self {
        // Truncation toward zero, so a channel never grows
        let scale = |c: u8| (c as f32 * factor) as u8;
        Self::new(scale(self.r), scale(self.g), scale(self.b))
    }

    fn lerp(self, target: Rgb, t: f32) -> Self {
        let mix = |from: u8, to: u8| {
            let v = from as f32 + (to as f32 - from as f32) * t;
            v.round().clamp(0.0, 255.0) as u8
        };
        Self::new(
            mix(self.r, target.r),
            mix(self.g, target.g),
            mix(self.b, target.b),
        )
    }
}

/// Fixed-length strip of pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    pixels: Vec<Rgb>,
}

impl PixelBuffer {
    /// All-black buffer of `len` pixels.
    pub fn new(len: usize) -> Self {
        Self {
            pixels: vec![Rgb::BLACK; len],
        }
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn get(&self, index: usize) -> Option<Rgb> {
        self.pixels.get(index).copied()
    }

    pub fn set(&mut self, index: usize, color: Rgb) {
        if let Some(p) = self.pixels.get_mut(index) {
            *p = color;
        }
    }

    pub fn is_dark(&self) -> bool {
        self.pixels.iter().all(|&p| p == Rgb::BLACK)
    }

    pub fn clear(&mut self) {
        self.pixels.fill(Rgb::BLACK);
    }

    /// Multiply every channel by `factor`, clamped to `[0, 1]`.
    pub fn fade(&mut self, factor: f32) {
        let factor = if factor.is_nan() { 0.0 } else { factor.clamp(0.0, 1.0) };
        for p in &mut self.pixels {
            *p = p.scaled(factor);
        }
    }

    /// Blend `color` into `[start, start + length)`, wrapping past the end.
    ///
    /// Each pixel moves toward `color` by `intensity` (clamped to `[0, 1]`);
    /// at 1.0 the range becomes exactly `color`, at or below 0.0 nothing
    /// changes. A length longer than the strip touches each pixel once.
    pub fn draw_bar(&mut self, start: usize, length: usize, color: Rgb, intensity: f32) {
        if self.pixels.is_empty() || length == 0 || intensity.is_nan() || intensity <= 0.0 {
            return;
        }
        let t = intensity.min(1.0);
        let len = self.pixels.len();
        for offset in 0..length.min(len) {
            let i = (start + offset) % len;
            self.pixels[i] = self.pixels[i].lerp(color, t);
        }
    }
}
