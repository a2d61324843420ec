// src/audio/history.rs
//! Rolling window of the most recent PCM samples.

use ringbuf::{HeapRb, traits::*};

/// Fixed-length ring of the most recent signed 16-bit samples.
///
/// Starts out full of silence so the analysis window always has the same
/// length, exactly like a freshly zeroed buffer being rolled forward.
pub struct AudioHistory {
    ring: HeapRb<i16>,
    len: usize,
}

impl AudioHistory {
    /// Create a history of `len` samples, all zero.
    pub fn new(len: usize) -> Self {
        let mut ring = HeapRb::<i16>::new(len.max(1));
        for _ in 0..len {
            let _ = ring.try_push(0);
        }
        Self { ring, len }
    }

    /// Number of samples in the window.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append a frame, overwriting the oldest samples.
    ///
    /// A frame longer than the window only keeps its newest samples.
    pub fn push_frame(&mut self, frame: &[i16]) {
        if self.len == 0 {
            return;
        }
        let start = frame.len().saturating_sub(self.len);
        for &sample in &frame[start..] {
            self.ring.push_overwrite(sample);
        }
    }

    /// Write the window, oldest first, as floats in [-1, 1) into `out`.
    pub fn normalized_into(&self, out: &mut Vec<f32>) {
        out.clear();
        if self.len == 0 {
            return;
        }
        out.extend(self.ring.iter().map(|&s| s as f32 / 32768.0));
    }
}
