// src/audio/analyzer.rs
//! Windowed FFT feature extraction over the audio history.

use std::f32::consts::PI;

use rustfft::{FftPlanner, num_complex::Complex};

use crate::config::{AnalysisConfig, Band};

/// Features extracted from one analysis window.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpectralFeatures {
    /// Strongest mid-band frequency, if it cleared the confidence threshold
    pub lead_freq: Option<f32>,
    pub bass: f32,
    pub mid: f32,
    pub high: f32,
    /// Overall loudness in [0, 1]
    pub level: f32,
}

/// Spectral analyzer: DC removal, Hann window, real-input FFT, band means.
pub struct SpectralAnalyzer {
    /// FFT planner, caches plans per window length
    planner: FftPlanner<f32>,
    sample_rate: f32,
    config: AnalysisConfig,
    /// Hann coefficients for the last window length seen
    window: Vec<f32>,
    buffer: Vec<Complex<f32>>,
    magnitudes: Vec<f32>,
}

impl SpectralAnalyzer {
    pub fn new(sample_rate: u32, config: AnalysisConfig) -> Self {
        Self {
            planner: FftPlanner::new(),
            sample_rate: sample_rate as f32,
            config,
            window: Vec::new(),
            buffer: Vec::new(),
            magnitudes: Vec::new(),
        }
    }

    /// Analyze a window of samples normalized to [-1, 1].
    ///
    /// Total over its input: an empty window yields all-zero features.
    pub fn analyze(&mut self, samples: &[f32]) -> SpectralFeatures {
        let n = samples.len();
        if n == 0 {
            return SpectralFeatures::default();
        }

        if self.window.len() != n {
            self.window = (0..n).map(|i| hann_window(i, n)).collect();
        }

        let mean = samples.iter().sum::<f32>() / n as f32;
        self.buffer.clear();
        self.buffer.extend(
            samples
                .iter()
                .zip(&self.window)
                .map(|(&s, &w)| Complex::new((s - mean) * w, 0.0)),
        );

        let fft = self.planner.plan_fft_forward(n);
        fft.process(&mut self.buffer);

        // Real input: bins above n/2 mirror the lower half
        let bins = n / 2 + 1;
        self.magnitudes.clear();
        self.magnitudes
            .extend(self.buffer[..bins].iter().map(|c| c.norm()));

        let bin_hz = self.sample_rate / n as f32;
        let overall = self.magnitudes.iter().sum::<f32>() / bins as f32;

        SpectralFeatures {
            lead_freq: self.lead_frequency(bin_hz),
            bass: band_mean(&self.magnitudes, bin_hz, self.config.bass),
            mid: band_mean(&self.magnitudes, bin_hz, self.config.mid),
            high: band_mean(&self.magnitudes, bin_hz, self.config.high),
            level: (overall * self.config.level_gain).min(1.0),
        }
    }

    /// Peak bin of the mid band, when loud enough to trust.
    fn lead_frequency(&self, bin_hz: f32) -> Option<f32> {
        let mut peak: Option<(f32, f32)> = None;
        for (i, &mag) in self.magnitudes.iter().enumerate() {
            let freq = i as f32 * bin_hz;
            if !self.config.mid.contains(freq) {
                continue;
            }
            if peak.is_none_or(|(_, best)| mag > best) {
                peak = Some((freq, mag));
            }
        }
        peak.filter(|&(_, mag)| mag > self.config.pitch_confidence)
            .map(|(freq, _)| freq)
    }
}

/// Mean magnitude of the bins whose frequency falls inside `band`.
fn band_mean(magnitudes: &[f32], bin_hz: f32, band: Band) -> f32 {
    let (sum, count) = magnitudes
        .iter()
        .enumerate()
        .filter(|(i, _)| band.contains(*i as f32 * bin_hz))
        .fold((0.0f32, 0usize), |(sum, count), (_, &m)| (sum + m, count + 1));
    if count == 0 { 0.0 } else { sum / count as f32 }
}

/// Symmetric Hann window coefficient.
pub fn hann_window(index: usize, size: usize) -> f32 {
    if size <= 1 {
        return 1.0;
    }
    0.5 - 0.5 * ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos()
}
