//! Dominant-frequency estimation over one PCM chunk, backed by rustfft.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

use crate::{SAMPLES_PER_SYMBOL, SAMPLE_RATE};

pub struct SpectralAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    sample_rate: f32,
    chunk_len: usize,
}

impl SpectralAnalyzer {
    pub fn new() -> Self {
        Self::with_chunk_len(SAMPLES_PER_SYMBOL, SAMPLE_RATE)
    }

    pub fn with_chunk_len(chunk_len: usize, sample_rate: usize) -> Self {
        let mut planner = FftPlanner::new();
        Self {
            fft: planner.plan_fft_forward(chunk_len),
            sample_rate: sample_rate as f32,
            chunk_len,
        }
    }

    /// Frequency resolution of one chunk in Hz.
    pub fn bin_width(&self) -> f32 {
        self.sample_rate / self.chunk_len as f32
    }

    /// Frequency bin with the largest magnitude over the positive-frequency
    /// half of the spectrum, in Hz.
    ///
    /// An all-zero chunk lands in bin 0 and reports 0 Hz; that result is
    /// well-defined but meaningless, so callers gate on amplitude first.
    pub fn dominant_frequency(&self, chunk: &[i16]) -> f32 {
        // Short chunks (a truncated stream tail) are zero-padded; anything
        // longer is cut to the analysis window.
        let mut buffer: Vec<Complex<f32>> = chunk
            .iter()
            .take(self.chunk_len)
            .map(|&s| Complex::new(s as f32, 0.0))
            .collect();
        buffer.resize(self.chunk_len, Complex::new(0.0, 0.0));

        self.fft.process(&mut buffer);

        let half = self.chunk_len / 2;
        let mut best_bin = 0usize;
        let mut best_mag = 0.0f32;
        for (bin, value) in buffer[..half].iter().enumerate() {
            let mag = value.norm_sqr();
            if mag > best_mag {
                best_mag = mag;
                best_bin = bin;
            }
        }

        best_bin as f32 * self.bin_width()
    }
}

impl Default for SpectralAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
