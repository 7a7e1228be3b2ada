//! Symbol/frequency alphabet
//!
//! A `FrequencyMap` is a strictly increasing list of tone frequencies, one per
//! symbol. Symbol to frequency is a direct lookup; frequency to symbol is a
//! nearest-neighbor scan, which at 256 entries is cheaper than anything
//! smarter.

use crate::{ALPHABET_SIZE, BASE_FREQUENCY, FREQUENCY_INTERVAL};

#[derive(Debug, Clone)]
pub struct FrequencyMap {
    freqs: Vec<f32>,
}

impl FrequencyMap {
    /// Linear-spaced map: `freq[i] = base + i * interval`.
    pub fn linear(base: f32, interval: f32, size: usize) -> Self {
        let freqs = (0..size).map(|i| base + i as f32 * interval).collect();
        Self { freqs }
    }

    /// Log-spaced map on the musical scale: `freq[i] = base * 2^(i/12)`,
    /// one entry per semitone.
    pub fn log_spaced(base: f32, semitones: usize) -> Self {
        let freqs = (0..semitones)
            .map(|i| base * 2f32.powf(i as f32 / 12.0))
            .collect();
        Self { freqs }
    }

    /// The 256-tone map used by the standard protocol.
    pub fn standard() -> Self {
        Self::linear(BASE_FREQUENCY, FREQUENCY_INTERVAL, ALPHABET_SIZE)
    }

    pub fn len(&self) -> usize {
        self.freqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.freqs.is_empty()
    }

    /// Frequency of a symbol. Panics on an out-of-alphabet index, which the
    /// framing layer never produces.
    pub fn frequency(&self, symbol: u8) -> f32 {
        self.freqs[symbol as usize]
    }

    /// Nearest symbol for an observed frequency. Always yields a symbol;
    /// ties resolve to the lower index.
    pub fn nearest_symbol(&self, freq: f32) -> u8 {
        let mut best = 0usize;
        let mut best_dist = f32::MAX;
        for (i, &f) in self.freqs.iter().enumerate() {
            let dist = (f - freq).abs();
            if dist < best_dist {
                best_dist = dist;
                best = i;
            }
        }
        best as u8
    }
}
