//! Chunk-to-symbol classification with an amplitude gate.

use crate::freq::FrequencyMap;
use crate::spectrum::SpectralAnalyzer;
use crate::MIN_AMPLITUDE;

pub struct SymbolDetector {
    map: FrequencyMap,
    analyzer: SpectralAnalyzer,
    min_amplitude: i16,
}

impl SymbolDetector {
    pub fn new(map: FrequencyMap) -> Self {
        Self {
            map,
            analyzer: SpectralAnalyzer::new(),
            min_amplitude: MIN_AMPLITUDE,
        }
    }

    /// Classify one chunk into a symbol.
    ///
    /// Returns `None` when the peak magnitude stays below the gate: a quiet
    /// chunk carries no reliable symbol and must not reach the sync state
    /// machine. This is a non-event, not an error.
    pub fn classify(&self, chunk: &[i16]) -> Option<u8> {
        let peak = chunk
            .iter()
            .map(|&s| (s as i32).unsigned_abs())
            .max()
            .unwrap_or(0);
        if peak < self.min_amplitude as u32 {
            return None;
        }

        let freq = self.analyzer.dominant_frequency(chunk);
        Some(self.map.nearest_symbol(freq))
    }
}
