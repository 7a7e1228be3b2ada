//! Payload to PCM: one sine tone per frame symbol.

use std::f32::consts::PI;

use crate::error::Result;
use crate::framing::Protocol;
use crate::freq::FrequencyMap;
use crate::{PREAMBLE_SAMPLES, SAMPLES_PER_SYMBOL, SAMPLE_RATE, TONE_AMPLITUDE};

pub struct Encoder {
    protocol: Protocol,
    map: FrequencyMap,
}

impl Encoder {
    pub fn new() -> Self {
        Self::with_protocol(Protocol::standard())
    }

    pub fn with_protocol(protocol: Protocol) -> Self {
        Self {
            protocol,
            map: FrequencyMap::standard(),
        }
    }

    /// Encode a payload into a PCM sample sequence.
    ///
    /// The two preamble symbols get the longer preamble tone; length,
    /// payload, and parity symbols get one chunk each. Amplitude is the
    /// fixed protocol constant, not caller-tunable.
    pub fn encode(&self, payload: &[u8]) -> Result<Vec<i16>> {
        let symbols = self.protocol.frame_symbols(payload)?;

        let total = 2 * PREAMBLE_SAMPLES + (symbols.len() - 2) * SAMPLES_PER_SYMBOL;
        let mut samples = Vec::with_capacity(total);
        for (i, &symbol) in symbols.iter().enumerate() {
            let duration = if i < 2 {
                PREAMBLE_SAMPLES
            } else {
                SAMPLES_PER_SYMBOL
            };
            append_tone(&mut samples, self.map.frequency(symbol), duration);
        }

        Ok(samples)
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

fn append_tone(samples: &mut Vec<i16>, freq: f32, duration: usize) {
    for n in 0..duration {
        let t = n as f32 / SAMPLE_RATE as f32;
        samples.push(((2.0 * PI * freq * t).sin() * TONE_AMPLITUDE) as i16);
    }
}
