//! Acoustic data-link modem for short-range device-to-device transfer
//!
//! Encodes a bounded byte payload into a sequence of audible tones and decodes
//! a chunked PCM stream back into the payload. One tone per fixed-duration
//! chunk, frame sync via a two-symbol preamble, Reed-Solomon FEC with parity
//! derived from the declared payload length.

pub mod decoder;
pub mod detector;
pub mod encoder;
pub mod error;
pub mod fec;
pub mod framing;
pub mod freq;
pub mod hex;
pub mod pipeline;
pub mod spectrum;
pub mod sync;

pub use decoder::Decoder;
pub use encoder::Encoder;
pub use error::{ModemError, Result};
pub use framing::Protocol;
pub use pipeline::DecodePipeline;

// Audio configuration
pub const SAMPLE_RATE: usize = 44100;
pub const SYMBOL_DURATION_MS: usize = 80;
pub const SAMPLES_PER_SYMBOL: usize = (SAMPLE_RATE * SYMBOL_DURATION_MS) / 1000; // 3528

// Preamble tones span exactly two chunks so that a chunk stream aligned to
// the frame start observes each preamble symbol twice; the second observation
// of the terminal symbol is the guard that the sync layer strips.
pub const PREAMBLE_DURATION_MS: usize = 160;
pub const PREAMBLE_SAMPLES: usize = (SAMPLE_RATE * PREAMBLE_DURATION_MS) / 1000; // 7056

// Tone alphabet
pub const ALPHABET_SIZE: usize = 256;
pub const BASE_FREQUENCY: f32 = 1500.0;
pub const FREQUENCY_INTERVAL: f32 = 45.0;

// Peak tone amplitude: a quarter of the full 16-bit range, leaving headroom
// against clipping on real speaker/microphone paths.
pub const TONE_AMPLITUDE: f32 = 16384.0;

// Chunks whose peak magnitude stays below this carry no reliable symbol.
pub const MIN_AMPLITUDE: i16 = 100;

// Frame configuration
pub const MAX_PAYLOAD_SIZE: usize = 64;
pub const PREAMBLE_SYMBOLS: [u8; 2] = [16, 48];

// FEC configuration
pub const RS_CODEWORD_LEN: usize = 255;
pub const MIN_PARITY: usize = 8;
pub const MAX_PARITY: usize = 32;
