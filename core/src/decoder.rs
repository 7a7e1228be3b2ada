//! PCM chunk stream to payloads.
//!
//! A `Decoder` owns one symbol detector and one decode session. Feed it one
//! chunk per symbol duration; each completed frame comes back as an event.
//! Silence never touches the session, so a decoder can listen across gaps
//! between transmissions indefinitely.

use crate::detector::SymbolDetector;
use crate::error::Result;
use crate::framing::Protocol;
use crate::freq::FrequencyMap;
use crate::sync::{DecodeSession, SyncState};

pub struct Decoder {
    detector: SymbolDetector,
    session: DecodeSession,
}

impl Decoder {
    pub fn new() -> Self {
        Self::with_protocol(Protocol::standard())
    }

    pub fn with_protocol(protocol: Protocol) -> Self {
        Self {
            detector: SymbolDetector::new(FrequencyMap::standard()),
            session: DecodeSession::new(protocol),
        }
    }

    pub fn sync_state(&self) -> SyncState {
        self.session.state()
    }

    /// Process one chunk. Quiet chunks are non-events; otherwise the detected
    /// symbol advances the sync state machine, and a completed frame is
    /// returned as its decode result.
    pub fn push_chunk(&mut self, chunk: &[i16]) -> Option<Result<Vec<u8>>> {
        let symbol = self.detector.classify(chunk)?;
        self.session.push_symbol(symbol)
    }

    /// Turn a chunk source into a lazy stream of frame decode results.
    ///
    /// The stream yields once per completed frame and simply ends when the
    /// source does; a session left mid-frame stays synced, so a source that
    /// later produces more chunks can keep using the same decoder.
    pub fn frames<I, C>(self, chunks: I) -> Frames<I::IntoIter>
    where
        I: IntoIterator<Item = C>,
        C: AsRef<[i16]>,
    {
        Frames {
            decoder: self,
            chunks: chunks.into_iter(),
        }
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Frames<I> {
    decoder: Decoder,
    chunks: I,
}

impl<I, C> Iterator for Frames<I>
where
    I: Iterator<Item = C>,
    C: AsRef<[i16]>,
{
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let chunk = self.chunks.next()?;
            if let Some(event) = self.decoder.push_chunk(chunk.as_ref()) {
                return Some(event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::Encoder;
    use crate::{SAMPLES_PER_SYMBOL, SAMPLE_RATE, TONE_AMPLITUDE};
    use std::f32::consts::PI;

    fn chunks_of(samples: &[i16]) -> Vec<Vec<i16>> {
        samples
            .chunks(SAMPLES_PER_SYMBOL)
            .map(|c| c.to_vec())
            .collect()
    }

    fn tone_chunk(freq: f32) -> Vec<i16> {
        (0..SAMPLES_PER_SYMBOL)
            .map(|n| {
                let t = n as f32 / SAMPLE_RATE as f32;
                ((2.0 * PI * freq * t).sin() * TONE_AMPLITUDE) as i16
            })
            .collect()
    }

    #[test]
    fn test_decode_encoded_frame() {
        let samples = Encoder::new().encode(b"hello").unwrap();
        let mut decoder = Decoder::new();

        let mut payloads = Vec::new();
        for chunk in chunks_of(&samples) {
            if let Some(event) = decoder.push_chunk(&chunk) {
                payloads.push(event.unwrap());
            }
        }

        assert_eq!(payloads, vec![b"hello".to_vec()]);
    }

    #[test]
    fn test_silence_is_ignored() {
        let mut decoder = Decoder::new();
        let silence = vec![0i16; SAMPLES_PER_SYMBOL];
        for _ in 0..50 {
            assert!(decoder.push_chunk(&silence).is_none());
        }
        assert_eq!(decoder.sync_state(), SyncState::Idle);
    }

    #[test]
    fn test_frames_iterator_lazy_stream() {
        let samples = Encoder::new().encode(b"hi").unwrap();
        let silence = vec![0i16; SAMPLES_PER_SYMBOL];

        // silence, frame, silence, frame again
        let mut stream = vec![silence.clone(); 5];
        stream.extend(chunks_of(&samples));
        stream.extend(vec![silence; 7]);
        stream.extend(chunks_of(&samples));

        let decoded: Vec<_> = Decoder::new()
            .frames(stream)
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(decoded, vec![b"hi".to_vec(), b"hi".to_vec()]);
    }

    #[test]
    fn test_symbol_error_recovered_from_audio() {
        // Replace two payload chunks with wrong tones; parity 9 absorbs them
        let protocol = Protocol::standard();
        let frame = protocol.frame_symbols(b"hello").unwrap();
        let map = crate::freq::FrequencyMap::standard();

        let mut chunks: Vec<Vec<i16>> = frame
            .iter()
            .map(|&s| tone_chunk(map.frequency(s)))
            .collect();
        chunks[4] = tone_chunk(map.frequency(frame[4] ^ 0x0F));
        chunks[6] = tone_chunk(map.frequency(frame[6] ^ 0x21));

        let decoded: Vec<_> = Decoder::new().frames(chunks).collect();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].as_ref().unwrap(), b"hello");
    }
}
