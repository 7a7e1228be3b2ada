//! Frame layout: preamble pair, length symbol, FEC-protected payload.

use crate::error::{ModemError, Result};
use crate::fec::{parity_length, ReedSolomon};
use crate::{MAX_PAYLOAD_SIZE, PREAMBLE_SYMBOLS};

/// Wire-format parameters shared by encoder and decoder.
#[derive(Debug, Clone)]
pub struct Protocol {
    pub preamble: [u8; 2],
    pub max_payload: usize,
}

impl Protocol {
    pub fn standard() -> Self {
        Self {
            preamble: PREAMBLE_SYMBOLS,
            max_payload: MAX_PAYLOAD_SIZE,
        }
    }

    /// Build the symbol sequence for one frame:
    /// `preamble ++ [len] ++ payload ++ parity`.
    pub fn frame_symbols(&self, payload: &[u8]) -> Result<Vec<u8>> {
        if payload.is_empty() || payload.len() > self.max_payload {
            return Err(ModemError::InvalidPayloadSize {
                len: payload.len(),
                max: self.max_payload,
            });
        }

        let rs = ReedSolomon::for_payload_len(payload.len());
        let mut symbols = Vec::with_capacity(3 + payload.len() + rs.parity_len());
        symbols.extend_from_slice(&self.preamble);
        symbols.push(payload.len() as u8);
        symbols.extend_from_slice(&rs.encode(payload));
        Ok(symbols)
    }

    /// Symbols the decoder must accumulate after sync for a declared length:
    /// the length symbol itself, the payload, and its parity.
    pub fn expected_symbol_count(&self, length: usize) -> usize {
        1 + length + parity_length(length)
    }

    /// Interpret a received length symbol, rejecting values the protocol
    /// cannot have produced.
    pub fn declared_length(&self, symbol: u8) -> Result<usize> {
        let length = symbol as usize;
        if length == 0 || length > self.max_payload {
            return Err(ModemError::InvalidLengthSymbol(symbol));
        }
        Ok(length)
    }
}

impl Default for Protocol {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_symbols_layout() {
        let protocol = Protocol::standard();
        let symbols = protocol.frame_symbols(b"hello").unwrap();

        assert_eq!(&symbols[..2], &protocol.preamble);
        assert_eq!(symbols[2], 5);
        assert_eq!(&symbols[3..8], b"hello");
        // 2 preamble + 1 length + 5 payload + 9 parity
        assert_eq!(symbols.len(), 17);
    }

    #[test]
    fn test_frame_rejects_empty_payload() {
        let protocol = Protocol::standard();
        match protocol.frame_symbols(b"") {
            Err(ModemError::InvalidPayloadSize { len: 0, .. }) => {}
            other => panic!("expected InvalidPayloadSize, got {other:?}"),
        }
    }

    #[test]
    fn test_frame_rejects_oversized_payload() {
        let protocol = Protocol::standard();
        let big = vec![0u8; MAX_PAYLOAD_SIZE + 1];
        assert!(protocol.frame_symbols(&big).is_err());
    }

    #[test]
    fn test_expected_symbol_count() {
        let protocol = Protocol::standard();
        assert_eq!(protocol.expected_symbol_count(5), 1 + 5 + 9);
        assert_eq!(protocol.expected_symbol_count(64), 1 + 64 + 32);
    }

    #[test]
    fn test_declared_length_bounds() {
        let protocol = Protocol::standard();
        assert!(protocol.declared_length(0).is_err());
        assert_eq!(protocol.declared_length(1).unwrap(), 1);
        assert_eq!(protocol.declared_length(64).unwrap(), 64);
        assert!(protocol.declared_length(65).is_err());
    }
}
