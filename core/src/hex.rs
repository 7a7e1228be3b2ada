//! Hex text form of payloads, as used by the CLI surfaces.

use crate::error::Result;

pub fn encode(payload: &[u8]) -> String {
    ::hex::encode(payload)
}

/// Decode a hex string, tolerating surrounding whitespace. Odd length or
/// non-hex characters are rejected.
pub fn decode(text: &str) -> Result<Vec<u8>> {
    Ok(::hex::decode(text.trim())?)
}
