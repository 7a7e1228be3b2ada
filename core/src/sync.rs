//! Frame synchronization state machine.
//!
//! One `DecodeSession` tracks a single listening session: the previously
//! heard symbol, the accumulating frame body, and the sync state. Sync locks
//! the instant the (previous, current) pair equals the preamble; from then on
//! every symbol is accumulated until the frame body declared by the length
//! symbol is complete, at which point FEC decode runs and the session resets.
//!
//! A preamble pair appearing mid-frame does not re-trigger sync, and a stream
//! that dries up mid-frame leaves the session synced; timing that out is the
//! caller's business.

use crate::error::{ModemError, Result};
use crate::fec::ReedSolomon;
use crate::framing::Protocol;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Synced,
}

pub struct DecodeSession {
    protocol: Protocol,
    state: SyncState,
    last_symbol: Option<u8>,
    accumulated: Vec<u8>,
    guard_stripped: bool,
}

impl DecodeSession {
    pub fn new(protocol: Protocol) -> Self {
        Self {
            protocol,
            state: SyncState::Idle,
            last_symbol: None,
            accumulated: Vec::new(),
            guard_stripped: false,
        }
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Drop any partial frame and return to idle.
    pub fn reset(&mut self) {
        self.state = SyncState::Idle;
        self.accumulated.clear();
        self.guard_stripped = false;
    }

    /// Advance the session by one detected symbol.
    ///
    /// Returns `Some` each time a frame completes: the decoded payload, or
    /// the recoverable error that sank it. Either way the session is back in
    /// idle and keeps listening.
    pub fn push_symbol(&mut self, symbol: u8) -> Option<Result<Vec<u8>>> {
        let result = match self.state {
            SyncState::Idle => {
                if self.last_symbol == Some(self.protocol.preamble[0])
                    && symbol == self.protocol.preamble[1]
                {
                    log::debug!("sync acquired");
                    self.state = SyncState::Synced;
                    self.accumulated.clear();
                    self.guard_stripped = false;
                }
                None
            }
            SyncState::Synced => self.accumulate(symbol),
        };

        self.last_symbol = Some(symbol);
        result
    }

    fn accumulate(&mut self, symbol: u8) -> Option<Result<Vec<u8>>> {
        // Preamble tones outlast payload tones, so the chunk right after sync
        // lock usually still carries the terminal preamble symbol. Strip that
        // guard once; the next symbol is the real length field.
        if self.accumulated.is_empty()
            && !self.guard_stripped
            && symbol == self.protocol.preamble[1]
        {
            self.guard_stripped = true;
            return None;
        }

        if self.accumulated.is_empty() {
            if let Err(e) = self.protocol.declared_length(symbol) {
                log::debug!("bad length symbol {symbol}, dropping sync");
                self.reset();
                return Some(Err(e));
            }
        }

        self.accumulated.push(symbol);

        let length = self.accumulated[0] as usize;
        if self.accumulated.len() < self.protocol.expected_symbol_count(length) {
            return None;
        }

        let body = &self.accumulated[1..];
        let rs = ReedSolomon::for_payload_len(length);
        let decoded = rs.decode(body, length);
        match &decoded {
            Ok(payload) => log::debug!("frame complete, {} byte payload", payload.len()),
            Err(e) => log::debug!("frame complete but undecodable: {e}"),
        }
        self.reset();
        Some(decoded)
    }
}
