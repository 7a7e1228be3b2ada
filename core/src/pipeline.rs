//! Threaded decode pipeline.
//!
//! Chunk capture and symbol decoding run at different cadences: the capture
//! side produces one chunk every symbol duration and must never stall, while
//! an FFT plus a possible FEC decode can take a variable amount of time. The
//! pipeline puts a bounded FIFO between the two and runs a single worker
//! thread that owns the decoder, so chunks are always processed in capture
//! order by one sync state machine.

use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread::{self, JoinHandle};

use crate::decoder::Decoder;
use crate::error::{ModemError, Result};
use crate::framing::Protocol;

/// Chunks buffered between capture and decode before `push` blocks.
const QUEUE_DEPTH: usize = 32;

pub struct DecodePipeline {
    input: Option<SyncSender<Vec<i16>>>,
    events: Receiver<Result<Vec<u8>>>,
    worker: Option<JoinHandle<()>>,
}

impl DecodePipeline {
    pub fn new() -> Self {
        Self::with_protocol(Protocol::standard())
    }

    pub fn with_protocol(protocol: Protocol) -> Self {
        let (input, chunks) = mpsc::sync_channel::<Vec<i16>>(QUEUE_DEPTH);
        let (event_tx, events) = mpsc::channel();

        let worker = thread::spawn(move || {
            let mut decoder = Decoder::with_protocol(protocol);
            while let Ok(chunk) = chunks.recv() {
                if let Some(event) = decoder.push_chunk(&chunk) {
                    // Receiver gone means nobody wants further frames.
                    if event_tx.send(event).is_err() {
                        break;
                    }
                }
            }
        });

        Self {
            input: Some(input),
            events,
            worker: Some(worker),
        }
    }

    /// Queue one chunk for decoding, blocking while the FIFO is full.
    pub fn push(&self, chunk: Vec<i16>) -> Result<()> {
        match &self.input {
            Some(input) => input.send(chunk).map_err(|_| ModemError::PipelineClosed),
            None => Err(ModemError::PipelineClosed),
        }
    }

    /// Next completed frame, if one is already waiting.
    pub fn try_next_frame(&self) -> Option<Result<Vec<u8>>> {
        self.events.try_recv().ok()
    }

    /// Block until the next frame completes, or until the pipeline is closed
    /// and fully drained.
    pub fn next_frame(&self) -> Option<Result<Vec<u8>>> {
        self.events.recv().ok()
    }

    /// Stop accepting chunks and wait for the worker to finish what is
    /// queued. Frames already decoded stay readable afterwards.
    pub fn close(&mut self) {
        self.input.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("decode worker panicked");
            }
        }
    }
}

impl Default for DecodePipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for DecodePipeline {
    fn drop(&mut self) {
        self.close();
    }
}
