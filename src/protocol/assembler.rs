//! Rolling buffer that cuts candidate frames out of a byte stream.
//!
//! Socket reads arrive at arbitrary boundaries: one read may hold half a frame,
//! three frames, or line noise. The assembler keeps whatever is left over
//! between calls and resynchronizes on the start delimiter:
//!
//! - no SOH anywhere: the buffer is discarded (the link is desynchronized)
//! - SOH past offset 0: everything before it is dropped as garbage
//! - SOH without ETX, or ETX without the trailing checksum: wait for more bytes
//!
//! Payloads containing SOH or ETX are not supported by the protocol and are
//! not special-cased here.
//!
//! # Example
//!
//! ```
//! use scorelink::protocol::{FrameAssembler, encode_frame};
//!
//! let frame = encode_frame(0x7F, b"G16");
//! let mut assembler = FrameAssembler::new();
//!
//! assert!(assembler.feed(&frame[..4]).is_empty());
//! let frames = assembler.feed(&frame[4..]);
//! assert_eq!(frames.len(), 1);
//! assert_eq!(frames[0].as_ref(), frame.as_slice());
//! ```

use bytes::{Bytes, BytesMut};
use tracing::{debug, warn};

use super::constants::{ETX, SOH};

/// Counters describing what the assembler has done so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssemblerStats {
    /// Candidate frames emitted
    pub frames: u64,
    /// Times the whole buffer was discarded for lack of a start delimiter
    pub resyncs: u64,
    /// Bytes thrown away, by resync or as leading garbage
    pub bytes_dropped: u64,
}

/// Per-connection frame assembler.
pub struct FrameAssembler {
    buffer: BytesMut,
    stats: AssemblerStats,
}

impl Default for FrameAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameAssembler {
    /// Create an assembler with a 4KB initial buffer.
    pub fn new() -> Self {
        Self::with_capacity(4 * 1024)
    }

    /// Create an assembler with a custom initial buffer capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { buffer: BytesMut::with_capacity(capacity), stats: AssemblerStats::default() }
    }

    /// Append `chunk` and return every candidate frame now complete.
    ///
    /// Each returned span starts with SOH and ends with the checksum byte
    /// following ETX. Incomplete trailing data stays buffered.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Bytes> {
        self.buffer.extend_from_slice(chunk);

        let mut frames = Vec::new();
        while let Some(frame) = self.try_extract_one() {
            frames.push(frame);
        }
        frames
    }

    fn try_extract_one(&mut self) -> Option<Bytes> {
        if self.buffer.is_empty() {
            return None;
        }

        let Some(start) = self.buffer.iter().position(|&b| b == SOH) else {
            warn!(
                bytes = self.buffer.len(),
                hex = %hex::encode(&self.buffer),
                "No start delimiter in buffer, resynchronizing"
            );
            self.stats.resyncs += 1;
            self.stats.bytes_dropped += self.buffer.len() as u64;
            self.buffer.clear();
            return None;
        };

        if start > 0 {
            let garbage = self.buffer.split_to(start);
            warn!(
                bytes = garbage.len(),
                hex = %hex::encode(&garbage),
                "Dropping bytes before start delimiter"
            );
            self.stats.bytes_dropped += garbage.len() as u64;
        }

        let Some(end) = self.buffer.iter().skip(1).position(|&b| b == ETX).map(|i| i + 1) else {
            debug!(buffered = self.buffer.len(), "Incomplete frame, waiting for end delimiter");
            return None;
        };

        if self.buffer.len() <= end + 1 {
            debug!(buffered = self.buffer.len(), "Incomplete frame, waiting for checksum byte");
            return None;
        }

        self.stats.frames += 1;
        Some(self.buffer.split_to(end + 2).freeze())
    }

    /// Number of bytes held back waiting for the rest of a frame.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Counters accumulated since creation.
    pub fn stats(&self) -> AssemblerStats {
        self.stats
    }
}
