//! Frame types flowing between the reader tasks and the aggregation task.

use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};

use super::constants::{ETX, SOH, STX};

/// Raw frame span cut from the byte stream, not yet validated.
///
/// Carries the arrival timestamp and the peer it came from so the aggregation
/// task can stamp snapshots with wire time rather than processing time.
#[derive(Debug, Clone)]
pub struct CandidateFrame {
    /// `SOH … ETX LRC` exactly as received
    pub bytes: Bytes,

    /// When the reader task cut this span from its buffer
    pub received_at: DateTime<Utc>,

    /// Label of the connection that produced it
    pub peer: Arc<str>,
}

impl CandidateFrame {
    /// Create a candidate stamped with the current time.
    pub fn new(bytes: Bytes, peer: Arc<str>) -> Self {
        Self { bytes, received_at: Utc::now(), peer }
    }
}

/// A structurally valid frame.
///
/// The checksum is not required to match: consoles in the field report
/// benign drift, so a mismatch only clears `checksum_valid`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Source address byte
    pub address: u8,

    /// Bytes strictly between STX and ETX
    pub payload: Bytes,

    /// Checksum byte as received
    pub checksum: u8,

    /// Whether `checksum` equals the LRC computed over address..=ETX
    pub checksum_valid: bool,
}

impl Frame {
    /// Payload rendered as lowercase hex, for logs.
    pub fn payload_hex(&self) -> String {
        hex::encode(&self.payload)
    }
}

/// Longitudinal redundancy check: XOR of every byte.
pub fn lrc(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |acc, byte| acc ^ byte)
}

/// Build a complete, correctly checksummed frame around `payload`.
pub fn encode_frame(address: u8, payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(payload.len() + 5);
    frame.push(SOH);
    frame.push(address);
    frame.push(STX);
    frame.extend_from_slice(payload);
    frame.push(ETX);
    frame.push(lrc(&frame[1..]));
    frame
}
