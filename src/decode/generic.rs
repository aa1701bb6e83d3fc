//! Fallback for payloads no typed decoder claims.

use bytes::Bytes;

use super::PayloadDecoder;
use crate::types::{ByteTrace, MessageEvent, UnknownPayload};

/// Records the payload for inspection instead of extracting fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericDecoder;

impl GenericDecoder {
    /// Maximal runs of printable ASCII (0x20..=0x7E).
    pub fn ascii_segments(payload: &[u8]) -> Vec<String> {
        payload
            .split(|byte| !(0x20..=0x7E).contains(byte))
            .filter(|run| !run.is_empty())
            .map(|run| run.iter().map(|&b| char::from(b)).collect())
            .collect()
    }

    pub fn byte_trace(payload: &[u8]) -> Vec<ByteTrace> {
        payload.iter().enumerate().map(|(index, &value)| ByteTrace { index, value }).collect()
    }
}

impl PayloadDecoder for GenericDecoder {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn decode(&self, payload: &[u8]) -> MessageEvent {
        MessageEvent::Unknown(UnknownPayload {
            raw: Bytes::copy_from_slice(payload),
            ascii_segments: Self::ascii_segments(payload),
            byte_trace: Self::byte_trace(payload),
        })
    }
}
