//! Structural and checksum validation of candidate frames.

use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, warn};

use super::constants::{
    CONTENT_MARKER_OFFSET, DEFAULT_ADDRESS, ETX, MIN_FRAME_LEN, PAYLOAD_OFFSET, SOH, STX,
};
use super::frame::{Frame, lrc};

/// Why a candidate was dropped without producing a [`Frame`].
///
/// A checksum mismatch is deliberately absent: it is reported through
/// [`Frame::checksum_valid`] instead.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    #[error("frame too short: {len} bytes (minimum 5)")]
    TooShort { len: usize },

    #[error("bad start marker: expected 0x01, got {found:#04x}")]
    BadStartMarker { found: u8 },

    #[error("bad content marker: expected 0x02, got {found:#04x}")]
    BadContentMarker { found: u8 },

    #[error("no end marker after content start")]
    NoEndMarker,

    #[error("checksum byte missing after end marker")]
    MissingChecksum,
}

/// Validates candidate frames against the console wire format.
#[derive(Debug, Clone, Copy)]
pub struct FrameValidator {
    expected_address: u8,
}

impl Default for FrameValidator {
    fn default() -> Self {
        Self::new(DEFAULT_ADDRESS)
    }
}

impl FrameValidator {
    /// Create a validator expecting frames from `expected_address`.
    ///
    /// Frames from other addresses are still accepted; the mismatch is only logged.
    pub fn new(expected_address: u8) -> Self {
        Self { expected_address }
    }

    /// Address this validator expects.
    pub fn expected_address(&self) -> u8 {
        self.expected_address
    }

    /// Validate a candidate span `SOH ADDRESS STX PAYLOAD ETX LRC`.
    pub fn validate(&self, candidate: &[u8]) -> Result<Frame, RejectReason> {
        if candidate.len() < MIN_FRAME_LEN {
            return Err(RejectReason::TooShort { len: candidate.len() });
        }

        if candidate[0] != SOH {
            return Err(RejectReason::BadStartMarker { found: candidate[0] });
        }

        let address = candidate[1];
        if address != self.expected_address {
            debug!(
                address = format_args!("{:#04x}", address),
                expected = format_args!("{:#04x}", self.expected_address),
                "Frame from unexpected address"
            );
        }

        if candidate[CONTENT_MARKER_OFFSET] != STX {
            return Err(RejectReason::BadContentMarker { found: candidate[CONTENT_MARKER_OFFSET] });
        }

        let end = candidate[PAYLOAD_OFFSET..]
            .iter()
            .position(|&b| b == ETX)
            .map(|i| i + PAYLOAD_OFFSET)
            .ok_or(RejectReason::NoEndMarker)?;

        let checksum = *candidate.get(end + 1).ok_or(RejectReason::MissingChecksum)?;
        let calculated = lrc(&candidate[1..=end]);
        let checksum_valid = checksum == calculated;

        if !checksum_valid {
            warn!(
                received = format_args!("{:#04x}", checksum),
                calculated = format_args!("{:#04x}", calculated),
                "Checksum mismatch, decoding anyway"
            );
        }

        Ok(Frame {
            address,
            payload: Bytes::copy_from_slice(&candidate[PAYLOAD_OFFSET..end]),
            checksum,
            checksum_valid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::encode_frame;
    use crate::test_utils::score_payload;

    #[test]
    fn accepts_well_formed_frame() {
        let payload = score_payload(35, 2);
        let frame = FrameValidator::default().validate(&encode_frame(0x7F, &payload)).unwrap();

        assert_eq!(frame.address, 0x7F);
        assert_eq!(frame.payload.as_ref(), payload.as_slice());
        assert!(frame.checksum_valid);
    }

    #[test]
    fn rejects_short_candidate() {
        let result = FrameValidator::default().validate(&[SOH, 0x7F, STX, ETX]);
        assert_eq!(result, Err(RejectReason::TooShort { len: 4 }));
    }

    #[test]
    fn rejects_bad_start_marker() {
        let mut bytes = encode_frame(0x7F, b"G1");
        bytes[0] = 0x05;
        let result = FrameValidator::default().validate(&bytes);
        assert_eq!(result, Err(RejectReason::BadStartMarker { found: 0x05 }));
    }

    #[test]
    fn rejects_bad_content_marker() {
        let mut bytes = encode_frame(0x7F, b"G1");
        bytes[2] = b'X';
        let result = FrameValidator::default().validate(&bytes);
        assert_eq!(result, Err(RejectReason::BadContentMarker { found: b'X' }));
    }

    #[test]
    fn rejects_missing_end_marker() {
        let result = FrameValidator::default().validate(&[SOH, 0x7F, STX, b'G', b'1', 0x44]);
        assert_eq!(result, Err(RejectReason::NoEndMarker));
    }

    #[test]
    fn rejects_missing_checksum() {
        let result = FrameValidator::default().validate(&[SOH, 0x7F, STX, b'G', ETX]);
        assert_eq!(result, Err(RejectReason::MissingChecksum));
    }

    #[test]
    fn checksum_mismatch_still_yields_frame() {
        let mut bytes = encode_frame(0x7F, b"G16");
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;

        let frame = FrameValidator::default().validate(&bytes).unwrap();
        assert!(!frame.checksum_valid);
        assert_eq!(frame.payload.as_ref(), b"G16");
        assert_eq!(frame.checksum, bytes[last]);
    }

    #[test]
    fn unexpected_address_is_not_fatal() {
        let frame = FrameValidator::new(0x7F).validate(&encode_frame(0x10, b"G1")).unwrap();
        assert_eq!(frame.address, 0x10);
        assert!(frame.checksum_valid);
    }

    #[test]
    fn empty_payload_is_valid() {
        let frame = FrameValidator::default().validate(&encode_frame(0x7F, &[])).unwrap();
        assert!(frame.payload.is_empty());
        assert!(frame.checksum_valid);
    }

    #[test]
    fn reject_reasons_describe_themselves() {
        let reason = RejectReason::BadStartMarker { found: 0x05 };
        assert_eq!(reason.to_string(), "bad start marker: expected 0x01, got 0x05");
        assert!(RejectReason::TooShort { len: 2 }.to_string().contains("minimum 5"));
    }
}
