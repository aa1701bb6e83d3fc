//! Payload decoding into typed message events.
//!
//! The console tags each payload with a type byte in position 1. Dispatch goes
//! through a [`DecoderRegistry`] mapping that byte to a [`PayloadDecoder`], so a
//! vendor-specific message type is added by registering a decoder rather than
//! by editing the dispatch:
//!
//! | byte | decoder            | event                  |
//! |------|--------------------|------------------------|
//! | `'6'`| [`ScoreDecoder`]   | [`MessageEvent::Score`]  |
//! | `'7'`| [`ClockDecoder`]   | [`MessageEvent::Clock`]  |
//! | `'8'`| [`PenaltyDecoder`] | [`MessageEvent::Penalty`]|
//! | other| [`GenericDecoder`] | [`MessageEvent::Unknown`]|
//!
//! Decoding never fails. Anything unrecognised surfaces as an unknown event
//! with a byte trace, so the operator always sees what the console sent.
//!
//! # Example
//!
//! ```rust
//! use scorelink::decode::MessageDecoder;
//! use scorelink::protocol::{FrameValidator, encode_frame};
//! use scorelink::types::{MessageEvent, ScoreLine};
//!
//! let payload = b"G60\x801350200";
//! let frame = FrameValidator::default().validate(&encode_frame(0x7F, payload)).unwrap();
//!
//! let event = MessageDecoder::default().decode(&frame);
//! assert_eq!(event, MessageEvent::Score(Some(ScoreLine::new(35, 2))));
//! ```

mod clock;
mod generic;
mod penalty;
mod registry;
mod score;

pub use clock::ClockDecoder;
pub use generic::GenericDecoder;
pub use penalty::PenaltyDecoder;
pub use registry::DecoderRegistry;
pub use score::ScoreDecoder;

use tracing::trace;

use crate::protocol::Frame;
use crate::types::MessageEvent;

/// Turns the payload of one message type into an event.
pub trait PayloadDecoder: Send + Sync + 'static {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Decode `payload` (the bytes between STX and ETX). Must not panic on
    /// short or malformed input.
    fn decode(&self, payload: &[u8]) -> MessageEvent;
}

/// Dispatches validated frames to the registered decoders.
pub struct MessageDecoder {
    registry: DecoderRegistry,
}

impl Default for MessageDecoder {
    fn default() -> Self {
        Self::new(DecoderRegistry::standard())
    }
}

impl MessageDecoder {
    pub fn new(registry: DecoderRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &DecoderRegistry {
        &self.registry
    }

    pub fn decode(&self, frame: &Frame) -> MessageEvent {
        let decoder = self.registry.resolve(&frame.payload);
        trace!(decoder = decoder.name(), len = frame.payload.len(), "Dispatching payload");
        decoder.decode(&frame.payload)
    }
}

/// Value of an ASCII digit byte, `None` for anything outside `'0'..='9'`.
pub(crate) fn ascii_digit(byte: u8) -> Option<u8> {
    byte.is_ascii_digit().then(|| byte - b'0')
}

/// Digit at `index`, counting missing or non-digit bytes as 0.
pub(crate) fn digit_or_zero(payload: &[u8], index: usize) -> u8 {
    payload.get(index).copied().and_then(ascii_digit).unwrap_or(0)
}
