//! Penalty messages (type byte `'8'`).

use super::PayloadDecoder;
use crate::types::{MessageEvent, PenaltyReport};

/// Claims penalty messages without extracting fields.
///
/// The penalty layout is not mapped yet; registering a replacement decoder
/// for `'8'` is enough to start populating penalty slots.
#[derive(Debug, Clone, Copy, Default)]
pub struct PenaltyDecoder;

impl PayloadDecoder for PenaltyDecoder {
    fn name(&self) -> &'static str {
        "penalty"
    }

    fn decode(&self, _payload: &[u8]) -> MessageEvent {
        MessageEvent::Penalty(PenaltyReport::default())
    }
}
