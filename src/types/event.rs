//! Decoded message events

use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::GameTime;

/// Home and guest score carried by a score message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreLine {
    pub home: u8,
    pub guest: u8,
}

impl ScoreLine {
    pub fn new(home: u8, guest: u8) -> Self {
        Self { home, guest }
    }
}

/// Content of a penalty message.
///
/// The penalty layout has not been mapped yet, so the report is always empty
/// and never touches match state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PenaltyReport {}

/// One payload byte, for operator display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteTrace {
    pub index: usize,
    pub value: u8,
}

impl fmt::Display for ByteTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Byte[{}]: 0x{:02X} ({})", self.index, self.value, self.value)
    }
}

/// A payload no decoder claimed, kept for human inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPayload {
    /// Payload exactly as received
    pub raw: Bytes,
    /// Printable ASCII runs, split at every non-printable byte
    pub ascii_segments: Vec<String>,
    /// One entry per payload byte
    pub byte_trace: Vec<ByteTrace>,
}

/// Event produced from exactly one validated frame.
///
/// `Score(None)` and `Clock(None)` mark messages that were recognised by type
/// but carried no usable fields; they merge as no-ops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageEvent {
    Score(Option<ScoreLine>),
    Clock(Option<GameTime>),
    Penalty(PenaltyReport),
    Unknown(UnknownPayload),
}

impl MessageEvent {
    pub fn kind(&self) -> MessageKind {
        match self {
            MessageEvent::Score(_) => MessageKind::Score,
            MessageEvent::Clock(_) => MessageKind::Clock,
            MessageEvent::Penalty(_) => MessageKind::Penalty,
            MessageEvent::Unknown(_) => MessageKind::Unknown,
        }
    }
}

/// Message type label, as written to logs and the overlay document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Score,
    Clock,
    Penalty,
    #[default]
    Unknown,
}

impl MessageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::Score => "score",
            MessageKind::Clock => "clock",
            MessageKind::Penalty => "penalty",
            MessageKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_trace_renders_hex_and_decimal() {
        let trace = ByteTrace { index: 3, value: 0x80 };
        assert_eq!(trace.to_string(), "Byte[3]: 0x80 (128)");
    }

    #[test]
    fn kind_matches_variant() {
        assert_eq!(MessageEvent::Score(None).kind(), MessageKind::Score);
        assert_eq!(MessageEvent::Clock(Some(GameTime::ZERO)).kind(), MessageKind::Clock);
        assert_eq!(MessageEvent::Penalty(PenaltyReport::default()).kind(), MessageKind::Penalty);
        assert_eq!(MessageKind::Penalty.to_string(), "penalty");
    }

    #[test]
    fn kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&MessageKind::Clock).unwrap(), "\"clock\"");
    }
}
