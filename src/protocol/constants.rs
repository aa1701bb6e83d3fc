//! Control bytes and fixed sizes of the console protocol.

/// Start of heading, opens every frame.
pub const SOH: u8 = 0x01;

/// Start of text, precedes the payload.
pub const STX: u8 = 0x02;

/// End of text, closes the payload. The checksum byte follows it.
pub const ETX: u8 = 0x03;

/// Address byte sent by a console in its factory configuration.
pub const DEFAULT_ADDRESS: u8 = 0x7F;

/// Smallest structurally possible frame: SOH, address, STX, ETX, LRC.
pub const MIN_FRAME_LEN: usize = 5;

/// Offset of the STX byte within a frame.
pub const CONTENT_MARKER_OFFSET: usize = 2;

/// Offset of the first payload byte within a frame.
pub const PAYLOAD_OFFSET: usize = 3;
