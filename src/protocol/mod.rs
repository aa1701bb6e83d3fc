//! Wire protocol of the scoreboard console.
//!
//! Frames travel as `SOH ADDRESS STX PAYLOAD ETX LRC`, where the LRC is the XOR
//! of every byte from `ADDRESS` through `ETX` inclusive.
//!
//! - [`FrameAssembler`] turns arbitrary socket reads into candidate frames
//! - [`FrameValidator`] checks structure and checksum, producing a [`Frame`]
//! - [`encode_frame`] builds a correctly checksummed frame (simulators, tests)

mod assembler;
pub mod constants;
mod frame;
mod validator;

pub use assembler::{AssemblerStats, FrameAssembler};
pub use frame::{CandidateFrame, Frame, encode_frame, lrc};
pub use validator::{FrameValidator, RejectReason};
