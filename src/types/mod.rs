//! Core types for scoreboard data representation.
//!
//! - [`MessageEvent`] is what one validated frame decodes into
//! - [`MatchState`] is the aggregate the events are merged into
//! - [`MatchSnapshot`] is the immutable copy published after every merge
//! - [`GameTime`] is a `MM:SS` clock reading
//!
//! ## Usage Example
//!
//! ```rust
//! use scorelink::types::{GameTime, MatchSnapshot, ScoreLine};
//!
//! let snapshot = MatchSnapshot::initial();
//! assert_eq!(snapshot.state.score, ScoreLine::new(0, 0));
//! assert_eq!(snapshot.state.clock.time, GameTime::ZERO);
//! assert_eq!(snapshot.state.clock.period, 1);
//! assert_eq!(snapshot.sequence(), 0);
//! ```

mod event;
mod game_time;
mod match_state;
mod update_rate;

pub use event::{ByteTrace, MessageEvent, MessageKind, PenaltyReport, ScoreLine, UnknownPayload};
pub use game_time::GameTime;
pub use match_state::{
    FrameMeta, MatchClock, MatchSnapshot, MatchState, Penalties, PenaltySlot, Team, TeamPenalties,
};
pub use update_rate::UpdateRate;
