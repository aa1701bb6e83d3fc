//! Last-write-wins fold of decoded events into the match state.
//!
//! The aggregator is owned by the aggregation task and is the only writer of
//! [`MatchState`]. Every merge, including one that changes nothing, yields a
//! fresh [`MatchSnapshot`] so downstream sinks see a heartbeat per frame.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::protocol::{CandidateFrame, Frame};
use crate::types::{FrameMeta, MatchSnapshot, MatchState, MessageEvent};

/// Where and when a merged event came from.
#[derive(Debug, Clone)]
pub struct FrameOrigin {
    pub received_at: DateTime<Utc>,
    pub checksum_valid: bool,
    pub peer: Arc<str>,
}

impl FrameOrigin {
    pub fn new(candidate: &CandidateFrame, frame: &Frame) -> Self {
        Self {
            received_at: candidate.received_at,
            checksum_valid: frame.checksum_valid,
            peer: Arc::clone(&candidate.peer),
        }
    }
}

/// Folds [`MessageEvent`]s into a [`MatchState`].
#[derive(Debug)]
pub struct MatchStateAggregator {
    state: MatchState,
    sequence: u64,
    latest: Arc<MatchSnapshot>,
}

impl Default for MatchStateAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchStateAggregator {
    /// Start from a fresh match: 0-0, `00:00`, period 1, no penalties.
    pub fn new() -> Self {
        Self { state: MatchState::default(), sequence: 0, latest: Arc::new(MatchSnapshot::initial()) }
    }

    /// Apply `event` and publish the resulting snapshot.
    pub fn merge(&mut self, event: &MessageEvent, origin: FrameOrigin) -> Arc<MatchSnapshot> {
        match event {
            MessageEvent::Score(Some(score)) => {
                if self.state.score != *score {
                    debug!(home = score.home, guest = score.guest, "Score updated");
                }
                self.state.score = *score;
            }
            MessageEvent::Clock(Some(time)) => {
                self.state.clock.time = *time;
            }
            MessageEvent::Score(None)
            | MessageEvent::Clock(None)
            | MessageEvent::Penalty(_)
            | MessageEvent::Unknown(_) => {}
        }

        self.sequence += 1;
        let snapshot = Arc::new(MatchSnapshot {
            state: self.state.clone(),
            last_frame: Some(FrameMeta {
                sequence: self.sequence,
                received_at: origin.received_at,
                message_type: event.kind(),
                checksum_valid: origin.checksum_valid,
                peer: origin.peer,
            }),
        });
        self.latest = Arc::clone(&snapshot);
        snapshot
    }

    /// Current match state.
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Most recently published snapshot.
    pub fn snapshot(&self) -> Arc<MatchSnapshot> {
        Arc::clone(&self.latest)
    }

    /// Number of events merged so far.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}
