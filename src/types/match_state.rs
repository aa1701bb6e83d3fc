//! Match state and the snapshots published to overlays.
//!
//! Serialization follows the document layout the broadcast overlays already
//! read (`score`, `MatchClock`, `Penalties` with `HPP1-active`-style keys), so
//! switching capture tools does not require touching the overlay templates.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::{GameTime, MessageKind, ScoreLine};

/// Side of the scoreboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Team {
    Home,
    Guest,
}

impl Team {
    fn key_prefix(self) -> char {
        match self {
            Team::Home => 'H',
            Team::Guest => 'G',
        }
    }
}

/// Game clock and period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchClock {
    pub time: GameTime,
    /// No message type supplies the period yet; it stays at 1.
    pub period: u8,
}

impl Default for MatchClock {
    fn default() -> Self {
        Self { time: GameTime::ZERO, period: 1 }
    }
}

/// One penalty slot: whether a player is serving time and how much is left.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PenaltySlot {
    pub active: bool,
    pub remaining: GameTime,
}

/// Penalty slots for one team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamPenalties {
    pub team: Team,
    pub slots: [PenaltySlot; 2],
}

impl TeamPenalties {
    pub fn new(team: Team) -> Self {
        Self { team, slots: [PenaltySlot::default(); 2] }
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.active).count()
    }
}

impl Serialize for TeamPenalties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.slots.len()))?;
        for (i, slot) in self.slots.iter().enumerate() {
            let entry = SlotEntry { prefix: self.team.key_prefix(), number: i + 1, slot };
            map.serialize_entry(&format!("Player{}", i + 1), &entry)?;
        }
        map.end()
    }
}

struct SlotEntry<'a> {
    prefix: char,
    number: usize,
    slot: &'a PenaltySlot,
}

impl Serialize for SlotEntry<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(
            &format!("{}PP{}-active", self.prefix, self.number),
            &u8::from(self.slot.active),
        )?;
        map.serialize_entry(&format!("{}PP{}-Time", self.prefix, self.number), &self.slot.remaining)?;
        map.end()
    }
}

/// Penalty slots for both teams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Penalties {
    #[serde(rename = "HomeTeam")]
    pub home: TeamPenalties,
    #[serde(rename = "GuestTeam")]
    pub guest: TeamPenalties,
}

impl Default for Penalties {
    fn default() -> Self {
        Self { home: TeamPenalties::new(Team::Home), guest: TeamPenalties::new(Team::Guest) }
    }
}

/// The aggregate view of the match.
///
/// Every field holds the most recently observed value; fields no event has
/// mentioned keep their initial value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchState {
    pub score: ScoreLine,
    #[serde(rename = "MatchClock")]
    pub clock: MatchClock,
    #[serde(rename = "Penalties")]
    pub penalties: Penalties,
}

/// Metadata of the frame that produced a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameMeta {
    /// Position of the frame in processing order, starting at 1
    pub sequence: u64,
    /// Wire arrival time
    pub received_at: DateTime<Utc>,
    pub message_type: MessageKind,
    /// False when the console's checksum did not match; the frame was decoded anyway
    pub checksum_valid: bool,
    /// Connection the frame arrived on
    pub peer: Arc<str>,
}

/// Immutable copy of the match state handed to sinks and subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchSnapshot {
    #[serde(flatten)]
    pub state: MatchState,
    /// `None` until the first frame has been merged
    #[serde(rename = "LastFrame")]
    pub last_frame: Option<FrameMeta>,
}

impl MatchSnapshot {
    /// Snapshot of a freshly started match, before any frame.
    pub fn initial() -> Self {
        Self { state: MatchState::default(), last_frame: None }
    }

    /// Sequence number of the frame behind this snapshot (0 for the initial one).
    pub fn sequence(&self) -> u64 {
        self.last_frame.as_ref().map_or(0, |meta| meta.sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn initial_state_matches_fresh_match() {
        let state = MatchState::default();
        assert_eq!(state.score, ScoreLine::new(0, 0));
        assert_eq!(state.clock.time, GameTime::ZERO);
        assert_eq!(state.clock.period, 1);
        assert_eq!(state.penalties.home.active_count(), 0);
        assert_eq!(state.penalties.guest.active_count(), 0);
    }

    #[test]
    fn document_uses_overlay_layout() {
        let value = serde_json::to_value(MatchSnapshot::initial()).unwrap();
        assert_eq!(
            value,
            json!({
                "score": { "home": 0, "guest": 0 },
                "MatchClock": { "time": "00:00", "period": 1 },
                "Penalties": {
                    "HomeTeam": {
                        "Player1": { "HPP1-active": 0, "HPP1-Time": "00:00" },
                        "Player2": { "HPP2-active": 0, "HPP2-Time": "00:00" }
                    },
                    "GuestTeam": {
                        "Player1": { "GPP1-active": 0, "GPP1-Time": "00:00" },
                        "Player2": { "GPP2-active": 0, "GPP2-Time": "00:00" }
                    }
                },
                "LastFrame": null
            })
        );
    }

    #[test]
    fn active_penalty_serializes_as_one() {
        let mut state = MatchState::default();
        state.penalties.guest.slots[1] =
            PenaltySlot { active: true, remaining: GameTime::new(1, 30) };

        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["Penalties"]["GuestTeam"]["Player2"]["GPP2-active"], 1);
        assert_eq!(value["Penalties"]["GuestTeam"]["Player2"]["GPP2-Time"], "01:30");
        assert_eq!(state.penalties.guest.active_count(), 1);
    }

    #[test]
    fn last_frame_exposes_checksum_flag() {
        let snapshot = MatchSnapshot {
            state: MatchState::default(),
            last_frame: Some(FrameMeta {
                sequence: 7,
                received_at: Utc::now(),
                message_type: MessageKind::Score,
                checksum_valid: false,
                peer: Arc::from("127.0.0.1:5000"),
            }),
        };

        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["LastFrame"]["sequence"], 7);
        assert_eq!(value["LastFrame"]["checksum_valid"], false);
        assert_eq!(value["LastFrame"]["message_type"], "score");
        assert_eq!(snapshot.sequence(), 7);
    }
}
