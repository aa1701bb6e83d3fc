//! Clock readings as shown on the scoreboard

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A `MM:SS` clock reading.
///
/// Both fields come from two ASCII digits on the wire, so each stays within 0..=99.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GameTime {
    pub minutes: u8,
    pub seconds: u8,
}

impl GameTime {
    pub const ZERO: GameTime = GameTime { minutes: 0, seconds: 0 };

    pub fn new(minutes: u8, seconds: u8) -> Self {
        Self { minutes, seconds }
    }

    /// Parse a `MM:SS` string.
    pub fn parse(text: &str) -> Option<Self> {
        let (minutes, seconds) = text.split_once(':')?;
        Some(Self { minutes: minutes.parse().ok()?, seconds: seconds.parse().ok()? })
    }
}

impl fmt::Display for GameTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes, self.seconds)
    }
}

impl Serialize for GameTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GameTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        GameTime::parse(&text)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid MM:SS time '{}'", text)))
    }
}
