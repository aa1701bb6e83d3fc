//! Update rate control for snapshot subscriptions

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How often a subscriber wants to see snapshots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateRate {
    /// Every snapshot, one per received frame
    #[default]
    Native,

    /// At most this many snapshots per second, latest wins.
    /// `Max(0)` is treated as `Native`.
    Max(u32),
}

impl UpdateRate {
    /// Coalescing interval, or `None` when every snapshot is delivered.
    pub fn interval(self) -> Option<Duration> {
        match self {
            UpdateRate::Native | UpdateRate::Max(0) => None,
            UpdateRate::Max(hz) => Some(Duration::from_secs_f64(1.0 / hz as f64)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_has_no_interval() {
        assert_eq!(UpdateRate::Native.interval(), None);
        assert_eq!(UpdateRate::Max(0).interval(), None);
    }

    #[test]
    fn max_rate_converts_to_period() {
        assert_eq!(UpdateRate::Max(4).interval(), Some(Duration::from_millis(250)));
    }
}
