//! Destinations for published snapshots.
//!
//! The aggregation task hands every snapshot to one [`SnapshotSink`]. A sink
//! failure is logged by the caller and never stops the pipeline; the next
//! snapshot simply tries again.

mod json_file;

pub use json_file::JsonFileSink;

use crate::Result;
use crate::types::MatchSnapshot;

/// Receives every snapshot the aggregator produces.
#[async_trait::async_trait]
pub trait SnapshotSink: Send + 'static {
    async fn publish(&mut self, snapshot: &MatchSnapshot) -> Result<()>;
}

/// Sink that drops everything, for subscribers that only use the watch channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardSink;

#[async_trait::async_trait]
impl SnapshotSink for DiscardSink {
    async fn publish(&mut self, _snapshot: &MatchSnapshot) -> Result<()> {
        Ok(())
    }
}

#[async_trait::async_trait]
impl SnapshotSink for Box<dyn SnapshotSink> {
    async fn publish(&mut self, snapshot: &MatchSnapshot) -> Result<()> {
        (**self).publish(snapshot).await
    }
}

/// Fan-out: every sink sees every snapshot, even after an earlier one failed.
/// Returns the first failure.
#[async_trait::async_trait]
impl SnapshotSink for Vec<Box<dyn SnapshotSink>> {
    async fn publish(&mut self, snapshot: &MatchSnapshot) -> Result<()> {
        let mut first_error = None;
        for sink in self.iter_mut() {
            if let Err(e) = sink.publish(snapshot).await {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}
