//! Replay source for recorded console captures

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use tokio::time::{Duration, Interval, MissedTickBehavior, interval};
use tracing::{debug, info};

use crate::source::ByteSource;
use crate::{Result, ScoreboardError};

/// Default number of bytes handed out per tick.
pub const DEFAULT_CHUNK_SIZE: usize = 64;

/// Default pacing between chunks.
pub const DEFAULT_PACE: Duration = Duration::from_millis(10);

/// Plays a raw capture file back in fixed-size, paced chunks.
///
/// Chunk boundaries ignore frame boundaries, so replay exercises the same
/// reassembly path as a live socket.
pub struct ReplaySource {
    data: Bytes,
    position: usize,
    chunk_size: usize,
    pace: Duration,
    /// Created on first read, since timers need a running runtime
    interval: Option<Interval>,
    peer: Arc<str>,
}

impl ReplaySource {
    /// Load a capture file with default pacing.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path)
            .await
            .map_err(|e| ScoreboardError::io(format!("read capture {}", path.display()), e))?;

        info!("Opened capture {} ({} bytes)", path.display(), data.len());

        let label = format!("replay:{}", path.display());
        Ok(Self::from_bytes(data, label))
    }

    /// Replay bytes already in memory.
    pub fn from_bytes(data: impl Into<Bytes>, label: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            position: 0,
            chunk_size: DEFAULT_CHUNK_SIZE,
            pace: DEFAULT_PACE,
            interval: None,
            peer: Arc::from(label.into()),
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn with_pace(mut self, pace: Duration) -> Self {
        // interval() panics on a zero period
        self.pace = pace.max(Duration::from_micros(1));
        self.interval = None;
        self
    }

    /// Bytes not yet handed out.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }
}

#[async_trait::async_trait]
impl ByteSource for ReplaySource {
    async fn read_chunk(&mut self) -> Result<Option<Bytes>> {
        if self.remaining() == 0 {
            debug!("Reached end of replay");
            return Ok(None);
        }

        let pace = self.pace;
        let ticker = self.interval.get_or_insert_with(|| {
            let mut ticker = interval(pace);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker
        });
        ticker.tick().await;

        let end = (self.position + self.chunk_size).min(self.data.len());
        let chunk = self.data.slice(self.position..end);
        self.position = end;
        Ok(Some(chunk))
    }

    fn peer(&self) -> Arc<str> {
        Arc::clone(&self.peer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn yields_fixed_size_chunks_then_ends() {
        let mut source = ReplaySource::from_bytes(vec![1u8, 2, 3, 4, 5], "mem")
            .with_chunk_size(2)
            .with_pace(Duration::from_millis(1));

        let mut chunks = Vec::new();
        while let Some(chunk) = source.read_chunk().await.unwrap() {
            chunks.push(chunk.to_vec());
        }
        assert_eq!(chunks, vec![vec![1, 2], vec![3, 4], vec![5]]);
        assert_eq!(source.remaining(), 0);
        assert_eq!(source.peer().as_ref(), "mem");
    }

    #[tokio::test]
    async fn opens_capture_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\x01\x7f\x02G16\x03\x00").unwrap();

        let mut source = ReplaySource::open(file.path()).await.unwrap().with_chunk_size(1024);
        let chunk = source.read_chunk().await.unwrap().unwrap();
        assert_eq!(chunk.len(), 8);
        assert!(source.peer().starts_with("replay:"));
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let result = ReplaySource::open("/nonexistent/capture.bin").await;
        assert!(matches!(result, Err(ScoreboardError::Io { .. })));
    }
}
