//! Overlay document on disk

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::trace;

use super::SnapshotSink;
use crate::types::MatchSnapshot;
use crate::{Result, ScoreboardError};

/// Writes each snapshot as a JSON document that OBS or vMix poll.
///
/// The document is written next to its destination and renamed over it, so a
/// reader never sees a half-written file.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
    staging: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut staging_name = path.file_name().map(OsString::from).unwrap_or_default();
        staging_name.push(".tmp");
        let staging = path.with_file_name(staging_name);
        Self { path, staging }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Render a snapshot with 4-space indentation.
    pub fn render(snapshot: &MatchSnapshot) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(1024);
        let mut serializer = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
        snapshot.serialize(&mut serializer)?;
        out.push(b'\n');
        Ok(out)
    }
}

#[async_trait::async_trait]
impl SnapshotSink for JsonFileSink {
    async fn publish(&mut self, snapshot: &MatchSnapshot) -> Result<()> {
        let document = Self::render(snapshot)?;

        tokio::fs::write(&self.staging, &document)
            .await
            .map_err(|e| ScoreboardError::sink_error(self.staging.clone(), e))?;
        tokio::fs::rename(&self.staging, &self.path)
            .await
            .map_err(|e| ScoreboardError::sink_error(self.path.clone(), e))?;

        trace!(path = %self.path.display(), sequence = snapshot.sequence(), "Wrote overlay document");
        Ok(())
    }
}
