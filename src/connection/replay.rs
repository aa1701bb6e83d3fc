//! Replay of recorded console captures

use std::path::Path;

use tracing::info;

use super::{ScoreboardConnection, TransportChannels};
use crate::Result;
use crate::config::PipelineOptions;
use crate::decode::MessageDecoder;
use crate::driver::Driver;
use crate::sink::SnapshotSink;
use crate::source::ByteSource;
use crate::sources::ReplaySource;

impl ScoreboardConnection {
    /// Feed a raw capture file through the pipeline.
    ///
    /// The pipeline stops by itself after the last byte; await
    /// [`finished`](Self::finished) to know when every frame has been merged.
    pub async fn replay<P, S>(
        path: P,
        options: PipelineOptions,
        decoder: MessageDecoder,
        sink: S,
    ) -> Result<Self>
    where
        P: AsRef<Path>,
        S: SnapshotSink,
    {
        let source = ReplaySource::open(path).await?;
        Ok(Self::from_source(source, options, decoder, sink))
    }

    /// Run the pipeline over any byte source until it ends.
    pub fn from_source<B, S>(
        source: B,
        options: PipelineOptions,
        decoder: MessageDecoder,
        sink: S,
    ) -> Self
    where
        B: ByteSource,
        S: SnapshotSink,
    {
        Self::start(options.expected_address, decoder, sink, None, |channels| {
            let TransportChannels { frames, cancel } = channels;
            let capacity = options.read_buffer_size;
            tokio::spawn(async move {
                let summary = Driver::read_source(source, frames, cancel, capacity).await;
                info!("Source drained: {} bytes, {} frames", summary.bytes, summary.frames);
            })
        })
    }
}
