//! Driver spawns and manages pipeline tasks
//!
//! Topology:
//!
//! ```text
//! reader task (per connection)            aggregation task (one)
//!   ByteSource -> FrameAssembler  --mpsc-->  validate -> decode -> merge
//!                                                  |
//!                                     watch<Arc<MatchSnapshot>> + SnapshotSink
//! ```
//!
//! Reader tasks own nothing but their socket and assembler. The aggregation
//! task is the only writer of match state, so frames are merged strictly in
//! the order they were queued.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::aggregator::{FrameOrigin, MatchStateAggregator};
use crate::decode::MessageDecoder;
use crate::protocol::{CandidateFrame, Frame, FrameAssembler, FrameValidator};
use crate::sink::SnapshotSink;
use crate::source::ByteSource;
use crate::types::{MatchSnapshot, MessageEvent};

/// Handles returned by [`Driver::spawn`]
pub struct DriverChannels {
    /// Queue feeding the aggregation task; clone one per reader
    pub frames: mpsc::UnboundedSender<CandidateFrame>,
    /// Receiver for published snapshots
    pub snapshots: watch::Receiver<Arc<MatchSnapshot>>,
    /// Cancellation token for graceful shutdown
    pub cancel: CancellationToken,
    /// The aggregation task
    pub aggregation: JoinHandle<()>,
}

/// Totals reported when a reader task ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReaderSummary {
    pub bytes: u64,
    pub frames: u64,
}

/// Driver spawns the aggregation task and runs reader loops.
pub struct Driver;

impl Driver {
    /// Spawn the aggregation task.
    ///
    /// The task runs until `cancel` fires or every frame sender is dropped.
    pub fn spawn<S>(
        validator: FrameValidator,
        decoder: MessageDecoder,
        sink: S,
        cancel: CancellationToken,
    ) -> DriverChannels
    where
        S: SnapshotSink,
    {
        let (frame_tx, frame_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(Arc::new(MatchSnapshot::initial()));

        let cancel_task = cancel.clone();
        let aggregation = tokio::spawn(async move {
            Self::aggregation_task(validator, decoder, sink, frame_rx, snapshot_tx, cancel_task)
                .await;
        });

        DriverChannels { frames: frame_tx, snapshots: snapshot_rx, cancel, aggregation }
    }

    /// Read `source` until it ends, fails or `cancel` fires, queueing every candidate frame.
    pub async fn read_source<B>(
        mut source: B,
        frames: mpsc::UnboundedSender<CandidateFrame>,
        cancel: CancellationToken,
        buffer_capacity: usize,
    ) -> ReaderSummary
    where
        B: ByteSource,
    {
        let peer = source.peer();
        let mut assembler = FrameAssembler::with_capacity(buffer_capacity);
        let mut summary = ReaderSummary::default();
        info!(peer = %peer, "Reader started");

        loop {
            let result = tokio::select! {
                _ = cancel.cancelled() => {
                    debug!(peer = %peer, "Reader cancelled");
                    break;
                }
                result = source.read_chunk() => result,
            };

            let chunk = match result {
                Ok(Some(chunk)) => chunk,
                Ok(None) => {
                    info!(peer = %peer, "Connection closed by peer");
                    break;
                }
                Err(e) => {
                    warn!(peer = %peer, "Read failed: {}", e);
                    break;
                }
            };

            summary.bytes += chunk.len() as u64;
            trace!(peer = %peer, bytes = chunk.len(), hex = %hex::encode(&chunk), "Chunk received");

            for bytes in assembler.feed(&chunk) {
                summary.frames += 1;
                if frames.send(CandidateFrame::new(bytes, Arc::clone(&peer))).is_err() {
                    debug!(peer = %peer, "Aggregation task gone, stopping reader");
                    return summary;
                }
            }
        }

        let stats = assembler.stats();
        if assembler.buffered() > 0 {
            debug!(peer = %peer, bytes = assembler.buffered(), "Discarding partial frame");
        }
        info!(
            peer = %peer,
            bytes = summary.bytes,
            frames = summary.frames,
            resyncs = stats.resyncs,
            dropped = stats.bytes_dropped,
            "Reader ended"
        );
        summary
    }

    async fn aggregation_task<S>(
        validator: FrameValidator,
        decoder: MessageDecoder,
        mut sink: S,
        mut frames: mpsc::UnboundedReceiver<CandidateFrame>,
        snapshots: watch::Sender<Arc<MatchSnapshot>>,
        cancel: CancellationToken,
    ) where
        S: SnapshotSink,
    {
        info!("Aggregation task started");
        let mut aggregator = MatchStateAggregator::new();
        let mut rejected = 0u64;

        loop {
            let candidate = tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Aggregation cancelled");
                    break;
                }
                candidate = frames.recv() => match candidate {
                    Some(candidate) => candidate,
                    None => {
                        debug!("All frame senders dropped");
                        break;
                    }
                },
            };

            let frame = match validator.validate(&candidate.bytes) {
                Ok(frame) => frame,
                Err(reason) => {
                    rejected += 1;
                    warn!(
                        peer = %candidate.peer,
                        hex = %hex::encode(&candidate.bytes),
                        "Rejected frame: {}",
                        reason
                    );
                    continue;
                }
            };

            let event = decoder.decode(&frame);
            report(&candidate, &frame, &event);

            let snapshot = aggregator.merge(&event, FrameOrigin::new(&candidate, &frame));
            snapshots.send_replace(Arc::clone(&snapshot));

            if let Err(e) = sink.publish(&snapshot).await {
                warn!(sequence = snapshot.sequence(), "Snapshot sink failed: {}", e);
            }
        }

        info!(merged = aggregator.sequence(), rejected, "Aggregation task ended");
    }
}

/// Operator-facing report of one decoded message.
fn report(candidate: &CandidateFrame, frame: &Frame, event: &MessageEvent) {
    let peer = &*candidate.peer;
    let payload = frame.payload_hex();
    let payload = payload.as_str();
    match event {
        MessageEvent::Score(Some(score)) => {
            info!(peer, payload, home = score.home, guest = score.guest, "Score message");
        }
        MessageEvent::Clock(Some(time)) => {
            info!(peer, payload, time = %time, "Clock message");
        }
        MessageEvent::Score(None) | MessageEvent::Clock(None) => {
            info!(peer, payload, kind = %event.kind(), "Message carried no usable fields");
        }
        MessageEvent::Penalty(_) => {
            info!(peer, payload, "Penalty message");
        }
        MessageEvent::Unknown(unknown) => {
            info!(peer, payload, ascii = ?unknown.ascii_segments, "Unknown message type");
            for byte in &unknown.byte_trace {
                debug!("{}", byte);
            }
        }
    }
}
