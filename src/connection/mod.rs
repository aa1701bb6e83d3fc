//! Running capture pipelines and their handles.
//!
//! Each constructor spawns the aggregation task plus one transport task and
//! returns a [`ScoreboardConnection`] that exposes the published snapshots.
//! Dropping the handle cancels every task.

mod dialer;
mod listener;
mod replay;

use std::net::SocketAddr;
use std::sync::Arc;

use futures::stream::BoxStream;
use futures::{Stream, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{Result, ScoreboardError};
use crate::decode::MessageDecoder;
use crate::driver::{Driver, DriverChannels};
use crate::protocol::{CandidateFrame, FrameValidator};
use crate::sink::SnapshotSink;
use crate::stream::CoalesceExt;
use crate::types::{MatchSnapshot, UpdateRate};

/// Handle to a running capture pipeline.
pub struct ScoreboardConnection {
    /// Snapshot watch receiver
    snapshots: watch::Receiver<Arc<MatchSnapshot>>,

    /// Address the listener is bound to, in server mode
    local_addr: Option<SocketAddr>,

    /// Aggregation task
    aggregation: Option<JoinHandle<()>>,

    /// Listener, dialer or replay task
    transport: Option<JoinHandle<()>>,

    /// Cancellation token for stopping tasks
    cancel: CancellationToken,
}

impl ScoreboardConnection {
    /// Start a pipeline whose transport is spawned by `transport`.
    ///
    /// The aggregation task ends once the transport has dropped every frame
    /// sender, so a finite source drains completely before the pipeline stops.
    fn start<S, F>(
        expected_address: u8,
        decoder: MessageDecoder,
        sink: S,
        local_addr: Option<SocketAddr>,
        transport: F,
    ) -> Self
    where
        S: SnapshotSink,
        F: FnOnce(TransportChannels) -> JoinHandle<()>,
    {
        let validator = FrameValidator::new(expected_address);
        let DriverChannels { frames, snapshots, cancel, aggregation } =
            Driver::spawn(validator, decoder, sink, CancellationToken::new());

        let transport = transport(TransportChannels { frames, cancel: cancel.clone() });

        Self {
            snapshots,
            local_addr,
            aggregation: Some(aggregation),
            transport: Some(transport),
            cancel,
        }
    }

    /// Every published snapshot, starting with the current one.
    pub fn snapshots(&self) -> impl Stream<Item = Arc<MatchSnapshot>> + 'static {
        WatchStream::new(self.snapshots.clone())
    }

    /// Snapshots at the requested rate.
    ///
    /// The watch channel already keeps only the latest value, so a slow
    /// subscriber never holds up the pipeline; `UpdateRate::Max` additionally
    /// caps how often this stream yields.
    pub fn subscribe(&self, rate: UpdateRate) -> BoxStream<'static, Arc<MatchSnapshot>> {
        match rate.interval() {
            None => self.snapshots().boxed(),
            Some(period) => self.snapshots().coalesce(period).boxed(),
        }
    }

    /// Latest published snapshot.
    pub fn current(&self) -> Arc<MatchSnapshot> {
        Arc::clone(&self.snapshots.borrow())
    }

    /// Bound listen address, for server-mode pipelines.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    /// Token that stops the pipeline when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Wait until the pipeline stops on its own, e.g. when a replay has been consumed.
    pub async fn finished(&mut self) -> Result<()> {
        self.join_tasks().await
    }

    /// Cancel every task and wait for them to exit.
    ///
    /// Frames still queued when the token fires are dropped.
    pub async fn shutdown(mut self) -> Result<()> {
        info!("Shutting down capture pipeline");
        self.cancel.cancel();
        self.join_tasks().await
    }

    async fn join_tasks(&mut self) -> Result<()> {
        let mut failure = None;
        for (name, handle) in
            [("transport", self.transport.take()), ("aggregation", self.aggregation.take())]
        {
            let Some(handle) = handle else { continue };
            if let Err(e) = handle.await {
                warn!("{} task failed: {}", name, e);
                failure.get_or_insert_with(|| ScoreboardError::ChannelClosed {
                    context: format!("{} task failed: {}", name, e),
                });
            }
        }
        failure.map_or(Ok(()), Err)
    }
}

impl Drop for ScoreboardConnection {
    fn drop(&mut self) {
        debug!("Dropping scoreboard connection");
        // Cancel tasks on drop for clean shutdown
        self.cancel.cancel();
    }
}

/// What a transport task needs from the driver.
struct TransportChannels {
    frames: mpsc::UnboundedSender<CandidateFrame>,
    cancel: CancellationToken,
}
