//! Server mode: the console connects to us

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::{ScoreboardConnection, TransportChannels};
use crate::config::PipelineOptions;
use crate::decode::MessageDecoder;
use crate::driver::Driver;
use crate::sink::SnapshotSink;
use crate::sources::TcpSource;
use crate::{Result, ScoreboardError};

/// Pause after a failed accept, e.g. when out of file descriptors
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

impl ScoreboardConnection {
    /// Bind `addr` and capture from every console that connects.
    ///
    /// Binding happens before this returns, so a port already in use is
    /// reported to the caller; later accept failures are only logged.
    pub async fn listen<S>(
        addr: SocketAddr,
        options: PipelineOptions,
        decoder: MessageDecoder,
        sink: S,
    ) -> Result<Self>
    where
        S: SnapshotSink,
    {
        let listener =
            TcpListener::bind(addr).await.map_err(|e| ScoreboardError::bind_failed(addr, e))?;
        let local_addr = listener.local_addr().map_err(|e| ScoreboardError::io("query bound address", e))?;
        info!("Listening for scoreboard console on {}", local_addr);

        Ok(Self::start(options.expected_address, decoder, sink, Some(local_addr), |channels| {
            tokio::spawn(accept_loop(listener, channels, options))
        }))
    }
}

async fn accept_loop(listener: TcpListener, channels: TransportChannels, options: PipelineOptions) {
    let TransportChannels { frames, cancel } = channels;
    let mut readers = JoinSet::new();

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("Listener cancelled");
                break;
            }
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    info!(peer = %peer, "Console connected");
                    let source = TcpSource::new(stream, options.read_timeout, options.read_buffer_size);
                    readers.spawn(Driver::read_source(
                        source,
                        frames.clone(),
                        cancel.clone(),
                        options.read_buffer_size,
                    ));
                }
                Err(e) => {
                    warn!("Accept failed: {}", e);
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                }
            },
            Some(finished) = readers.join_next(), if !readers.is_empty() => {
                if let Err(e) = finished {
                    warn!("Reader task failed: {}", e);
                }
            }
        }
    }

    while readers.join_next().await.is_some() {}
    info!("Listener stopped");
}
