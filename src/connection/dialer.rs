//! Client mode: we connect to the console

use std::future::Future;
use std::time::Duration;

use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use super::{ScoreboardConnection, TransportChannels};
use crate::config::PipelineOptions;
use crate::decode::MessageDecoder;
use crate::driver::Driver;
use crate::sink::SnapshotSink;
use crate::sources::TcpSource;
use crate::{Result, ScoreboardError};

impl ScoreboardConnection {
    /// Dial `target` (`host:port`) and keep redialing after failures or disconnects.
    ///
    /// Returns immediately; the first connection attempt happens in the
    /// background. Only an empty target is an error here.
    pub async fn dial<S>(
        target: impl Into<String>,
        options: PipelineOptions,
        decoder: MessageDecoder,
        sink: S,
    ) -> Result<Self>
    where
        S: SnapshotSink,
    {
        let target = target.into();
        if target.trim().is_empty() {
            return Err(ScoreboardError::config("client mode requires a target host"));
        }
        info!("Capturing from scoreboard console at {}", target);

        Ok(Self::start(options.expected_address, decoder, sink, None, |channels| {
            tokio::spawn(dial_loop(target, channels, options))
        }))
    }
}

async fn dial_loop(target: String, channels: TransportChannels, options: PipelineOptions) {
    let TransportChannels { frames, cancel } = channels;
    let mut attempts = 0u64;

    while !cancel.is_cancelled() && !frames.is_closed() {
        attempts += 1;
        debug!(attempt = attempts, "Connecting to {}", target);

        let attempt = tokio::select! {
            _ = cancel.cancelled() => break,
            attempt = connect_within(&target, options.connect_timeout, TcpStream::connect(&target)) => attempt,
        };

        match attempt {
            Ok(stream) => {
                info!("Connected to console at {}", target);
                let source = TcpSource::new(stream, options.read_timeout, options.read_buffer_size);
                Driver::read_source(source, frames.clone(), cancel.clone(), options.read_buffer_size)
                    .await;
                if cancel.is_cancelled() {
                    break;
                }
                warn!("Lost connection to {}, redialing in {:?}", target, options.retry_delay);
            }
            Err(e) => {
                warn!(
                    error = %e,
                    retryable = e.is_retryable(),
                    "Connect to {} failed; retrying in {:?}",
                    target,
                    options.retry_delay
                );
            }
        }

        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(options.retry_delay) => {}
        }
    }

    info!("Dialer stopped after {} attempts", attempts);
}

/// Await one connect attempt, mapping refusals and timeouts onto [`ScoreboardError`].
async fn connect_within<F>(target: &str, timeout: Duration, connect: F) -> Result<TcpStream>
where
    F: Future<Output = std::io::Result<TcpStream>>,
{
    match tokio::time::timeout(timeout, connect).await {
        Ok(Ok(stream)) => Ok(stream),
        Ok(Err(e)) => Err(ScoreboardError::connection_failed_with_source(
            format!("connect to {target}"),
            Box::new(e),
        )),
        Err(_) => Err(ScoreboardError::Timeout { duration: timeout }),
    }
}
