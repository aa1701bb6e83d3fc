//! Live match state from Bodet scoreboard consoles.
//!
//! Scorelink reads the byte stream a Scorepad-family console sends over TCP,
//! cuts it into frames, decodes score and clock messages and publishes the
//! resulting match state to broadcast overlays.
//!
//! # Features
//!
//! - **Both transport modes**: listen for the console, or dial out and keep redialing
//! - **Lenient framing**: split reads, line noise and checksum drift never stop capture
//! - **Pluggable decoding**: message layouts are registered per type byte
//! - **Overlay output**: an atomically replaced JSON document plus a snapshot stream
//!
//! # Pipeline
//!
//! ```text
//! bytes -> FrameAssembler -> FrameValidator -> MessageDecoder -> MatchStateAggregator
//!                                                                   |-> SnapshotSink
//!                                                                   '-> watch channel
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use scorelink::{Scorelink, UpdateRate, config::CaptureConfig};
//!
//! #[tokio::main]
//! async fn main() -> scorelink::Result<()> {
//!     let config = CaptureConfig::load("scorelink.yaml");
//!     let connection = Scorelink::from_config(&config).await?;
//!     let mut updates = connection.subscribe(UpdateRate::Max(10));
//!
//!     while let Some(snapshot) = updates.next().await {
//!         let score = snapshot.state.score;
//!         println!("{} - {} at {}", score.home, score.guest, snapshot.state.clock.time);
//!     }
//!     Ok(())
//! }
//! ```

// Core types and error handling
mod error;
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;

// Frame pipeline
pub mod aggregator;
pub mod decode;
pub mod protocol;

// Stream-based capture architecture
pub mod config;
pub mod connection;
pub mod driver;
pub mod sink;
pub mod source;
pub mod sources;
pub mod stream;

// Core exports
pub use error::*;
pub use types::*;

// Main API exports
pub use aggregator::MatchStateAggregator;
pub use config::{CaptureConfig, Mode, PipelineOptions};
pub use connection::ScoreboardConnection;
pub use decode::MessageDecoder;
pub use protocol::{FrameAssembler, FrameValidator};
pub use sink::{DiscardSink, JsonFileSink, SnapshotSink};

use std::net::SocketAddr;
use std::path::Path;

/// Unified entry point for capture pipelines.
///
/// All constructors use the standard decoder registry. Build a
/// [`ScoreboardConnection`] directly to plug in custom message layouts.
///
/// # Examples
///
/// ## Server mode
/// ```rust,no_run
/// use scorelink::{DiscardSink, PipelineOptions, Scorelink};
///
/// #[tokio::main]
/// async fn main() -> scorelink::Result<()> {
///     let addr = "0.0.0.0:4001".parse().unwrap();
///     let connection = Scorelink::listen(addr, PipelineOptions::default(), DiscardSink).await?;
///     // Use connection...
///     connection.shutdown().await
/// }
/// ```
///
/// ## Replay of a recorded capture
/// ```rust,no_run
/// use scorelink::{JsonFileSink, PipelineOptions, Scorelink};
///
/// #[tokio::main]
/// async fn main() -> scorelink::Result<()> {
///     let sink = JsonFileSink::new("matchfacts.json");
///     let mut connection = Scorelink::replay("match.bin", PipelineOptions::default(), sink).await?;
///     connection.finished().await
/// }
/// ```
pub struct Scorelink;

impl Scorelink {
    /// Listen for consoles on `addr`.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreboardError::Bind`] if the address cannot be bound.
    pub async fn listen<S: SnapshotSink>(
        addr: SocketAddr,
        options: PipelineOptions,
        sink: S,
    ) -> Result<ScoreboardConnection> {
        ScoreboardConnection::listen(addr, options, MessageDecoder::default(), sink).await
    }

    /// Dial the console at `target` (`host:port`), redialing forever.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreboardError::Config`] if `target` is empty.
    pub async fn dial<S: SnapshotSink>(
        target: impl Into<String>,
        options: PipelineOptions,
        sink: S,
    ) -> Result<ScoreboardConnection> {
        ScoreboardConnection::dial(target, options, MessageDecoder::default(), sink).await
    }

    /// Replay a raw capture file.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreboardError::Io`] if the file cannot be read.
    pub async fn replay<P: AsRef<Path>, S: SnapshotSink>(
        path: P,
        options: PipelineOptions,
        sink: S,
    ) -> Result<ScoreboardConnection> {
        ScoreboardConnection::replay(path, options, MessageDecoder::default(), sink).await
    }

    /// Start the mode selected in `config`, writing the overlay document to `output.json_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is unusable (client mode without
    /// a target) or the listen address cannot be resolved or bound.
    pub async fn from_config(config: &CaptureConfig) -> Result<ScoreboardConnection> {
        config.validate()?;
        let options = config.pipeline_options();
        let sink = JsonFileSink::new(&config.output.json_path);

        match config.mode {
            Mode::Server => Self::listen(config.bind_addr().await?, options, sink).await,
            Mode::Client => Self::dial(config.target()?, options, sink).await,
        }
    }
}
