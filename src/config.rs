//! Capture configuration loaded from YAML.
//!
//! Every field has a default, so a partial file only overrides what it names.
//! [`CaptureConfig::load`] never fails: a missing or broken file falls back to
//! passive mode on `0.0.0.0:4001`, which is what a console on the default
//! Scorepad setup expects.
//!
//! ```yaml
//! mode: client
//! client:
//!   target_host: 192.168.1.50
//!   target_port: 4001
//! output:
//!   json_path: overlay/matchfacts.json
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::net::lookup_host;
use tracing::{info, warn};

use crate::protocol::constants::DEFAULT_ADDRESS;
use crate::{Result, ScoreboardError};

/// Which side opens the TCP connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Listen and let the console connect
    #[default]
    #[serde(alias = "passive")]
    Server,
    /// Dial out to the console
    #[serde(alias = "active")]
    Client,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 4001 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub target_host: String,
    pub target_port: u16,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { target_host: String::new(), target_port: 4001 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Overlay document written after every snapshot
    pub json_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { json_path: PathBuf::from("matchfacts.json") }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    /// Address byte the console is expected to send; mismatches are only logged
    pub address: u8,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self { address: DEFAULT_ADDRESS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub read_timeout_ms: u64,
    pub connect_timeout_ms: u64,
    pub retry_delay_ms: u64,
    pub read_buffer_size: usize,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            read_timeout_ms: 1000,
            connect_timeout_ms: 10_000,
            retry_delay_ms: 5000,
            read_buffer_size: 4096,
        }
    }
}

/// Top-level capture configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub mode: Mode,
    /// `tracing` filter directive, e.g. `info` or `scorelink=debug`
    pub log_level: Option<String>,
    pub server: ServerConfig,
    pub client: ClientConfig,
    pub output: OutputConfig,
    pub protocol: ProtocolConfig,
    pub timing: TimingConfig,
}

impl CaptureConfig {
    /// Load from `path`, falling back to defaults when the file is absent or invalid.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => match Self::from_yaml(&text) {
                Ok(config) => {
                    info!("Loaded configuration from {}", path.display());
                    config
                }
                Err(e) => {
                    warn!("Ignoring {}: {}; using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Could not read {}: {}; using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse a YAML document.
    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml_ng::from_str(text).map_err(|e| ScoreboardError::Serialization {
            context: "configuration".to_string(),
            details: e.to_string(),
        })
    }

    /// Check settings that cannot be defaulted.
    pub fn validate(&self) -> Result<()> {
        if self.mode == Mode::Client && self.client.target_host.trim().is_empty() {
            return Err(ScoreboardError::config("client mode requires client.target_host"));
        }
        if self.timing.read_buffer_size == 0 {
            return Err(ScoreboardError::config("timing.read_buffer_size must be positive"));
        }
        Ok(())
    }

    /// Resolve the listen address for server mode.
    pub async fn bind_addr(&self) -> Result<SocketAddr> {
        resolve(&self.server.host, self.server.port).await
    }

    /// `host:port` of the console for client mode.
    pub fn target(&self) -> Result<String> {
        let host = self.client.target_host.trim();
        if host.is_empty() {
            return Err(ScoreboardError::config("client mode requires client.target_host"));
        }
        Ok(format!("{}:{}", host, self.client.target_port))
    }

    /// Runtime options for the pipeline.
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            expected_address: self.protocol.address,
            read_timeout: Duration::from_millis(self.timing.read_timeout_ms.max(1)),
            connect_timeout: Duration::from_millis(self.timing.connect_timeout_ms.max(1)),
            retry_delay: Duration::from_millis(self.timing.retry_delay_ms),
            read_buffer_size: self.timing.read_buffer_size.max(1),
        }
    }
}

async fn resolve(host: &str, port: u16) -> Result<SocketAddr> {
    let mut addrs = lookup_host((host, port))
        .await
        .map_err(|e| ScoreboardError::io(format!("resolve {}:{}", host, port), e))?;
    addrs
        .next()
        .ok_or_else(|| ScoreboardError::config(format!("{}:{} resolved to no address", host, port)))
}

/// Runtime knobs shared by the transports and the aggregation task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    pub expected_address: u8,
    /// How long a read may block before the reader loops
    pub read_timeout: Duration,
    /// Client mode only
    pub connect_timeout: Duration,
    /// Client mode pause between dial attempts
    pub retry_delay: Duration,
    pub read_buffer_size: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        CaptureConfig::default().pipeline_options()
    }
}
