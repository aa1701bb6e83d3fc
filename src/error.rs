//! Error types for scoreboard capture.
//!
//! Only transport setup and sink plumbing produce [`ScoreboardError`]. Malformed
//! input on the wire is never an error at this level: the assembler resyncs,
//! the validator returns a [`RejectReason`](crate::protocol::RejectReason) and
//! the decoder falls back to an unknown-message event.
//!
//! ## Error Categories
//!
//! - **Transport Errors**: bind, connect and socket read failures
//! - **Configuration Errors**: unusable settings detected at startup
//! - **Sink Errors**: failures persisting the overlay document
//!
//! ## Recovery and Retry
//!
//! ```rust
//! use scorelink::ScoreboardError;
//!
//! use std::time::Duration;
//!
//! let error = ScoreboardError::Timeout { duration: Duration::from_secs(5) };
//! if error.is_retryable() {
//!     for suggestion in error.recovery_suggestions() {
//!         println!("  - {}", suggestion);
//!     }
//! }
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for capture operations.
pub type Result<T, E = ScoreboardError> = std::result::Result<T, E>;

/// Main error type for capture operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ScoreboardError {
    #[error("Failed to bind listener on {addr}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to connect to scoreboard console: {reason}")]
    Connection {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("I/O error during {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {reason}")]
    Config { reason: String },

    #[error("Failed to write snapshot to {path}")]
    Sink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error in {context}: {details}")]
    Serialization { context: String, details: String },

    #[error("Operation timed out after {duration:?}")]
    Timeout { duration: Duration },

    #[error("Pipeline channel closed: {context}")]
    ChannelClosed { context: String },
}

impl ScoreboardError {
    /// Returns whether this error is potentially recoverable through retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            ScoreboardError::Connection { .. } => true,
            ScoreboardError::Timeout { .. } => true,
            ScoreboardError::Io { .. } => true,
            ScoreboardError::Sink { .. } => true,
            ScoreboardError::Bind { .. } => false,
            ScoreboardError::Config { .. } => false,
            ScoreboardError::Serialization { .. } => false,
            ScoreboardError::ChannelClosed { .. } => false,
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            ScoreboardError::Bind { .. } => vec![
                "Check that no other capture instance is running",
                "Choose a different port in the configuration",
                "Verify the bind host is an address of this machine",
            ],
            ScoreboardError::Connection { .. } => vec![
                "Ensure the scoreboard console is powered on",
                "Check the target host and port in the configuration",
                "Verify the network cable or Wi-Fi link to the console",
            ],
            ScoreboardError::Io { .. } => vec![
                "Check the network link to the console",
                "Restart the capture to reconnect",
            ],
            ScoreboardError::Config { .. } => vec![
                "Review the configuration file",
                "Set client.target_host when running in client mode",
                "Delete the file to fall back to defaults",
            ],
            ScoreboardError::Sink { .. } => vec![
                "Check the output directory exists and is writable",
                "Ensure sufficient disk space",
            ],
            ScoreboardError::Serialization { .. } => {
                vec!["Check the snapshot contents", "Report the failing document"]
            }
            ScoreboardError::Timeout { .. } => vec![
                "Increase the timeout in the configuration",
                "Verify the console is reachable",
            ],
            ScoreboardError::ChannelClosed { .. } => {
                vec!["The pipeline has shut down", "Restart the capture"]
            }
        }
    }

    /// Helper constructor for bind failures.
    pub fn bind_failed(addr: SocketAddr, source: std::io::Error) -> Self {
        ScoreboardError::Bind { addr: addr.to_string(), source }
    }

    /// Helper constructor for connection errors with source.
    pub fn connection_failed_with_source(
        reason: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        ScoreboardError::Connection { reason: reason.into(), source: Some(source) }
    }

    /// Helper constructor for I/O errors with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        ScoreboardError::Io { context: context.into(), source }
    }

    /// Helper constructor for configuration errors.
    pub fn config(reason: impl Into<String>) -> Self {
        ScoreboardError::Config { reason: reason.into() }
    }

    /// Helper constructor for sink write errors.
    pub fn sink_error(path: PathBuf, source: std::io::Error) -> Self {
        ScoreboardError::Sink { path, source }
    }
}

impl From<std::io::Error> for ScoreboardError {
    fn from(err: std::io::Error) -> Self {
        ScoreboardError::Io { context: "<unknown>".to_string(), source: err }
    }
}

impl From<serde_json::Error> for ScoreboardError {
    fn from(err: serde_json::Error) -> Self {
        ScoreboardError::Serialization {
            context: "snapshot document".to_string(),
            details: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
          #[test]
          fn error_messages_carry_their_context(
            reason in ".*",
            details in ".*",
            duration_ms in 1u64..60000u64
          ) {
            let connection_err = ScoreboardError::connection_failed_with_source(
              reason.clone(),
              Box::new(std::io::Error::other("refused")),
            );
            prop_assert!(connection_err.to_string().contains(&reason));

            let config_err = ScoreboardError::config(reason.clone());
            prop_assert!(config_err.to_string().contains(&reason));

            let ser_err = ScoreboardError::Serialization {
              context: "doc".to_string(),
              details: details.clone(),
            };
            prop_assert!(ser_err.to_string().contains(&details));

            let timeout_err = ScoreboardError::Timeout { duration: Duration::from_millis(duration_ms) };
            prop_assert!(!timeout_err.to_string().is_empty());
          }

          #[test]
          fn io_conversion_preserves_message(message in ".*") {
            let io_err = std::io::Error::other(message.clone());
            let converted: ScoreboardError = io_err.into();
            match converted {
              ScoreboardError::Io { source, .. } => prop_assert_eq!(source.to_string(), message),
              _ => prop_assert!(false, "Expected Io error from io::Error conversion"),
            }
          }
        }
    }

    #[test]
    fn bind_error_names_address() {
        let addr: SocketAddr = "127.0.0.1:4001".parse().unwrap();
        let err = ScoreboardError::bind_failed(
            addr,
            std::io::Error::new(std::io::ErrorKind::AddrInUse, "in use"),
        );
        assert!(err.to_string().contains("127.0.0.1:4001"));
        assert!(!err.is_retryable());
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn error_traits_validation() {
        fn assert_send_sync_static<T: Send + Sync + 'static>() {}
        assert_send_sync_static::<ScoreboardError>();
    }

    #[test]
    fn recovery_methods_work() {
        let connection_error = ScoreboardError::Timeout { duration: Duration::from_secs(5) };
        let config_error = ScoreboardError::config("missing target");

        assert!(connection_error.is_retryable());
        assert!(!config_error.is_retryable());

        for suggestion in connection_error
            .recovery_suggestions()
            .into_iter()
            .chain(config_error.recovery_suggestions())
        {
            assert!(suggestion.len() > 5);
        }
    }

    #[test]
    fn connection_error_chains_source() {
        let err = ScoreboardError::connection_failed_with_source(
            "dial failed",
            Box::new(std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused")),
        );
        let source = std::error::Error::source(&err).expect("source should be attached");
        assert!(source.to_string().contains("refused"));
    }
}
