//! Capture server entry point

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use scorelink::{CaptureConfig, JsonFileSink, Scorelink};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, reload, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about = "Capture live match state from a Bodet scoreboard console", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "scorelink.yaml")]
    config: PathBuf,

    /// Overlay document path, overriding output.json_path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Replay a raw capture file instead of opening a socket
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `scorelink=trace` (RUST_LOG takes precedence)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Config may carry the log level, but loading it logs too; start with a
    // provisional filter and swap it once the config is known.
    let env_filter = EnvFilter::try_from_default_env().ok();
    let has_env_filter = env_filter.is_some();
    let initial = env_filter
        .or_else(|| args.log_level.as_deref().and_then(|level| EnvFilter::try_new(level).ok()))
        .unwrap_or_else(|| EnvFilter::new("info"));
    let (filter, filter_handle) = reload::Layer::new(initial);
    tracing_subscriber::registry().with(filter).with(tracing_subscriber::fmt::layer()).init();

    info!("Starting scorelink {}", env!("CARGO_PKG_VERSION"));

    let mut config = CaptureConfig::load(&args.config);
    if let Some(output) = args.output {
        config.output.json_path = output;
    }

    if let (false, None, Some(level)) = (has_env_filter, &args.log_level, &config.log_level) {
        match EnvFilter::try_new(level) {
            Ok(filter) => {
                if let Err(e) = filter_handle.reload(filter) {
                    warn!("Could not apply log_level '{}': {}", level, e);
                }
            }
            Err(e) => warn!("Ignoring invalid log_level '{}': {}", level, e),
        }
    }

    info!("Overlay document: {}", config.output.json_path.display());

    let mut connection = match &args.replay {
        Some(path) => {
            let sink = JsonFileSink::new(&config.output.json_path);
            Scorelink::replay(path, config.pipeline_options(), sink)
                .await
                .with_context(|| format!("failed to open capture {}", path.display()))?
        }
        None => Scorelink::from_config(&config).await.inspect_err(|e| {
            for suggestion in e.recovery_suggestions() {
                error!("  - {}", suggestion);
            }
        })?,
    };

    tokio::select! {
        result = connection.finished() => {
            result.context("pipeline task failed")?;
            info!("Capture finished");
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to install Ctrl-C handler")?;
            info!("Shutdown signal received");
            connection.shutdown().await.context("shutdown failed")?;
        }
    }

    Ok(())
}
