//! Scorepad console simulator
//!
//! Sends correctly framed messages to a capture server so the pipeline can be
//! exercised without console hardware.

use std::time::Duration;

use anyhow::{Context, bail};
use clap::Parser;
use scorelink::GameTime;
use scorelink::protocol::{constants::DEFAULT_ADDRESS, encode_frame};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Unknown-type sample captured from a roller hockey console.
const SAMPLE_PAYLOAD: [u8; 12] = [0x47, 0x31, 0x31, 0x80, 0x37, 0x20, 0x34, 0x30, 0x37, 0x20, 0x30, 0x31];

#[derive(Parser, Debug)]
#[command(author, version, about = "Send simulated Scorepad frames to a capture server", long_about = None)]
struct Args {
    /// Capture server host
    #[arg(long, default_value = "localhost")]
    host: String,

    /// Capture server port
    #[arg(short, long, default_value_t = 4001)]
    port: u16,

    /// Send a score message, e.g. `3-2`
    #[arg(long, conflicts_with_all = ["clock", "data"])]
    score: Option<String>,

    /// Send a clock message, e.g. `12:34`
    #[arg(long, conflicts_with = "data")]
    clock: Option<String>,

    /// Send a raw payload given as hex, e.g. `4731318037`
    #[arg(long)]
    data: Option<String>,

    /// Address byte
    #[arg(long, default_value_t = DEFAULT_ADDRESS)]
    address: u8,

    /// Number of frames to send
    #[arg(short = 'n', long, default_value_t = 1)]
    count: u32,

    /// Delay between frames in milliseconds
    #[arg(long, default_value_t = 1000)]
    delay_ms: u64,

    /// Flip the checksum byte to exercise checksum leniency
    #[arg(long)]
    corrupt_checksum: bool,

    /// Write each frame in pieces of this many bytes
    #[arg(long)]
    split: Option<usize>,
}

fn digits(value: u8) -> [u8; 2] {
    [b'0' + (value / 10) % 10, b'0' + value % 10]
}

fn two_field_payload(kind: u8, first: u8, second: u8) -> Vec<u8> {
    let mut payload = vec![b'G', kind, b'0', 0x80, b'1'];
    payload.extend_from_slice(&digits(first));
    payload.extend_from_slice(&digits(second));
    payload.push(b'0');
    payload
}

fn payload(args: &Args) -> anyhow::Result<Vec<u8>> {
    if let Some(score) = &args.score {
        let (home, guest) = score.split_once('-').context("score must look like HOME-GUEST")?;
        let home: u8 = home.trim().parse().context("invalid home score")?;
        let guest: u8 = guest.trim().parse().context("invalid guest score")?;
        if home > 99 || guest > 99 {
            bail!("scores are limited to two digits");
        }
        return Ok(two_field_payload(b'6', home, guest));
    }
    if let Some(clock) = &args.clock {
        let time = GameTime::parse(clock).context("clock must look like MM:SS")?;
        if time.minutes > 99 || time.seconds > 99 {
            bail!("clock fields are limited to two digits");
        }
        return Ok(two_field_payload(b'7', time.minutes, time.seconds));
    }
    if let Some(data) = &args.data {
        return hex::decode(data.replace(' ', "")).context("invalid hex payload");
    }
    Ok(SAMPLE_PAYLOAD.to_vec())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let payload = payload(&args)?;

    let mut frame = encode_frame(args.address, &payload);
    if args.corrupt_checksum {
        if let Some(checksum) = frame.last_mut() {
            *checksum ^= 0xFF;
        }
    }

    let target = format!("{}:{}", args.host, args.port);
    let mut stream = TcpStream::connect(&target)
        .await
        .with_context(|| format!("could not connect to {}; is the capture server running?", target))?;
    info!("Connected to {}", target);

    let piece = args.split.unwrap_or(frame.len()).max(1);
    for i in 0..args.count {
        info!(frame = i + 1, of = args.count, hex = %hex::encode(&frame), bytes = frame.len(), "Sending frame");
        for chunk in frame.chunks(piece) {
            stream.write_all(chunk).await?;
            if piece < frame.len() {
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
        }
        if i + 1 < args.count {
            tokio::time::sleep(Duration::from_millis(args.delay_ms)).await;
        }
    }

    stream.shutdown().await?;
    info!("Done");
    Ok(())
}
