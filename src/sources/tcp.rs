//! TCP socket source

use std::sync::Arc;
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tracing::trace;

use crate::source::ByteSource;
use crate::{Result, ScoreboardError};

/// Reads chunks from a connected console socket.
pub struct TcpSource {
    stream: TcpStream,
    peer: Arc<str>,
    buffer: BytesMut,
    read_size: usize,
    read_timeout: Duration,
}

impl TcpSource {
    /// Wrap a connected socket; the peer address becomes the source label.
    pub fn new(stream: TcpStream, read_timeout: Duration, read_size: usize) -> Self {
        let peer = stream
            .peer_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| "<unknown>".to_string());
        if let Err(e) = stream.set_nodelay(true) {
            trace!(peer = %peer, error = %e, "Could not set TCP_NODELAY");
        }
        let read_size = read_size.max(1);

        Self {
            stream,
            peer: Arc::from(peer),
            buffer: BytesMut::with_capacity(read_size),
            read_size,
            read_timeout,
        }
    }
}

#[async_trait::async_trait]
impl ByteSource for TcpSource {
    async fn read_chunk(&mut self) -> Result<Option<Bytes>> {
        loop {
            self.buffer.reserve(self.read_size);
            match tokio::time::timeout(self.read_timeout, self.stream.read_buf(&mut self.buffer)).await {
                Err(_) => {
                    trace!(peer = %self.peer, "Read timeout, still waiting");
                    continue;
                }
                Ok(Ok(0)) => return Ok(None),
                Ok(Ok(n)) => {
                    trace!(peer = %self.peer, bytes = n, "Read chunk");
                    return Ok(Some(self.buffer.split().freeze()));
                }
                Ok(Err(e)) => {
                    return Err(ScoreboardError::io(format!("read from {}", self.peer), e));
                }
            }
        }
    }

    fn peer(&self) -> Arc<str> {
        Arc::clone(&self.peer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpListener;

    async fn connected_pair() -> (TcpSource, TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let client = TcpStream::connect(addr).await.unwrap();
        let (server, _) = listener.accept().await.unwrap();
        (TcpSource::new(server, Duration::from_millis(20), 64), client)
    }

    #[tokio::test]
    async fn yields_written_bytes() {
        let (mut source, mut client) = connected_pair().await;
        client.write_all(b"\x01\x7f\x02G").await.unwrap();

        let chunk = source.read_chunk().await.unwrap().unwrap();
        assert_eq!(chunk.as_ref(), b"\x01\x7f\x02G");
        assert_eq!(&*source.peer(), client.local_addr().unwrap().to_string());
    }

    #[tokio::test]
    async fn quiet_socket_keeps_waiting_past_timeout() {
        let (mut source, mut client) = connected_pair().await;
        let writer = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            client.write_all(b"late").await.unwrap();
            client
        });

        let chunk = source.read_chunk().await.unwrap().unwrap();
        assert_eq!(chunk.as_ref(), b"late");
        drop(writer.await.unwrap());
    }

    #[tokio::test]
    async fn eof_ends_stream() {
        let (mut source, client) = connected_pair().await;
        drop(client);
        assert!(source.read_chunk().await.unwrap().is_none());
    }
}
