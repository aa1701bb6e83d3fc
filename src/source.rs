//! Source trait for raw console bytes

use std::sync::Arc;

use bytes::Bytes;

use crate::Result;

/// A stream of raw bytes from one scoreboard console.
///
/// Sources hide where the bytes come from (a TCP socket, a recorded capture)
/// and handle their own timing: a read timeout on a quiet socket is not an
/// error, the source simply keeps waiting.
#[async_trait::async_trait]
pub trait ByteSource: Send + 'static {
    /// Read the next chunk.
    ///
    /// Returns:
    /// - `Ok(Some(chunk))` - bytes at whatever boundary the transport delivered
    /// - `Ok(None)` - the peer closed the stream
    /// - `Err(e)` - the stream failed and cannot be read further
    async fn read_chunk(&mut self) -> Result<Option<Bytes>>;

    /// Label for logs and snapshot metadata, usually the peer address.
    fn peer(&self) -> Arc<str>;
}
