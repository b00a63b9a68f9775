//! Transport abstractions for the session
//!
//! Provides AsyncReader/AsyncWriter traits over the byte stream and the
//! Connector trait the session uses to (re)open it.

use async_trait::async_trait;
use mcpi_core::{McpiError, Result};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Size of a single read from the transport
const READ_CHUNK_SIZE: usize = 4096;

/// Trait for async reading from a transport
#[async_trait]
pub trait AsyncReader: Send {
    /// Read whatever bytes are available.
    /// An empty chunk means the peer closed the connection.
    ///
    /// Must be cancel-safe: the session drops this future whenever another
    /// event wins the race.
    async fn read_chunk(&mut self) -> Result<Vec<u8>>;
}

/// Trait for async writing to a transport
#[async_trait]
pub trait AsyncWriter: Send + Sync {
    /// Write a complete frame and flush it
    async fn write_frame(&mut self, data: &[u8]) -> Result<()>;
}

/// Read and write halves of an open transport
pub type Transport = (Box<dyn AsyncReader>, Box<dyn AsyncWriter>);

/// Opens transports for a session, once at start and again on every reconnect
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    /// Open a new transport; resolving is the ready signal
    async fn connect(&self) -> Result<Transport>;

    /// Human-readable peer description for logs
    fn describe(&self) -> String;
}

/// Reader over any tokio byte stream
pub struct StreamReader<R>(pub R);

#[async_trait]
impl<R: AsyncRead + Unpin + Send> AsyncReader for StreamReader<R> {
    async fn read_chunk(&mut self) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; READ_CHUNK_SIZE];
        let n = self
            .0
            .read(&mut buf)
            .await
            .map_err(|e| McpiError::Connection(format!("read failed: {}", e)))?;
        buf.truncate(n);
        Ok(buf)
    }
}

/// Writer over any tokio byte stream
pub struct StreamWriter<W>(pub W);

#[async_trait]
impl<W: AsyncWrite + Unpin + Send + Sync> AsyncWriter for StreamWriter<W> {
    async fn write_frame(&mut self, data: &[u8]) -> Result<()> {
        self.0
            .write_all(data)
            .await
            .map_err(|e| McpiError::Connection(format!("write failed: {}", e)))?;

        // Flush to ensure data is sent
        self.0
            .flush()
            .await
            .map_err(|e| McpiError::Connection(format!("flush failed: {}", e)))?;

        Ok(())
    }
}

/// Wrap any split byte stream as a transport
pub fn from_halves<R, W>(reader: R, writer: W) -> Transport
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + Sync + 'static,
{
    (Box::new(StreamReader(reader)), Box::new(StreamWriter(writer)))
}
