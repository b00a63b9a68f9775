//! TCP transport implementation
//!
//! The Pi Edition API (and RaspberryJuice) listens on a plain TCP socket,
//! port 4711 by default.

use crate::transport::{Connector, StreamReader, StreamWriter, Transport};
use async_trait::async_trait;
use mcpi_core::{McpiError, Result};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tracing::debug;

/// TCP read wrapper
pub type TcpReadWrapper = StreamReader<OwnedReadHalf>;

/// TCP write wrapper
pub type TcpWriteWrapper = StreamWriter<OwnedWriteHalf>;

/// Opens TCP connections to the game
#[derive(Debug, Clone)]
pub struct TcpConnector {
    host: String,
    port: u16,
}

impl TcpConnector {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

#[async_trait]
impl Connector for TcpConnector {
    async fn connect(&self) -> Result<Transport> {
        let stream = TcpStream::connect((self.host.as_str(), self.port))
            .await
            .map_err(|e| {
                McpiError::Connection(format!("connect to {} failed: {}", self.describe(), e))
            })?;

        // Requests are tiny and latency bound
        if let Err(e) = stream.set_nodelay(true) {
            debug!("Could not set TCP_NODELAY: {}", e);
        }

        let (read_half, write_half) = stream.into_split();
        let reader: TcpReadWrapper = StreamReader(read_half);
        let writer: TcpWriteWrapper = StreamWriter(write_half);
        Ok((Box::new(reader), Box::new(writer)))
    }

    fn describe(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
