//! Session layer for the Minecraft: Pi Edition API
//!
//! This crate provides:
//! - Wire protocol helpers (framing, reply classification, payload parsing)
//! - Transport abstractions (AsyncReader/AsyncWriter/Connector traits)
//! - TCP transport
//! - The connection session: a strictly sequential request queue with
//!   per-request timeouts, reconnect and destroy

pub mod protocol;
pub mod session;
pub mod tcp;
pub mod transport;

pub use protocol::{Command, FAIL_SENTINEL, LineBuffer, Reply};
pub use session::{
    Connection, ConnectionConfig, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_RESPONSE_TIMEOUT,
    SessionEvent, SessionState,
};
pub use tcp::TcpConnector;
pub use transport::{AsyncReader, AsyncWriter, Connector, Transport, from_halves};
