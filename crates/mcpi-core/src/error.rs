//! Error types for the Pi Edition API client

use std::fmt;
use std::panic::Location;
use thiserror::Error;

/// Result type for API operations
pub type Result<T> = std::result::Result<T, McpiError>;

/// Source location a request was issued from.
///
/// Captured with `#[track_caller]` when a command is queued, so a failure
/// settled later by the session task can still be traced back to its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite(&'static Location<'static>);

impl CallSite {
    /// Capture the location of the (tracked) caller
    #[track_caller]
    pub fn caller() -> Self {
        Self(Location::caller())
    }

    pub fn file(&self) -> &'static str {
        self.0.file()
    }

    pub fn line(&self) -> u32 {
        self.0.line()
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.0.file(), self.0.line(), self.0.column())
    }
}

/// API error types
#[derive(Debug, Error)]
pub enum McpiError {
    /// Transport-level failure (refused, reset, closed)
    #[error("Connection error: {0}")]
    Connection(String),

    /// A pending request was dropped because the transport failed
    #[error("Connection lost before `{request}` completed: {reason} (sent from {origin})")]
    Disconnected {
        request: String,
        reason: String,
        origin: CallSite,
    },

    /// No reply arrived within the response timeout
    #[error("No response was received from the game for `{request}` (sent from {origin})")]
    NoResponse { request: String, origin: CallSite },

    /// The game answered with the failure sentinel
    #[error("An error occurred while running `{request}`: got `{response}` (sent from {origin})")]
    Command {
        request: String,
        response: String,
        origin: CallSite,
    },

    /// Session destroyed before the request settled
    #[error("Connection destroyed")]
    Destroyed,

    /// Caller supplied an argument the protocol cannot carry
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Reply payload could not be parsed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Framing violation
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl McpiError {
    /// Command text of the request this error belongs to, if any
    pub fn request(&self) -> Option<&str> {
        match self {
            McpiError::Disconnected { request, .. }
            | McpiError::NoResponse { request, .. }
            | McpiError::Command { request, .. } => Some(request),
            _ => None,
        }
    }

    /// Call site the failing request was issued from, if any
    pub fn origin(&self) -> Option<CallSite> {
        match self {
            McpiError::Disconnected { origin, .. }
            | McpiError::NoResponse { origin, .. }
            | McpiError::Command { origin, .. } => Some(*origin),
            _ => None,
        }
    }
}

impl From<std::io::Error> for McpiError {
    fn from(err: std::io::Error) -> Self {
        McpiError::Connection(err.to_string())
    }
}
