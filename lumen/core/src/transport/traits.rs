//! Transport Traits
//!
//! Core definitions for talking to a running host.
//!
//! - [`HostTransport`]: the outbound connection scripts are sent over
//! - [`MessageHandler`]: the callback invoked for each message the host
//!   sends to the inbound callback server

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Callback invoked with the raw text of every inbound host message
pub type MessageHandler = Arc<dyn Fn(&str) + Send + Sync>;

/// Identifier of one inbound connection on the callback server
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Allocate the next process-wide unique id
    #[must_use]
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }

    /// Raw numeric value
    #[must_use]
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Errors that can occur during transport operations
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection to the host failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The peer closed the connection
    #[error("Connection closed")]
    ConnectionClosed,

    /// Failed to queue or write a message
    #[error("Send failed: {0}")]
    SendFailed(String),

    /// Transport not in the expected state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// An operation did not finish in time
    #[error("Timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// IO error from the underlying socket
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Outbound connection to a host
///
/// Messages are whole script texts; one `send` is one message on the wire.
#[async_trait]
pub trait HostTransport: Send + Sync {
    /// Establish the connection
    async fn connect(&mut self) -> Result<(), TransportError>;

    /// Close the connection; calling it again is a no-op
    async fn disconnect(&mut self) -> Result<(), TransportError>;

    /// Send one text message
    async fn send(&self, text: String) -> Result<(), TransportError>;

    /// Receive the next text message (waits until one is available)
    async fn recv(&mut self) -> Result<String, TransportError>;

    /// Whether the connection is currently open
    fn is_connected(&self) -> bool;
}
