//! Transport Configuration

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

/// Default connect timeout in milliseconds
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5000;

/// Default close handshake timeout in milliseconds
pub const DEFAULT_CLOSE_TIMEOUT_MS: u64 = 2000;

/// Default capacity of the per-connection message queues
pub const DEFAULT_CHANNEL_CAPACITY: usize = 100;

/// Settings shared by the websocket client and the callback server
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportConfig {
    /// How long to wait for the websocket handshake
    pub connect_timeout_ms: u64,

    /// How long `disconnect` waits for queued writes and the close frame
    pub close_timeout_ms: u64,

    /// Capacity of the read and write queues of each connection
    pub channel_capacity: usize,

    /// Address the callback server binds to; the port is always ephemeral
    ///
    /// IPv4 only: the host reads the announced `host:port` up to the first `:`.
    pub callback_bind_address: Ipv4Addr,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            close_timeout_ms: DEFAULT_CLOSE_TIMEOUT_MS,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            callback_bind_address: Ipv4Addr::LOCALHOST,
        }
    }
}

impl TransportConfig {
    /// Connect timeout as a `Duration`
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Close timeout as a `Duration`
    #[must_use]
    pub fn close_timeout(&self) -> Duration {
        Duration::from_millis(self.close_timeout_ms)
    }

    /// Socket address for the callback server (port 0)
    #[must_use]
    pub fn callback_bind_addr(&self) -> SocketAddr {
        SocketAddr::V4(SocketAddrV4::new(self.callback_bind_address, 0))
    }

    /// Queue capacity, never zero
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.channel_capacity.max(1)
    }
}
