//! Transport Layer
//!
//! Separates how text reaches a host from what the text says:
//! - `InProcess`: direct channels (embedding and tests)
//! - `WebSocket`: the host's announced endpoint, plus the inbound callback
//!   server used by GUI windows
//!
//! # Security
//!
//! The callback server binds to loopback by default and performs no
//! authentication. Anything that can reach the port can invoke the handler.

pub mod config;
pub mod in_process;
pub mod traits;
pub mod websocket;

pub use config::TransportConfig;
pub use in_process::InProcessTransport;
pub use traits::{ConnectionId, HostTransport, MessageHandler, TransportError};
pub use websocket::{CallbackServer, CallbackServerHandle, WebSocketClient};
