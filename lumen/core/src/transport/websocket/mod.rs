//! WebSocket Transport
//!
//! - [`WebSocketClient`]: outbound connection used to send scripts
//! - [`CallbackServer`]: inbound server host GUI windows report events to

mod client;
mod server;

pub use client::WebSocketClient;
pub use server::{CallbackServer, CallbackServerHandle};
