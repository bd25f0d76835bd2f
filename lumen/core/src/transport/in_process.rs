//! In-Process Transport
//!
//! Channel-backed [`HostTransport`] for embedding a host in the same process
//! and for exercising [`LumenInstance`](crate::LumenInstance) without sockets.
//!
//! ```ignore
//! let (transport, mut script_rx, reply_tx) = InProcessTransport::new_pair();
//! let mut instance = LumenInstance::with_transport(Box::new(transport)).await?;
//! instance.execute_script(&script).await?;
//! assert_eq!(script_rx.recv().await, Some(script.snapshot()));
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::traits::{HostTransport, TransportError};

/// In-process transport using tokio channels
pub struct InProcessTransport {
    /// Scripts going to the host side
    outbound_tx: mpsc::Sender<String>,
    /// Messages coming back from the host side
    inbound_rx: mpsc::Receiver<String>,
    connected: Arc<AtomicBool>,
}

impl InProcessTransport {
    /// Create a connected transport and the host side of its channels
    ///
    /// Returns:
    /// - `InProcessTransport`: hand this to the instance
    /// - `mpsc::Receiver<String>`: every sent script arrives here
    /// - `mpsc::Sender<String>`: messages pushed here are returned by `recv`
    #[must_use]
    pub fn new_pair() -> (Self, mpsc::Receiver<String>, mpsc::Sender<String>) {
        Self::new_pair_with_capacity(100)
    }

    /// Create with custom channel capacity
    #[must_use]
    pub fn new_pair_with_capacity(
        capacity: usize,
    ) -> (Self, mpsc::Receiver<String>, mpsc::Sender<String>) {
        let (outbound_tx, outbound_rx) = mpsc::channel(capacity);
        let (inbound_tx, inbound_rx) = mpsc::channel(capacity);

        let transport = Self {
            outbound_tx,
            inbound_rx,
            connected: Arc::new(AtomicBool::new(true)),
        };

        (transport, outbound_rx, inbound_tx)
    }
}

#[async_trait]
impl HostTransport for InProcessTransport {
    async fn connect(&mut self) -> Result<(), TransportError> {
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), TransportError> {
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn send(&self, text: String) -> Result<(), TransportError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(TransportError::InvalidState(
                "Transport not connected".to_string(),
            ));
        }

        self.outbound_tx
            .send(text)
            .await
            .map_err(|_| TransportError::SendFailed("Channel closed".to_string()))
    }

    async fn recv(&mut self) -> Result<String, TransportError> {
        self.inbound_rx
            .recv()
            .await
            .ok_or(TransportError::ConnectionClosed)
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}
