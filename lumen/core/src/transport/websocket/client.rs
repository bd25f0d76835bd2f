//! WebSocket Client Transport
//!
//! Outbound connection to the endpoint a host announced on stdout.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::transport::config::TransportConfig;
use crate::transport::traits::{HostTransport, TransportError};

/// Websocket connection to a host
///
/// `connect` spawns a read task and a write task. Sent scripts are queued to
/// the write task in order; `disconnect` lets the queue drain, sends a close
/// frame and waits up to `close_timeout_ms` for both tasks to finish.
pub struct WebSocketClient {
    url: String,
    config: TransportConfig,
    /// Messages received from the host
    inbound_rx: Option<mpsc::Receiver<String>>,
    /// Messages waiting to be written
    outbound_tx: Option<mpsc::Sender<String>>,
    reader: Option<JoinHandle<()>>,
    writer: Option<JoinHandle<()>>,
    connected: Arc<AtomicBool>,
}

impl WebSocketClient {
    /// Create a client for `url` (e.g. `ws://127.0.0.1:9001`)
    pub fn new(url: impl Into<String>, config: TransportConfig) -> Self {
        Self {
            url: url.into(),
            config,
            inbound_rx: None,
            outbound_tx: None,
            reader: None,
            writer: None,
            connected: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Target URL
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl HostTransport for WebSocketClient {
    async fn connect(&mut self) -> Result<(), TransportError> {
        if self.connected.load(Ordering::SeqCst) {
            return Err(TransportError::InvalidState(
                "Already connected".to_string(),
            ));
        }

        let timeout = self.config.connect_timeout();
        let (stream, _response) = tokio::time::timeout(timeout, connect_async(self.url.as_str()))
            .await
            .map_err(|_| TransportError::Timeout(timeout))?
            .map_err(|e| {
                TransportError::ConnectionFailed(format!(
                    "Failed to connect to {}: {}",
                    self.url, e
                ))
            })?;

        let (mut sink, mut source) = stream.split();

        let capacity = self.config.capacity();
        let (inbound_tx, inbound_rx) = mpsc::channel::<String>(capacity);
        let (outbound_tx, mut outbound_rx) = mpsc::channel::<String>(capacity);

        self.connected.store(true, Ordering::SeqCst);

        // Read task: socket -> inbound_tx
        let connected_read = Arc::clone(&self.connected);
        let url_read = self.url.clone();
        let reader = tokio::spawn(async move {
            while let Some(frame) = source.next().await {
                match frame {
                    Ok(Message::Text(text)) => {
                        if inbound_tx.send(text).await.is_err() {
                            tracing::debug!("Inbound receiver dropped");
                            break;
                        }
                    }
                    Ok(Message::Binary(data)) => {
                        let text = String::from_utf8_lossy(&data).into_owned();
                        if inbound_tx.send(text).await.is_err() {
                            break;
                        }
                    }
                    Ok(Message::Close(frame)) => {
                        tracing::debug!(close = ?frame, "Host closed the connection");
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!(error = %e, "Read error");
                        break;
                    }
                }
            }

            connected_read.store(false, Ordering::SeqCst);
            tracing::info!(url = %url_read, "Disconnected from host");
        });

        // Write task: outbound_rx -> socket, then close
        let connected_write = Arc::clone(&self.connected);
        let writer = tokio::spawn(async move {
            while let Some(text) = outbound_rx.recv().await {
                if let Err(e) = sink.send(Message::Text(text)).await {
                    tracing::warn!(error = %e, "Write error");
                    connected_write.store(false, Ordering::SeqCst);
                    return;
                }
            }

            if let Err(e) = sink.close().await {
                tracing::debug!(error = %e, "Close frame not sent");
            }
            connected_write.store(false, Ordering::SeqCst);
        });

        self.inbound_rx = Some(inbound_rx);
        self.outbound_tx = Some(outbound_tx);
        self.reader = Some(reader);
        self.writer = Some(writer);

        tracing::info!(url = %self.url, "Connected to host");
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), TransportError> {
        // Dropping the sender ends the write loop after the queue drains.
        let Some(outbound_tx) = self.outbound_tx.take() else {
            self.connected.store(false, Ordering::SeqCst);
            return Ok(());
        };
        drop(outbound_tx);

        let deadline = self.config.close_timeout();
        if let Some(mut writer) = self.writer.take() {
            if tokio::time::timeout(deadline, &mut writer).await.is_err() {
                tracing::warn!(timeout = ?deadline, "Write queue did not drain before close");
                writer.abort();
            }
        }
        if let Some(mut reader) = self.reader.take() {
            if tokio::time::timeout(deadline, &mut reader).await.is_err() {
                tracing::debug!("Host did not acknowledge close");
                reader.abort();
            }
        }

        self.inbound_rx = None;
        self.connected.store(false, Ordering::SeqCst);

        tracing::info!(url = %self.url, "Disconnected");
        Ok(())
    }

    async fn send(&self, text: String) -> Result<(), TransportError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(TransportError::InvalidState("Not connected".to_string()));
        }

        if let Some(ref tx) = self.outbound_tx {
            tx.send(text)
                .await
                .map_err(|_| TransportError::SendFailed("Channel closed".to_string()))
        } else {
            Err(TransportError::InvalidState("Not connected".to_string()))
        }
    }

    async fn recv(&mut self) -> Result<String, TransportError> {
        if let Some(ref mut rx) = self.inbound_rx {
            rx.recv().await.ok_or(TransportError::ConnectionClosed)
        } else {
            Err(TransportError::InvalidState("Not connected".to_string()))
        }
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

impl Drop for WebSocketClient {
    fn drop(&mut self) {
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
    }
}
