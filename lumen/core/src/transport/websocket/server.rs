//! Callback Server
//!
//! Inbound websocket server a host GUI window connects back to.
//!
//! Each accepted connection gets:
//! - a read task that queues text messages for dispatch
//! - a dispatch task that runs the handler on the blocking pool, one message
//!   at a time, so messages from one connection reach the handler in order
//! - a write task for replies sent through [`CallbackServerHandle::send_to`]
//!
//! A slow handler only delays later messages on its own connection.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio_tungstenite::{accept_async, tungstenite::Message};

use crate::transport::config::TransportConfig;
use crate::transport::traits::{ConnectionId, MessageHandler, TransportError};

type ConnectionMap = Arc<RwLock<HashMap<ConnectionId, ConnectionHandle>>>;

/// Handle to a single connection
struct ConnectionHandle {
    /// Replies to this host window
    tx: mpsc::Sender<String>,
}

/// A bound, not yet running, callback server
pub struct CallbackServer {
    listener: TcpListener,
    local_addr: SocketAddr,
    capacity: usize,
}

impl CallbackServer {
    /// Bind to `callback_bind_address` on an ephemeral port
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound.
    pub async fn bind(config: &TransportConfig) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(config.callback_bind_addr()).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!(addr = %local_addr, "Callback server bound");

        Ok(Self {
            listener,
            local_addr,
            capacity: config.capacity(),
        })
    }

    /// The bound address, including the assigned port
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Start the accept loop on its own task
    ///
    /// The server runs until [`CallbackServerHandle::shutdown`] is called or
    /// the last clone of the handle is dropped.
    #[must_use]
    pub fn spawn(self, handler: MessageHandler) -> CallbackServerHandle {
        let connections: ConnectionMap = Arc::new(RwLock::new(HashMap::new()));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let accept_task = tokio::spawn(accept_loop(
            self.listener,
            handler,
            Arc::clone(&connections),
            self.capacity,
            shutdown_rx,
        ));

        CallbackServerHandle {
            local_addr: self.local_addr,
            connections,
            shutdown_tx: Arc::new(shutdown_tx),
            accept_task: Arc::new(Mutex::new(Some(accept_task))),
        }
    }
}

/// Control handle of a running callback server; clones share one server
#[derive(Clone)]
pub struct CallbackServerHandle {
    local_addr: SocketAddr,
    connections: ConnectionMap,
    shutdown_tx: Arc<watch::Sender<bool>>,
    accept_task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl std::fmt::Debug for CallbackServerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackServerHandle")
            .field("local_addr", &self.local_addr)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl CallbackServerHandle {
    /// The address hosts connect to
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Whether shutdown has not been requested yet
    #[must_use]
    pub fn is_running(&self) -> bool {
        !*self.shutdown_tx.borrow()
    }

    /// Ids of the currently open connections
    pub async fn connections(&self) -> Vec<ConnectionId> {
        let mut ids: Vec<ConnectionId> = self.connections.read().await.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Send a text message to one connection
    ///
    /// # Errors
    ///
    /// Returns `SendFailed` if the connection is unknown or already closed.
    pub async fn send_to(&self, conn_id: &ConnectionId, text: String) -> Result<(), TransportError> {
        let tx = self
            .connections
            .read()
            .await
            .get(conn_id)
            .map(|handle| handle.tx.clone());

        let Some(tx) = tx else {
            return Err(TransportError::SendFailed(format!(
                "Unknown connection: {conn_id}"
            )));
        };

        tx.send(text)
            .await
            .map_err(|_| TransportError::SendFailed("Channel closed".to_string()))
    }

    /// Send a text message to every open connection
    ///
    /// # Errors
    ///
    /// Never fails; individual send failures are logged.
    pub async fn broadcast(&self, text: String) -> Result<(), TransportError> {
        // Senders are cloned so a full queue never holds the registry lock.
        let targets: Vec<(ConnectionId, mpsc::Sender<String>)> = self
            .connections
            .read()
            .await
            .iter()
            .map(|(conn_id, handle)| (*conn_id, handle.tx.clone()))
            .collect();

        for (conn_id, tx) in targets {
            if let Err(e) = tx.send(text.clone()).await {
                tracing::warn!(conn_id = %conn_id, error = %e, "Broadcast send failed");
            }
        }

        Ok(())
    }

    /// Stop accepting, close every connection and wait for the accept loop
    ///
    /// Calling it again, from any clone, is a no-op.
    ///
    /// # Errors
    ///
    /// Currently infallible; the `Result` matches the other transports.
    pub async fn shutdown(&self) -> Result<(), TransportError> {
        let Some(accept_task) = self.accept_task.lock().await.take() else {
            return Ok(());
        };

        self.shutdown_tx.send_replace(true);
        if let Err(e) = accept_task.await {
            tracing::warn!(error = %e, "Accept loop ended abnormally");
        }

        self.connections.write().await.clear();

        tracing::info!(addr = %self.local_addr, "Callback server shut down");
        Ok(())
    }
}

async fn accept_loop(
    listener: TcpListener,
    handler: MessageHandler,
    connections: ConnectionMap,
    capacity: usize,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => break,
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    tokio::spawn(serve_connection(
                        stream,
                        peer,
                        Arc::clone(&handler),
                        Arc::clone(&connections),
                        capacity,
                        shutdown_rx.clone(),
                    ));
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Accept failed");
                }
            },
        }
    }

    tracing::debug!("Accept loop stopped");
}

async fn serve_connection(
    stream: TcpStream,
    peer: SocketAddr,
    handler: MessageHandler,
    connections: ConnectionMap,
    capacity: usize,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let ws = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            tracing::warn!(peer = %peer, error = %e, "Websocket handshake failed");
            return;
        }
    };

    let conn_id = ConnectionId::new();
    let (mut sink, mut source) = ws.split();

    let (reply_tx, mut reply_rx) = mpsc::channel::<String>(capacity);
    let (dispatch_tx, mut dispatch_rx) = mpsc::channel::<String>(capacity);

    connections
        .write()
        .await
        .insert(conn_id, ConnectionHandle { tx: reply_tx });
    tracing::info!(conn_id = %conn_id, peer = %peer, "Host connected");

    // Dispatch task: one handler call at a time, in arrival order
    let dispatcher = tokio::spawn(async move {
        while let Some(text) = dispatch_rx.recv().await {
            let handler = Arc::clone(&handler);
            if let Err(e) = tokio::task::spawn_blocking(move || handler(&text)).await {
                tracing::warn!(conn_id = %conn_id, error = %e, "Message handler panicked");
            }
        }
    });

    // Write task: reply_rx -> socket
    let writer = tokio::spawn(async move {
        while let Some(text) = reply_rx.recv().await {
            if let Err(e) = sink.send(Message::Text(text)).await {
                tracing::warn!(conn_id = %conn_id, error = %e, "Write error");
                return;
            }
        }
        let _ = sink.close().await;
    });

    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => break,
            frame = source.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    tracing::debug!(conn_id = %conn_id, bytes = text.len(), "Message received");
                    if dispatch_tx.send(text).await.is_err() {
                        break;
                    }
                }
                Some(Ok(Message::Close(_))) | None => {
                    tracing::debug!(conn_id = %conn_id, "Connection closed by peer");
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!(conn_id = %conn_id, error = %e, "Read error");
                    break;
                }
            },
        }
    }

    // Removing the handle drops the reply sender, which ends the write task.
    connections.write().await.remove(&conn_id);
    drop(dispatch_tx);
    let _ = writer.await;
    let _ = dispatcher.await;

    tracing::info!(conn_id = %conn_id, "Connection ended");
}
