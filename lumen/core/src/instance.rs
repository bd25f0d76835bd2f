//! Lumen Instance
//!
//! Owns one host session: the optional child process, the connection to the
//! host and any callback servers started for GUI scripts.
//!
//! # Lifecycle
//!
//! ```text
//! Unstarted -> Launching -> Discovering -> Connected -> Closed
//! ```
//!
//! [`LumenInstance::attach`] and [`LumenInstance::with_transport`] skip the
//! launch and discovery steps. A failure in any step moves the instance to
//! `Closed`.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{LumenError, Result};
use crate::host::{self, discover_endpoint, DiscoveryConfig, Endpoint, HostProcess, LaunchConfig};
use crate::script::{GuiEvent, GuiScript, Script};
use crate::transport::{
    CallbackServer, CallbackServerHandle, HostTransport, MessageHandler, TransportConfig,
    TransportError, WebSocketClient,
};

/// Settings for discovery and the transports of one instance
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InstanceConfig {
    /// Endpoint discovery on host stdout
    pub discovery: DiscoveryConfig,
    /// Client connection and callback server settings
    pub transport: TransportConfig,
}

/// Where an instance is in its lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstanceState {
    /// Nothing started yet
    Unstarted,
    /// Host process is being spawned
    Launching,
    /// Waiting for the host to announce its endpoint
    Discovering,
    /// Connected; scripts can be sent
    Connected,
    /// Shut down or failed
    Closed,
}

impl fmt::Display for InstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unstarted => "unstarted",
            Self::Launching => "launching",
            Self::Discovering => "discovering",
            Self::Connected => "connected",
            Self::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// A session with one Lumen host
pub struct LumenInstance {
    state: InstanceState,
    config: InstanceConfig,
    process: Option<HostProcess>,
    kill_on_shutdown: bool,
    endpoint: Option<Endpoint>,
    transport: Option<Box<dyn HostTransport>>,
    servers: Vec<CallbackServerHandle>,
}

impl fmt::Debug for LumenInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LumenInstance")
            .field("state", &self.state)
            .field("endpoint", &self.endpoint)
            .field("pid", &self.pid())
            .field("servers", &self.servers.len())
            .finish_non_exhaustive()
    }
}

impl LumenInstance {
    /// Create an unstarted instance
    #[must_use]
    pub fn new(config: InstanceConfig) -> Self {
        Self {
            state: InstanceState::Unstarted,
            config,
            process: None,
            kill_on_shutdown: false,
            endpoint: None,
            transport: None,
            servers: Vec::new(),
        }
    }

    /// Spawn the host, discover its endpoint and connect
    ///
    /// # Errors
    ///
    /// Returns the error of whichever step failed. A child that was already
    /// spawned is terminated if `kill_on_shutdown` is set and detached
    /// otherwise.
    pub async fn launch(launch: &LaunchConfig, config: InstanceConfig) -> Result<Self> {
        let mut instance = Self::new(config);
        instance.start(launch).await?;
        Ok(instance)
    }

    /// Connect to a host that is already running
    ///
    /// # Errors
    ///
    /// Returns a transport error if the connection cannot be opened.
    pub async fn attach(endpoint: Endpoint, config: InstanceConfig) -> Result<Self> {
        let mut instance = Self::new(config);
        instance.connect_to(endpoint).await?;
        Ok(instance)
    }

    /// Use an existing transport instead of launching or attaching
    ///
    /// The transport is connected first if it is not already.
    ///
    /// # Errors
    ///
    /// Returns a transport error if connecting fails.
    pub async fn with_transport(mut transport: Box<dyn HostTransport>) -> Result<Self> {
        if !transport.is_connected() {
            transport.connect().await?;
        }

        let mut instance = Self::new(InstanceConfig::default());
        instance.transport = Some(transport);
        instance.state = InstanceState::Connected;
        Ok(instance)
    }

    /// Replace the settings used by later operations
    #[must_use]
    pub fn with_config(mut self, config: InstanceConfig) -> Self {
        self.config = config;
        self
    }

    /// Run launch, discovery and connect on an unstarted instance
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` unless the instance is unstarted, otherwise the
    /// error of the failing step.
    pub async fn start(&mut self, launch: &LaunchConfig) -> Result<()> {
        self.require("launch", InstanceState::Unstarted)?;

        self.state = InstanceState::Launching;
        self.kill_on_shutdown = launch.kill_on_shutdown;
        let (process, stdout) = match host::spawn(launch) {
            Ok(spawned) => spawned,
            Err(e) => return Err(self.fail(e.into()).await),
        };
        info!(pid = ?process.pid(), executable = ?process.executable(), "Host launched");
        self.process = Some(process);

        self.state = InstanceState::Discovering;
        let discovery = match discover_endpoint(stdout, &self.config.discovery).await {
            Ok(found) => found,
            Err(e) => return Err(self.fail(e.into()).await),
        };

        self.connect_to(discovery.endpoint).await
    }

    async fn connect_to(&mut self, endpoint: Endpoint) -> Result<()> {
        let mut client = WebSocketClient::new(endpoint.url(), self.config.transport.clone());
        if let Err(e) = client.connect().await {
            return Err(self.fail(e.into()).await);
        }

        info!(endpoint = %endpoint, "Connected to host");
        self.endpoint = Some(endpoint);
        self.transport = Some(Box::new(client));
        self.state = InstanceState::Connected;
        Ok(())
    }

    /// Close the instance after a failed step and hand the error back
    async fn fail(&mut self, error: LumenError) -> LumenError {
        warn!(state = %self.state, error = %error, "Instance start failed");
        self.release_process().await;
        self.state = InstanceState::Closed;
        error
    }

    async fn release_process(&mut self) {
        let Some(mut process) = self.process.take() else {
            return;
        };

        if self.kill_on_shutdown {
            if let Err(e) = process.terminate().await {
                warn!(pid = ?process.pid(), error = %e, "Failed to terminate host");
            }
        } else {
            process.detach();
        }
    }

    fn require(&self, operation: &'static str, expected: InstanceState) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(LumenError::InvalidState {
                operation,
                state: self.state,
            })
        }
    }

    fn connected_transport(&mut self, operation: &'static str) -> Result<&mut dyn HostTransport> {
        let state = self.state;
        match (state, self.transport.as_mut()) {
            (InstanceState::Connected, Some(transport)) => Ok(transport.as_mut()),
            _ => Err(LumenError::InvalidState { operation, state }),
        }
    }

    /// Current lifecycle state
    #[must_use]
    pub fn state(&self) -> InstanceState {
        self.state
    }

    /// Endpoint the client is connected to, if it went through discovery or attach
    #[must_use]
    pub fn endpoint(&self) -> Option<&Endpoint> {
        self.endpoint.as_ref()
    }

    /// Process id of the launched host
    #[must_use]
    pub fn pid(&self) -> Option<u32> {
        self.process.as_ref().and_then(HostProcess::pid)
    }

    /// Callback servers started by [`start_server`](Self::start_server)
    #[must_use]
    pub fn servers(&self) -> &[CallbackServerHandle] {
        &self.servers
    }

    /// Send the current contents of `script`
    ///
    /// The script is not drained; call [`Script::clear`] to start over.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` unless connected, or the send error.
    pub async fn execute_script(&mut self, script: &Script) -> Result<()> {
        let text = script.snapshot();
        debug!(kind = ?script.kind(), bytes = text.len(), "Executing script");
        self.send(text).await
    }

    /// Send raw text as one message
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` unless connected, or the send error.
    pub async fn send(&mut self, text: impl Into<String>) -> Result<()> {
        let transport = self.connected_transport("send")?;
        transport.send(text.into()).await?;
        Ok(())
    }

    /// Wait for the next message from the host
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` unless connected, or the receive error.
    pub async fn recv(&mut self) -> Result<String> {
        let transport = self.connected_transport("receive")?;
        Ok(transport.recv().await?)
    }

    /// Start a callback server for `gui` and send the script to the host
    ///
    /// The server address is announced in the script header before sending.
    /// Messages from the host window go to the script's server handler, or
    /// are logged when it has none.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` unless connected, a bind error, or the send
    /// error. The server is shut down again if the send fails.
    pub async fn start_server(&mut self, gui: &mut GuiScript) -> Result<CallbackServerHandle> {
        self.require("start a callback server", InstanceState::Connected)?;

        let server = CallbackServer::bind(&self.config.transport).await?;
        let SocketAddr::V4(bound) = server.local_addr() else {
            return Err(TransportError::InvalidState(format!(
                "callback server bound to non-IPv4 address {}",
                server.local_addr()
            ))
            .into());
        };
        gui.announce_endpoint(announced_addr(bound));

        let handler = gui.server_handler().unwrap_or_else(logging_handler);
        let handle = server.spawn(handler);

        if let Err(e) = self.send(gui.snapshot()).await {
            let _ = handle.shutdown().await;
            return Err(e);
        }

        info!(gui = gui.name(), addr = %handle.local_addr(), "GUI script sent");
        self.servers.push(handle.clone());
        Ok(handle)
    }

    /// Close the connection, stop callback servers and release the host
    ///
    /// Safe to call more than once. Every step runs even if an earlier one
    /// fails; the first error is returned.
    ///
    /// # Errors
    ///
    /// Returns the first disconnect or shutdown error.
    pub async fn shutdown(&mut self) -> Result<()> {
        if self.state == InstanceState::Closed {
            return Ok(());
        }

        let mut first_error: Option<LumenError> = None;

        for server in self.servers.drain(..) {
            if let Err(e) = server.shutdown().await {
                warn!(error = %e, "Callback server shutdown failed");
                first_error.get_or_insert(e.into());
            }
        }

        if let Some(mut transport) = self.transport.take() {
            if let Err(e) = transport.disconnect().await {
                warn!(error = %e, "Disconnect failed");
                first_error.get_or_insert(e.into());
            }
        }

        self.release_process().await;
        self.state = InstanceState::Closed;
        info!("Instance shut down");

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Address a host should dial for a server bound to `addr`
fn announced_addr(addr: SocketAddrV4) -> SocketAddrV4 {
    if addr.ip().is_unspecified() {
        SocketAddrV4::new(Ipv4Addr::LOCALHOST, addr.port())
    } else {
        addr
    }
}

fn logging_handler() -> MessageHandler {
    Arc::new(|text: &str| match GuiEvent::parse(text) {
        Some(event) => info!(event = ?event, "GUI callback"),
        None => info!(message = text, "Host message"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::InProcessTransport;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;
    use std::time::Duration;

    async fn in_process() -> (
        LumenInstance,
        tokio::sync::mpsc::Receiver<String>,
        tokio::sync::mpsc::Sender<String>,
    ) {
        let (transport, script_rx, reply_tx) = InProcessTransport::new_pair();
        let instance = LumenInstance::with_transport(Box::new(transport)).await.unwrap();
        (instance, script_rx, reply_tx)
    }

    #[test]
    fn test_state_display() {
        assert_eq!(InstanceState::Unstarted.to_string(), "unstarted");
        assert_eq!(InstanceState::Connected.to_string(), "connected");
    }

    #[test]
    fn test_announced_addr_replaces_unspecified() {
        let addr: SocketAddrV4 = "0.0.0.0:4000".parse().unwrap();
        assert_eq!(announced_addr(addr), "127.0.0.1:4000".parse().unwrap());

        let addr: SocketAddrV4 = "10.0.0.5:4000".parse().unwrap();
        assert_eq!(announced_addr(addr), addr);
    }

    #[tokio::test]
    async fn test_execute_script_sends_snapshot() {
        let (mut instance, mut script_rx, _reply_tx) = in_process().await;
        assert_eq!(instance.state(), InstanceState::Connected);

        let mut script = Script::executable();
        script.begin_scene_2d("Scene");
        script.draw_line_2d(
            (0.0, 0.0, 0.0).into(),
            (1.0, 1.0, 0.0).into(),
            2.0,
            crate::script::Color::WHITE,
        );

        instance.execute_script(&script).await.unwrap();
        assert_eq!(script_rx.recv().await, Some(script.snapshot()));

        // Not drained: sending again produces the same text.
        instance.execute_script(&script).await.unwrap();
        assert_eq!(script_rx.recv().await, Some(script.snapshot()));
    }

    #[tokio::test]
    async fn test_recv_from_host() {
        let (mut instance, _script_rx, reply_tx) = in_process().await;
        reply_tx.send("ok".to_string()).await.unwrap();
        assert_eq!(instance.recv().await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_send_requires_connection() {
        let mut instance = LumenInstance::new(InstanceConfig::default());
        let result = instance.send("Text(\"x\")\n").await;
        assert!(matches!(
            result,
            Err(LumenError::InvalidState {
                state: InstanceState::Unstarted,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_shutdown_is_idempotent() {
        let (mut instance, _script_rx, _reply_tx) = in_process().await;

        instance.shutdown().await.unwrap();
        assert_eq!(instance.state(), InstanceState::Closed);
        instance.shutdown().await.unwrap();

        let result = instance.send("x").await;
        assert!(matches!(
            result,
            Err(LumenError::InvalidState {
                state: InstanceState::Closed,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_launch_missing_executable_closes() {
        let launch = LaunchConfig::new("/nonexistent/lumen/Lumen");
        let mut instance = LumenInstance::new(InstanceConfig::default());

        let result = instance.start(&launch).await;
        assert!(matches!(result, Err(LumenError::Launch(_))));
        assert_eq!(instance.state(), InstanceState::Closed);

        let again = instance.start(&launch).await;
        assert!(matches!(again, Err(LumenError::InvalidState { .. })));
    }

    #[tokio::test]
    async fn test_attach_unreachable_endpoint() {
        let config = InstanceConfig {
            transport: TransportConfig {
                connect_timeout_ms: 500,
                ..TransportConfig::default()
            },
            ..InstanceConfig::default()
        };

        // Bind then drop to get a port nothing listens on.
        let port = {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };

        let result = LumenInstance::attach(Endpoint::new("127.0.0.1", port), config).await;
        assert!(matches!(result, Err(LumenError::Transport(_))));
    }

    #[tokio::test]
    async fn test_start_server_announces_and_dispatches() {
        use futures::SinkExt;
        use tokio_tungstenite::{connect_async, tungstenite::Message};

        let (mut instance, mut script_rx, _reply_tx) = in_process().await;

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut gui = GuiScript::new("Panel");
        gui.button("OK", (80.0, 20.0).into());
        gui.set_server_handler(move |text: &str| sink.lock().unwrap().push(text.to_string()));

        let handle = instance.start_server(&mut gui).await.unwrap();
        let addr = handle.local_addr();

        let sent = script_rx.recv().await.unwrap();
        let announcement = format!("-- Websocket: '{}:{}'.", addr.ip(), addr.port());
        let announced_at = sent.find(&announcement).unwrap();
        let button_at = sent.find("Button(").unwrap();
        assert!(announced_at < button_at);

        let (mut ws, _) = connect_async(format!("ws://{addr}")).await.unwrap();
        ws.send(Message::Text("[Button] OK : Pressed.".to_string()))
            .await
            .unwrap();

        for _ in 0..100 {
            if !seen.lock().unwrap().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(*seen.lock().unwrap(), vec!["[Button] OK : Pressed.".to_string()]);

        instance.shutdown().await.unwrap();
        assert!(!handle.is_running());
    }

    #[tokio::test]
    async fn test_start_server_requires_connection() {
        let mut instance = LumenInstance::new(InstanceConfig::default());
        let mut gui = GuiScript::new("Panel");
        let result = instance.start_server(&mut gui).await;
        assert!(matches!(result, Err(LumenError::InvalidState { .. })));
        assert!(instance.servers().is_empty());
    }

    #[tokio::test]
    async fn test_closed_transport_surfaces_error() {
        let (transport, script_rx, _reply_tx) = InProcessTransport::new_pair();
        let mut instance = LumenInstance::with_transport(Box::new(transport)).await.unwrap();
        drop(script_rx);

        let result = instance.send("x").await;
        assert!(matches!(
            result,
            Err(LumenError::Transport(TransportError::SendFailed(_)))
        ));
    }
}
