//! Lumen Core - Client Library for the Lumen Renderer
//!
//! Builds Lua command scripts, launches the Lumen host, discovers the
//! websocket endpoint it prints on stdout and sends scripts over that
//! connection. GUI scripts can also ask the host to connect back to a local
//! callback server, so window events reach Rust code.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐   spawn, stdout   ┌──────────────────────┐
//! │     LumenInstance    │ ────────────────► │      Lumen host      │
//! │  ┌────────────────┐  │  "Connected to"   │                      │
//! │  │ host::discovery│◄─┼───────────────────┤  websocket server    │
//! │  └────────────────┘  │                   │                      │
//! │  ┌────────────────┐  │   script text     │                      │
//! │  │ WebSocketClient│──┼──────────────────►│                      │
//! │  └────────────────┘  │                   │                      │
//! │  ┌────────────────┐  │  GUI callbacks    │  GUI window client   │
//! │  │ CallbackServer │◄─┼───────────────────┤                      │
//! │  └────────────────┘  │                   │                      │
//! └──────────────────────┘                   └──────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use lumen_core::{Color, InstanceConfig, LaunchConfig, LumenInstance, Script};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), lumen_core::LumenError> {
//!     let launch = LaunchConfig::new("/opt/lumen/Lumen");
//!     let mut lumen = LumenInstance::launch(&launch, InstanceConfig::default()).await?;
//!
//!     let mut script = Script::executable();
//!     script
//!         .begin_scene_2d("Demo")
//!         .draw_quad_2d((0.0, 0.0, 0.0).into(), (0.5, 0.5, 0.0).into(), Color::WHITE);
//!     lumen.execute_script(&script).await?;
//!
//!     lumen.shutdown().await
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`script`]: Command script builder, GUI scripts and callback events
//! - [`host`]: Launching the host and discovering its endpoint
//! - [`transport`]: Websocket client, callback server and in-process transport
//! - [`instance`]: Session lifecycle tying the pieces together
//! - [`config`]: TOML and environment configuration

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod host;
pub mod instance;
pub mod script;
pub mod transport;

// Re-exports for convenience
pub use error::LumenError;
pub use instance::{InstanceConfig, InstanceState, LumenInstance};

pub use script::{
    Color, GuiEvent, GuiScript, HorizontalAlign, Param, Script, ScriptKind, Vec2, Vec3,
    VerticalAlign,
};

// Host exports
pub use host::{
    discover_endpoint, Discovery, DiscoveryConfig, DiscoveryError, Endpoint, HostProcess,
    LaunchConfig, LaunchError,
};

// Transport exports
pub use transport::{
    CallbackServer, CallbackServerHandle, ConnectionId, HostTransport, InProcessTransport,
    MessageHandler, TransportConfig, TransportError, WebSocketClient,
};

// Config exports
pub use config::{
    default_config_path, load_config, load_config_from_path, ConfigError, ConfigOverrides,
    ConfigSource, LumenConfig, LumenToml,
};
