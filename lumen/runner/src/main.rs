//! Lumen Runner - Command-line driver for the Lumen renderer
//!
//! Launches the Lumen host (or attaches to a running one) and sends it
//! command scripts.
//!
//! # Usage
//!
//! ```bash
//! # Send a Lua file as an executable script
//! lumen-runner --executable /opt/lumen/Lumen run scene.lua
//!
//! # Draw the demonstration scene on a host that is already running
//! lumen-runner --connect 127.0.0.1:9001 demo
//!
//! # Print the endpoint the host announces
//! lumen-runner discover
//!
//! # Open a GUI window and log its callbacks until Ctrl+C
//! lumen-runner gui --name "Control Panel"
//!
//! # Verbose logging, including forwarded host output
//! RUST_LOG=debug lumen-runner demo
//! ```
//!
//! # Signals
//!
//! - `SIGTERM` / `SIGINT`: Stop waiting and shut the instance down

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};

use lumen_core::{load_config_from_path, ConfigOverrides, Endpoint, LumenConfig};

/// Lumen Runner - Send scripts to the Lumen renderer
#[derive(Parser, Debug)]
#[command(name = "lumen-runner")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long, global = true, env = "LUMEN_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Host executable, overriding the configuration
    #[arg(short = 'e', long, global = true, value_name = "PATH")]
    executable: Option<PathBuf>,

    /// Attach to a running host instead of launching one
    #[arg(long, global = true, value_name = "ENDPOINT")]
    connect: Option<Endpoint>,

    /// Seconds to wait for the host to announce its endpoint (0 waits forever)
    #[arg(long, global = true, value_name = "SECS")]
    discovery_timeout: Option<u64>,

    /// Terminate a launched host on exit instead of leaving it running
    #[arg(long, global = true)]
    kill_on_exit: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, global = true, env = "LUMEN_LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

/// What to do once connected
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Send a Lua file as an executable script
    Run {
        /// Script file
        file: PathBuf,
    },
    /// Draw the demonstration scene
    Demo,
    /// Launch the host and print the endpoint it announces
    Discover,
    /// Open a sample GUI window and log its callbacks until interrupted
    Gui {
        /// Window name
        #[arg(short = 'n', long, default_value = "Lumen Runner")]
        name: String,
    },
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides::new();
        if let Some(path) = &self.executable {
            overrides = overrides.with_executable(path.clone());
        }
        if let Some(secs) = self.discovery_timeout {
            overrides = overrides.with_discovery_timeout_secs(secs);
        }
        if self.kill_on_exit {
            overrides = overrides.with_kill_on_shutdown(true);
        }
        overrides
    }
}

/// Initialize logging with the specified level
fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("lumen_runner={level},lumen_core={level}"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

fn resolve_config(args: &Args) -> Result<LumenConfig> {
    let mut config =
        load_config_from_path(args.config.clone()).context("Failed to load configuration")?;
    args.overrides().apply(&mut config);
    config.validate().context("Invalid configuration")?;

    info!(
        source = %config.source(),
        path = ?config.config_file_path,
        "Configuration loaded"
    );
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level);
    info!(version = env!("CARGO_PKG_VERSION"), "Lumen runner starting");

    let config = resolve_config(&args)?;

    let result = match &args.command {
        Command::Discover => commands::discover(&config).await,
        Command::Run { file } => commands::run_file(&config, args.connect.clone(), file).await,
        Command::Demo => commands::demo(&config, args.connect.clone()).await,
        Command::Gui { name } => commands::gui(&config, args.connect.clone(), name).await,
    };

    match result {
        Ok(()) => {
            info!("Lumen runner finished");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Lumen runner failed");
            Err(e)
        }
    }
}
