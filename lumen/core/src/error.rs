//! Crate-level error type.

use thiserror::Error;

use crate::config::ConfigError;
use crate::host::{DiscoveryError, LaunchError};
use crate::instance::InstanceState;
use crate::transport::TransportError;

/// Any error a [`LumenInstance`](crate::LumenInstance) operation can return
#[derive(Debug, Error)]
pub enum LumenError {
    /// Starting the host failed
    #[error(transparent)]
    Launch(#[from] LaunchError),

    /// The host endpoint could not be discovered
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    /// Connecting, sending or receiving failed
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The operation is not valid in the current lifecycle state
    #[error("Cannot {operation} while {state}")]
    InvalidState {
        /// Operation that was attempted
        operation: &'static str,
        /// State the instance was in
        state: InstanceState,
    },
}

/// Result alias for instance operations
pub type Result<T> = std::result::Result<T, LumenError>;
