//! Host Process
//!
//! Starting the host executable and learning where it listens.
//!
//! ```ignore
//! let (process, stdout) = host::spawn(&LaunchConfig::new("/opt/lumen/Lumen"))?;
//! let found = host::discover_endpoint(stdout, &DiscoveryConfig::default()).await?;
//! println!("host listening on {}", found.endpoint.url());
//! ```

pub mod discovery;
pub mod launcher;

pub use discovery::{
    discover_endpoint, AfterStop, Discovery, DiscoveryConfig, DiscoveryError, Endpoint,
    EndpointMatcher, LineScanner, DEFAULT_DISCOVERY_TIMEOUT, DEFAULT_ENDPOINT_MARKER,
    HOST_OUTPUT_TARGET,
};
pub use launcher::{spawn, HostProcess, LaunchConfig, LaunchError};
