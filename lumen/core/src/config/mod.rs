//! TOML Configuration File Support
//!
//! Loads client settings from `~/.config/lumen/client.toml`.
//!
//! # Configuration Priority
//!
//! Configuration values are loaded with the following priority (highest first):
//! 1. CLI arguments (via [`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [host]
//! executable = "C:/Lumen/Binaries/Executables/x64/Release/Lumen.exe"
//! args = []
//! working_dir = "C:/Lumen"
//! kill_on_shutdown = false
//!
//! [discovery]
//! marker = "[LUMEN] [WEBSOCKET] : Connected to '"
//! timeout_secs = 30        # 0 = wait forever
//! forward_output = true
//!
//! [transport]
//! connect_timeout_ms = 5000
//! close_timeout_ms = 2000
//! channel_capacity = 100
//! callback_bind_address = "127.0.0.1"
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Setting |
//! |----------|---------|
//! | `LUMEN_EXECUTABLE` | `host.executable` |
//! | `LUMEN_ENDPOINT_MARKER` | `discovery.marker` |
//! | `LUMEN_DISCOVERY_TIMEOUT` | `discovery.timeout_secs` |
//! | `LUMEN_CONNECT_TIMEOUT` | `transport.connect_timeout_ms` |
//! | `LUMEN_KILL_ON_SHUTDOWN` | `host.kill_on_shutdown` |
//! | `LUMEN_CALLBACK_ADDR` | `transport.callback_bind_address` |

use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::host::{DiscoveryConfig, LaunchConfig};
use crate::instance::InstanceConfig;
use crate::transport::TransportConfig;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// `[host]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HostToml {
    /// Path to the host executable
    pub executable: Option<PathBuf>,

    /// Arguments passed to the host
    pub args: Option<Vec<String>>,

    /// Working directory for the host
    pub working_dir: Option<PathBuf>,

    /// Terminate the host on shutdown
    pub kill_on_shutdown: Option<bool>,
}

/// `[discovery]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryToml {
    /// Announcement prefix
    pub marker: Option<String>,

    /// Seconds to wait for the announcement (0 = forever)
    pub timeout_secs: Option<u64>,

    /// Keep logging host output after discovery
    pub forward_output: Option<bool>,
}

/// `[transport]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportToml {
    /// Websocket handshake timeout in milliseconds
    pub connect_timeout_ms: Option<u64>,

    /// Close handshake timeout in milliseconds
    pub close_timeout_ms: Option<u64>,

    /// Per-connection queue capacity
    pub channel_capacity: Option<usize>,

    /// Address the callback server binds to
    pub callback_bind_address: Option<String>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LumenToml {
    /// Host section
    pub host: HostToml,

    /// Discovery section
    pub discovery: DiscoveryToml,

    /// Transport section
    pub transport: TransportToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Resolved client configuration
#[derive(Clone, Debug)]
pub struct LumenConfig {
    /// Host executable; required only for launching
    pub executable: Option<PathBuf>,

    /// Arguments passed to the host
    pub args: Vec<String>,

    /// Working directory for the host
    pub working_dir: Option<PathBuf>,

    /// Terminate the host on shutdown instead of detaching
    pub kill_on_shutdown: bool,

    /// Endpoint discovery settings
    pub discovery: DiscoveryConfig,

    /// Websocket and callback server settings
    pub transport: TransportConfig,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    source: ConfigSource,
}

impl Default for LumenConfig {
    fn default() -> Self {
        Self {
            executable: None,
            args: Vec::new(),
            working_dir: None,
            kill_on_shutdown: false,
            discovery: DiscoveryConfig::default(),
            transport: TransportConfig::default(),
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl LumenConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the highest-priority source that set a value
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Launch settings for the configured executable
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if no executable is configured.
    pub fn launch_config(&self) -> Result<LaunchConfig, ConfigError> {
        let executable = self.executable.as_ref().ok_or_else(|| {
            ConfigError::ValidationError(
                "no host executable configured (set host.executable or LUMEN_EXECUTABLE)"
                    .to_string(),
            )
        })?;

        let mut launch = LaunchConfig::new(executable)
            .with_args(self.args.iter().cloned())
            .with_kill_on_shutdown(self.kill_on_shutdown);
        if let Some(dir) = &self.working_dir {
            launch = launch.with_working_dir(dir);
        }
        Ok(launch)
    }

    /// Settings consumed by [`LumenInstance`](crate::LumenInstance)
    #[must_use]
    pub fn instance_config(&self) -> InstanceConfig {
        InstanceConfig {
            discovery: self.discovery.clone(),
            transport: self.transport.clone(),
        }
    }

    /// Check values that cannot be expressed in the types
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for a blank marker.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.discovery.marker.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "discovery.marker must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/lumen/client.toml` or
/// `~/.config/lumen/client.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("lumen").join("client.toml"))
}

/// Load configuration from the default path and the environment
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed.
/// A missing config file is not an error (defaults are used).
pub fn load_config() -> Result<LumenConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path and the environment
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<LumenConfig, ConfigError> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// Load configuration, resolving environment variables through `env`
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed,
/// or holds an invalid value.
pub fn load_config_with_env<F>(path: Option<PathBuf>, env: F) -> Result<LumenConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = LumenConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: LumenToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config)?;
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config, env);
    config.validate()?;

    Ok(config)
}

fn discovery_timeout(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

fn parse_bind_address(value: &str) -> Result<Ipv4Addr, ConfigError> {
    value.trim().parse().map_err(|_| {
        ConfigError::ValidationError(format!(
            "callback_bind_address must be an IPv4 address, got '{value}'"
        ))
    })
}

fn parse_flag(value: &str) -> bool {
    value != "0" && !value.eq_ignore_ascii_case("false")
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut LumenConfig, toml: &LumenToml) -> Result<(), ConfigError> {
    // Host settings
    if toml.host.executable.is_some() {
        config.executable.clone_from(&toml.host.executable);
    }
    if let Some(ref args) = toml.host.args {
        config.args.clone_from(args);
    }
    if toml.host.working_dir.is_some() {
        config.working_dir.clone_from(&toml.host.working_dir);
    }
    if let Some(kill) = toml.host.kill_on_shutdown {
        config.kill_on_shutdown = kill;
    }

    // Discovery settings
    if let Some(ref marker) = toml.discovery.marker {
        config.discovery.marker.clone_from(marker);
    }
    if let Some(secs) = toml.discovery.timeout_secs {
        config.discovery.timeout = discovery_timeout(secs);
    }
    if let Some(forward) = toml.discovery.forward_output {
        config.discovery.forward_output = forward;
    }

    // Transport settings
    if let Some(ms) = toml.transport.connect_timeout_ms {
        config.transport.connect_timeout_ms = ms;
    }
    if let Some(ms) = toml.transport.close_timeout_ms {
        config.transport.close_timeout_ms = ms;
    }
    if let Some(capacity) = toml.transport.channel_capacity {
        if capacity == 0 {
            return Err(ConfigError::ValidationError(
                "transport.channel_capacity must be at least 1".to_string(),
            ));
        }
        config.transport.channel_capacity = capacity;
    }
    if let Some(ref addr) = toml.transport.callback_bind_address {
        config.transport.callback_bind_address = parse_bind_address(addr)?;
    }

    Ok(())
}

/// Apply environment variable overrides to the config
///
/// Unparsable values are logged and ignored.
fn apply_env_config<F>(config: &mut LumenConfig, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(executable) = env("LUMEN_EXECUTABLE") {
        config.executable = Some(PathBuf::from(executable));
        config.source = ConfigSource::Env;
    }
    if let Some(marker) = env("LUMEN_ENDPOINT_MARKER") {
        config.discovery.marker = marker;
        config.source = ConfigSource::Env;
    }
    if let Some(timeout) = env("LUMEN_DISCOVERY_TIMEOUT") {
        if let Ok(secs) = timeout.parse::<u64>() {
            config.discovery.timeout = discovery_timeout(secs);
            config.source = ConfigSource::Env;
        } else {
            tracing::warn!(value = %timeout, "Ignoring invalid LUMEN_DISCOVERY_TIMEOUT");
        }
    }
    if let Some(timeout) = env("LUMEN_CONNECT_TIMEOUT") {
        if let Ok(ms) = timeout.parse::<u64>() {
            config.transport.connect_timeout_ms = ms;
            config.source = ConfigSource::Env;
        } else {
            tracing::warn!(value = %timeout, "Ignoring invalid LUMEN_CONNECT_TIMEOUT");
        }
    }
    if let Some(kill) = env("LUMEN_KILL_ON_SHUTDOWN") {
        config.kill_on_shutdown = parse_flag(&kill);
        config.source = ConfigSource::Env;
    }
    if let Some(addr) = env("LUMEN_CALLBACK_ADDR") {
        match parse_bind_address(&addr) {
            Ok(ip) => {
                config.transport.callback_bind_address = ip;
                config.source = ConfigSource::Env;
            }
            Err(e) => tracing::warn!(error = %e, "Ignoring LUMEN_CALLBACK_ADDR"),
        }
    }
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Builder for applying CLI overrides to configuration
///
/// Use this after [`load_config`] to apply command-line argument overrides.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Host executable override
    pub executable: Option<PathBuf>,

    /// Discovery timeout override (seconds, 0 = forever)
    pub discovery_timeout_secs: Option<u64>,

    /// Connect timeout override (milliseconds)
    pub connect_timeout_ms: Option<u64>,

    /// Kill-on-shutdown override
    pub kill_on_shutdown: Option<bool>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set executable override
    #[must_use]
    pub fn with_executable(mut self, path: PathBuf) -> Self {
        self.executable = Some(path);
        self
    }

    /// Set discovery timeout override
    #[must_use]
    pub fn with_discovery_timeout_secs(mut self, secs: u64) -> Self {
        self.discovery_timeout_secs = Some(secs);
        self
    }

    /// Set connect timeout override
    #[must_use]
    pub fn with_connect_timeout_ms(mut self, ms: u64) -> Self {
        self.connect_timeout_ms = Some(ms);
        self
    }

    /// Set kill-on-shutdown override
    #[must_use]
    pub fn with_kill_on_shutdown(mut self, kill: bool) -> Self {
        self.kill_on_shutdown = Some(kill);
        self
    }

    /// Apply overrides to a configuration
    pub fn apply(&self, config: &mut LumenConfig) {
        if self.executable.is_some()
            || self.discovery_timeout_secs.is_some()
            || self.connect_timeout_ms.is_some()
            || self.kill_on_shutdown.is_some()
        {
            config.source = ConfigSource::Cli;
        }

        if let Some(ref path) = self.executable {
            config.executable = Some(path.clone());
        }

        if let Some(secs) = self.discovery_timeout_secs {
            config.discovery.timeout = discovery_timeout(secs);
        }

        if let Some(ms) = self.connect_timeout_ms {
            config.transport.connect_timeout_ms = ms;
        }

        if let Some(kill) = self.kill_on_shutdown {
            config.kill_on_shutdown = kill;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    fn write_toml(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    // =========================================================================
    // Defaults
    // =========================================================================

    #[test]
    fn test_default_config() {
        let config = LumenConfig::default();

        assert!(config.executable.is_none());
        assert!(!config.kill_on_shutdown);
        assert_eq!(config.discovery.marker, "[LUMEN] [WEBSOCKET] : Connected to '");
        assert_eq!(config.discovery.timeout, Some(Duration::from_secs(30)));
        assert!(config.discovery.forward_output);
        assert_eq!(config.transport.connect_timeout_ms, 5000);
        assert_eq!(config.source(), ConfigSource::Default);
    }

    #[test]
    fn test_default_config_path() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("lumen/client.toml"));
        }
    }

    // =========================================================================
    // File Parsing
    // =========================================================================

    #[test]
    fn test_parse_valid_toml() {
        let file = write_toml(
            r#"
[host]
executable = "/opt/lumen/Lumen"
args = ["--headless"]
working_dir = "/opt/lumen"
kill_on_shutdown = true

[discovery]
marker = "listening on"
timeout_secs = 0
forward_output = false

[transport]
connect_timeout_ms = 1500
close_timeout_ms = 500
channel_capacity = 8
callback_bind_address = "0.0.0.0"
"#,
        );

        let config = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap();

        assert_eq!(config.executable, Some(PathBuf::from("/opt/lumen/Lumen")));
        assert_eq!(config.args, vec!["--headless".to_string()]);
        assert_eq!(config.working_dir, Some(PathBuf::from("/opt/lumen")));
        assert!(config.kill_on_shutdown);
        assert_eq!(config.discovery.marker, "listening on");
        assert_eq!(config.discovery.timeout, None);
        assert!(!config.discovery.forward_output);
        assert_eq!(config.transport.connect_timeout_ms, 1500);
        assert_eq!(config.transport.close_timeout_ms, 500);
        assert_eq!(config.transport.channel_capacity, 8);
        assert_eq!(config.transport.callback_bind_address.to_string(), "0.0.0.0");
        assert_eq!(config.source(), ConfigSource::File);
    }

    #[test]
    fn test_parse_partial_toml() {
        let file = write_toml("[discovery]\ntimeout_secs = 5\n");
        let config = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap();

        assert_eq!(config.discovery.timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.transport.connect_timeout_ms, 5000);
        assert!(config.executable.is_none());
    }

    #[test]
    fn test_missing_file_graceful() {
        let path = PathBuf::from("/nonexistent/path/client.toml");
        let config = load_config_with_env(Some(path), no_env).unwrap();
        assert_eq!(config.source(), ConfigSource::Default);
        assert!(config.config_file_path.is_none());
    }

    #[test]
    fn test_malformed_toml_error() {
        let file = write_toml("[host\nexecutable = ");
        let result = load_config_with_env(Some(file.path().to_path_buf()), no_env);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let file = write_toml("[transport]\ncallback_bind_address = \"not-an-ip\"\n");
        let result = load_config_with_env(Some(file.path().to_path_buf()), no_env);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));

        let file = write_toml("[discovery]\nmarker = \"  \"\n");
        let result = load_config_with_env(Some(file.path().to_path_buf()), no_env);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_ipv6_callback_address_rejected() {
        let file = write_toml("[transport]\ncallback_bind_address = \"::1\"\n");
        let result = load_config_with_env(Some(file.path().to_path_buf()), no_env);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));

        let env = env_from(&[("LUMEN_CALLBACK_ADDR", "::1")]);
        let config = load_config_with_env(None, env).unwrap();
        assert_eq!(config.transport.callback_bind_address, Ipv4Addr::LOCALHOST);
        assert_eq!(config.source(), ConfigSource::Default);
    }

    // =========================================================================
    // Priority
    // =========================================================================

    #[test]
    fn test_env_overrides_file() {
        let file = write_toml(
            "[host]\nexecutable = \"/from/file\"\n[transport]\nconnect_timeout_ms = 1000\n",
        );
        let env = env_from(&[
            ("LUMEN_EXECUTABLE", "/from/env"),
            ("LUMEN_CONNECT_TIMEOUT", "3000"),
            ("LUMEN_DISCOVERY_TIMEOUT", "0"),
            ("LUMEN_KILL_ON_SHUTDOWN", "true"),
            ("LUMEN_CALLBACK_ADDR", "127.0.0.2"),
        ]);

        let config = load_config_with_env(Some(file.path().to_path_buf()), env).unwrap();

        assert_eq!(config.executable, Some(PathBuf::from("/from/env")));
        assert_eq!(config.transport.connect_timeout_ms, 3000);
        assert_eq!(config.discovery.timeout, None);
        assert!(config.kill_on_shutdown);
        assert_eq!(config.transport.callback_bind_address, Ipv4Addr::new(127, 0, 0, 2));
        assert_eq!(config.source(), ConfigSource::Env);
    }

    #[test]
    fn test_invalid_env_values_ignored() {
        let env = env_from(&[
            ("LUMEN_CONNECT_TIMEOUT", "soon"),
            ("LUMEN_CALLBACK_ADDR", "nowhere"),
        ]);
        let config = load_config_with_env(None, env).unwrap();
        assert_eq!(config.transport.connect_timeout_ms, 5000);
        assert_eq!(config.source(), ConfigSource::Default);
    }

    #[test]
    fn test_cli_overrides_env() {
        let env = env_from(&[("LUMEN_EXECUTABLE", "/from/env")]);
        let mut config = load_config_with_env(None, env).unwrap();

        ConfigOverrides::new()
            .with_executable(PathBuf::from("/from/cli"))
            .with_discovery_timeout_secs(10)
            .apply(&mut config);

        assert_eq!(config.executable, Some(PathBuf::from("/from/cli")));
        assert_eq!(config.discovery.timeout, Some(Duration::from_secs(10)));
        assert_eq!(config.source(), ConfigSource::Cli);
    }

    #[test]
    fn test_config_overrides_empty_no_change() {
        let mut config = LumenConfig::default();
        ConfigOverrides::new().apply(&mut config);
        assert_eq!(config.source(), ConfigSource::Default);
    }

    // =========================================================================
    // Derived Settings
    // =========================================================================

    #[test]
    fn test_launch_config_requires_executable() {
        let config = LumenConfig::default();
        assert!(matches!(
            config.launch_config(),
            Err(ConfigError::ValidationError(_))
        ));

        let mut config = LumenConfig::default();
        config.executable = Some(PathBuf::from("/opt/lumen/Lumen"));
        config.args = vec!["--headless".to_string()];
        config.kill_on_shutdown = true;
        let launch = config.launch_config().unwrap();
        assert_eq!(launch.executable, PathBuf::from("/opt/lumen/Lumen"));
        assert_eq!(launch.args, vec!["--headless".to_string()]);
        assert!(launch.kill_on_shutdown);
    }

    #[test]
    fn test_config_source_display() {
        assert_eq!(ConfigSource::Cli.to_string(), "CLI");
        assert_eq!(ConfigSource::Env.to_string(), "environment");
        assert_eq!(ConfigSource::File.to_string(), "config file");
        assert_eq!(ConfigSource::Default.to_string(), "default");
    }

    #[test]
    fn test_toml_round_trip() {
        let mut original = LumenToml::default();
        original.host.executable = Some(PathBuf::from("/opt/lumen/Lumen"));
        original.discovery.timeout_secs = Some(12);

        let text = toml::to_string(&original).unwrap();
        let parsed: LumenToml = toml::from_str(&text).unwrap();
        assert_eq!(parsed.host.executable, original.host.executable);
        assert_eq!(parsed.discovery.timeout_secs, Some(12));
    }
}
