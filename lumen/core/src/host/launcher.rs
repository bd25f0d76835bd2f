//! Host process launching.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use thiserror::Error;
use tokio::process::{Child, ChildStdout, Command};
use tracing::{debug, error, info, warn};

/// Errors raised while starting the host
#[derive(Debug, Error)]
pub enum LaunchError {
    /// The executable path does not exist
    #[error("Host executable not found: {0}")]
    ExecutableNotFound(PathBuf),

    /// The OS refused to start the process
    #[error("Failed to spawn {executable}: {source}")]
    SpawnFailed {
        /// Executable that was started
        executable: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// The child was started without a readable stdout
    #[error("Host stdout is not available")]
    StdoutUnavailable,

    /// Error while signalling or waiting on the child
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// How to start the host
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchConfig {
    /// Path to the host executable
    pub executable: PathBuf,
    /// Arguments passed to the host
    pub args: Vec<String>,
    /// Extra environment variables
    pub env_vars: HashMap<String, String>,
    /// Working directory; inherits ours when `None`
    pub working_dir: Option<PathBuf>,
    /// Terminate the host when the instance shuts down
    pub kill_on_shutdown: bool,
}

impl LaunchConfig {
    /// Launch `executable` with no arguments
    pub fn new(executable: impl AsRef<Path>) -> Self {
        Self {
            executable: executable.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    /// Add an argument.
    #[must_use]
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Replace the argument list.
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Add an environment variable.
    #[must_use]
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    /// Set the working directory.
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.working_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Terminate the host on shutdown instead of detaching.
    #[must_use]
    pub fn with_kill_on_shutdown(mut self, kill: bool) -> Self {
        self.kill_on_shutdown = kill;
        self
    }

    /// Whether `executable` names a path rather than a bare program name
    fn is_path(&self) -> bool {
        self.executable.components().count() > 1 || self.executable.is_absolute()
    }
}

/// A running host started by [`spawn`]
#[derive(Debug)]
pub struct HostProcess {
    child: Child,
    pid: Option<u32>,
    executable: PathBuf,
}

impl HostProcess {
    /// OS process id recorded at launch
    #[must_use]
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Executable the process was started from
    #[must_use]
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Whether the process has exited, without blocking
    ///
    /// # Errors
    ///
    /// Returns an error if the status cannot be queried.
    pub fn has_exited(&mut self) -> Result<bool, LaunchError> {
        Ok(self.child.try_wait()?.is_some())
    }

    /// Kill the process and wait for it to exit
    ///
    /// Succeeds if the process had already exited.
    ///
    /// # Errors
    ///
    /// Returns an error if the kill signal cannot be delivered.
    pub async fn terminate(&mut self) -> Result<(), LaunchError> {
        if self.has_exited()? {
            debug!(pid = ?self.pid, "Host already exited");
            return Ok(());
        }

        info!(pid = ?self.pid, "Terminating host");
        self.child.kill().await?;
        Ok(())
    }

    /// Wait for the process to exit on its own
    ///
    /// # Errors
    ///
    /// Returns an error if waiting fails.
    pub async fn wait(&mut self) -> Result<std::process::ExitStatus, LaunchError> {
        Ok(self.child.wait().await?)
    }

    /// Release the process; it keeps running after this handle is gone
    pub fn detach(self) {
        info!(pid = ?self.pid, "Detached from host");
    }
}

/// Start the host with stdout piped for endpoint discovery
///
/// stdin is closed and stderr is inherited.
///
/// # Errors
///
/// Returns `ExecutableNotFound` when the configured path does not exist, and
/// `SpawnFailed` when the OS cannot start it.
pub fn spawn(config: &LaunchConfig) -> Result<(HostProcess, ChildStdout), LaunchError> {
    if config.is_path() && !config.executable.exists() {
        error!(executable = ?config.executable, "Host executable not found");
        return Err(LaunchError::ExecutableNotFound(config.executable.clone()));
    }

    let mut cmd = Command::new(&config.executable);
    cmd.args(&config.args)
        .envs(&config.env_vars)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit());

    if let Some(dir) = &config.working_dir {
        cmd.current_dir(dir);
    }

    debug!(executable = ?config.executable, args = ?config.args, "Spawning host");

    let mut child = cmd.spawn().map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            error!(executable = ?config.executable, "Host executable not found");
            LaunchError::ExecutableNotFound(config.executable.clone())
        } else {
            error!(executable = ?config.executable, error = %e, "Failed to spawn host");
            LaunchError::SpawnFailed {
                executable: config.executable.clone(),
                source: e,
            }
        }
    })?;

    let Some(stdout) = child.stdout.take() else {
        warn!("Host started without piped stdout");
        return Err(LaunchError::StdoutUnavailable);
    };

    let pid = child.id();
    info!(pid = ?pid, executable = ?config.executable, "Host started");

    Ok((
        HostProcess {
            child,
            pid,
            executable: config.executable.clone(),
        },
        stdout,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = LaunchConfig::new("/opt/lumen/Lumen")
            .with_arg("--headless")
            .with_env("LUMEN_LOG", "debug")
            .with_working_dir("/opt/lumen")
            .with_kill_on_shutdown(true);

        assert_eq!(config.args, vec!["--headless".to_string()]);
        assert_eq!(config.env_vars.get("LUMEN_LOG").map(String::as_str), Some("debug"));
        assert_eq!(config.working_dir, Some(PathBuf::from("/opt/lumen")));
        assert!(config.kill_on_shutdown);
    }

    #[tokio::test]
    async fn test_missing_executable_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = LaunchConfig::new(dir.path().join("Lumen.exe"));

        let result = spawn(&config);
        assert!(matches!(result, Err(LaunchError::ExecutableNotFound(_))));
    }

    #[tokio::test]
    async fn test_missing_program_name() {
        let config = LaunchConfig::new("lumen-host-that-does-not-exist");
        let result = spawn(&config);
        assert!(matches!(result, Err(LaunchError::ExecutableNotFound(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_spawn_and_terminate() {
        let config = LaunchConfig::new("sh").with_args(["-c", "sleep 30"]);
        let (mut process, _stdout) = spawn(&config).unwrap();

        assert!(process.pid().is_some());
        assert!(!process.has_exited().unwrap());

        process.terminate().await.unwrap();
        assert!(process.has_exited().unwrap());

        // Already gone.
        process.terminate().await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stdout_is_piped() {
        use tokio::io::AsyncReadExt;

        let config = LaunchConfig::new("sh").with_args(["-c", "echo hello"]);
        let (mut process, mut stdout) = spawn(&config).unwrap();

        let mut output = String::new();
        stdout.read_to_string(&mut output).await.unwrap();
        assert_eq!(output, "hello\n");
        assert!(process.wait().await.unwrap().success());
    }
}
