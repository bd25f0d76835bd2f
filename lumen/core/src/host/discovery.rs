//! Endpoint Discovery
//!
//! The host announces the websocket it listens on by printing a line such as
//!
//! ```text
//! [LUMEN] [WEBSOCKET] : Connected to '127.0.0.1:9001'.
//! ```
//!
//! to stdout. Discovery reads stdout line by line on a background task
//! ([`LineScanner`]) and returns the first announced endpoint.
//!
//! Once discovery finishes, on any outcome, the scanner is told what to do with
//! the rest of the stream ([`AfterStop`]). Forwarding keeps the pipe drained
//! so the host never blocks writing to a full stdout.

use std::fmt;
use std::io;
use std::str::FromStr;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Announcement prefix printed by the host
pub const DEFAULT_ENDPOINT_MARKER: &str = "[LUMEN] [WEBSOCKET] : Connected to '";

/// How long discovery waits for the announcement by default
pub const DEFAULT_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Tracing target host output is forwarded to
pub const HOST_OUTPUT_TARGET: &str = "lumen_core::host::output";

const LINE_QUEUE_CAPACITY: usize = 100;

/// Errors raised while discovering the host endpoint
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// No announcement within the configured wait
    #[error("No endpoint announced within {0:?}")]
    Timeout(Duration),

    /// stdout ended before the announcement
    #[error("Host output ended after {lines_scanned} lines without an endpoint")]
    StreamClosed {
        /// Lines read before end of stream
        lines_scanned: usize,
    },

    /// The announcement did not contain a usable `host:port`
    #[error("Invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint {
        /// Text that failed to parse
        endpoint: String,
        /// What was wrong with it
        reason: String,
    },

    /// The configured marker cannot be turned into a matcher
    #[error("Invalid endpoint marker: {0}")]
    InvalidMarker(String),
}

// ============================================================================
// Endpoint
// ============================================================================

/// Address a host listens on
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Endpoint {
    host: String,
    port: u16,
}

impl Endpoint {
    /// Create an endpoint from its parts
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Parse `host:port`, optionally prefixed with `ws://`
    ///
    /// # Errors
    ///
    /// Returns `InvalidEndpoint` if the host is empty or the port is not a
    /// number in `1..=65535`.
    pub fn parse(text: &str) -> Result<Self, DiscoveryError> {
        let invalid = |reason: &str| DiscoveryError::InvalidEndpoint {
            endpoint: text.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = text.trim();
        let without_scheme = match trimmed.get(..5) {
            Some(scheme) if scheme.eq_ignore_ascii_case("ws://") => &trimmed[5..],
            _ => trimmed,
        };
        let authority = without_scheme.trim_end_matches('/');

        let (host, port) = authority
            .rsplit_once(':')
            .ok_or_else(|| invalid("missing port"))?;
        if host.is_empty() {
            return Err(invalid("missing host"));
        }
        let port: u16 = port.parse().map_err(|_| invalid("port is not a number"))?;
        if port == 0 {
            return Err(invalid("port must not be zero"));
        }

        Ok(Self::new(host, port))
    }

    /// Host part
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port part
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// `ws://host:port`
    #[must_use]
    pub fn url(&self) -> String {
        format!("ws://{self}")
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl FromStr for Endpoint {
    type Err = DiscoveryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ============================================================================
// Matcher
// ============================================================================

static RE_ANSI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;?]*[A-Za-z]").expect("valid regex"));

/// Recognises the announcement line
///
/// Matching ignores case, treats any run of whitespace in the marker as
/// optional whitespace, and strips ANSI colour escapes from the line first.
#[derive(Clone, Debug)]
pub struct EndpointMatcher {
    pattern: Regex,
}

impl EndpointMatcher {
    /// Build a matcher for `marker`
    ///
    /// # Errors
    ///
    /// Returns `InvalidMarker` if the marker is blank.
    pub fn new(marker: &str) -> Result<Self, DiscoveryError> {
        let tokens: Vec<String> = marker.split_whitespace().map(regex::escape).collect();
        if tokens.is_empty() {
            return Err(DiscoveryError::InvalidMarker("marker is empty".to_string()));
        }

        let source = format!(r"(?i){}\s*'?(?P<endpoint>[^'\s]+)", tokens.join(r"\s*"));
        let pattern = Regex::new(&source).map_err(|e| DiscoveryError::InvalidMarker(e.to_string()))?;
        Ok(Self { pattern })
    }

    /// Check one line
    ///
    /// `None` if the line is not an announcement. An announcement with an
    /// unusable endpoint yields `Some(Err(_))`.
    #[must_use]
    pub fn find(&self, line: &str) -> Option<Result<Endpoint, DiscoveryError>> {
        let plain = RE_ANSI.replace_all(line, "");
        let captures = self.pattern.captures(&plain)?;
        let endpoint = captures.name("endpoint")?.as_str().trim_end_matches('.');
        Some(Endpoint::parse(endpoint))
    }
}

impl Default for EndpointMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT_MARKER).expect("default marker is not blank")
    }
}

// ============================================================================
// Line scanner
// ============================================================================

/// What the scanner does with the stream after it is stopped
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AfterStop {
    /// End the task and drop the stream
    Close,
    /// Keep reading until end of stream, logging each line at debug level
    #[default]
    Forward,
}

/// Background reader that turns a byte stream into lines
pub struct LineScanner {
    lines: mpsc::Receiver<String>,
    stop_tx: Option<oneshot::Sender<AfterStop>>,
    task: JoinHandle<()>,
}

impl LineScanner {
    /// Start reading `reader` on a new task
    pub fn spawn<R>(reader: R) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (line_tx, lines) = mpsc::channel(LINE_QUEUE_CAPACITY);
        let (stop_tx, stop_rx) = oneshot::channel();
        let task = tokio::spawn(scan_lines(reader, line_tx, stop_rx));

        Self {
            lines,
            stop_tx: Some(stop_tx),
            task,
        }
    }

    /// Next line without its terminator; `None` at end of stream or after stop
    pub async fn next_line(&mut self) -> Option<String> {
        self.lines.recv().await
    }

    /// Stop delivering lines; repeated calls are ignored
    pub fn stop(&mut self, after: AfterStop) {
        if let Some(stop_tx) = self.stop_tx.take() {
            // The task may have ended at end of stream already.
            let _ = stop_tx.send(after);
            self.lines.close();
        }
    }

    /// Whether the reader task has ended
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Read one line, replacing invalid UTF-8 instead of failing
///
/// `buf` keeps partial input if the future is dropped mid-line, so the call
/// can be repeated from a `select!`. `Ok(None)` means end of stream.
async fn read_line_lossy<R>(reader: &mut BufReader<R>, buf: &mut Vec<u8>) -> io::Result<Option<String>>
where
    R: AsyncRead + Unpin,
{
    let read = reader.read_until(b'\n', buf).await?;
    if read == 0 && buf.is_empty() {
        return Ok(None);
    }

    let line = String::from_utf8_lossy(buf)
        .trim_end_matches(['\r', '\n'])
        .to_string();
    buf.clear();
    Ok(Some(line))
}

async fn scan_lines<R>(
    reader: R,
    line_tx: mpsc::Sender<String>,
    mut stop_rx: oneshot::Receiver<AfterStop>,
) where
    R: AsyncRead + Unpin + Send + 'static,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    let after = loop {
        let next = tokio::select! {
            biased;
            after = &mut stop_rx => break after.unwrap_or_default(),
            next = read_line_lossy(&mut reader, &mut buf) => next,
        };

        match next {
            Ok(Some(line)) => {
                tokio::select! {
                    biased;
                    after = &mut stop_rx => break after.unwrap_or_default(),
                    sent = line_tx.send(line) => {
                        if sent.is_err() {
                            break AfterStop::default();
                        }
                    }
                }
            }
            Ok(None) => {
                debug!("Host output ended");
                return;
            }
            Err(e) => {
                warn!(error = %e, "Failed to read host output");
                return;
            }
        }
    };

    drop(line_tx);
    if after == AfterStop::Close {
        debug!("Stopped reading host output");
        return;
    }

    loop {
        match read_line_lossy(&mut reader, &mut buf).await {
            Ok(Some(line)) => debug!(target: HOST_OUTPUT_TARGET, "{line}"),
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "Failed to read host output");
                break;
            }
        }
    }
    debug!("Host output ended");
}

// ============================================================================
// Discovery
// ============================================================================

/// Discovery settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiscoveryConfig {
    /// Announcement prefix to look for
    pub marker: String,
    /// Bounded wait; `None` waits forever
    pub timeout: Option<Duration>,
    /// Keep draining and logging host output after discovery
    pub forward_output: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            marker: DEFAULT_ENDPOINT_MARKER.to_string(),
            timeout: Some(DEFAULT_DISCOVERY_TIMEOUT),
            forward_output: true,
        }
    }
}

/// Successful discovery
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Discovery {
    /// Announced endpoint
    pub endpoint: Endpoint,
    /// Lines read up to and including the announcement
    pub lines_scanned: usize,
}

/// Read `reader` until the host announces its endpoint
///
/// Lines are examined in order and scanning ends at the first announcement;
/// no later line is looked at.
///
/// # Errors
///
/// - `Timeout` if `config.timeout` elapses first
/// - `StreamClosed` if the stream ends first
/// - `InvalidEndpoint` if the announcement cannot be parsed
pub async fn discover_endpoint<R>(reader: R, config: &DiscoveryConfig) -> Result<Discovery, DiscoveryError>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let matcher = EndpointMatcher::new(&config.marker)?;
    let mut scanner = LineScanner::spawn(reader);

    let result = match config.timeout {
        Some(limit) => tokio::time::timeout(limit, scan_for_endpoint(&mut scanner, &matcher))
            .await
            .unwrap_or(Err(DiscoveryError::Timeout(limit))),
        None => scan_for_endpoint(&mut scanner, &matcher).await,
    };

    scanner.stop(if config.forward_output {
        AfterStop::Forward
    } else {
        AfterStop::Close
    });

    match &result {
        Ok(found) => info!(
            endpoint = %found.endpoint,
            lines_scanned = found.lines_scanned,
            "Host endpoint discovered"
        ),
        Err(e) => warn!(error = %e, "Endpoint discovery failed"),
    }
    result
}

async fn scan_for_endpoint(
    scanner: &mut LineScanner,
    matcher: &EndpointMatcher,
) -> Result<Discovery, DiscoveryError> {
    let mut lines_scanned = 0;
    while let Some(line) = scanner.next_line().await {
        lines_scanned += 1;
        debug!(target: HOST_OUTPUT_TARGET, "{line}");

        if let Some(found) = matcher.find(&line) {
            return found.map(|endpoint| Discovery {
                endpoint,
                lines_scanned,
            });
        }
    }
    Err(DiscoveryError::StreamClosed { lines_scanned })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tokio::io::AsyncWriteExt;

    fn config() -> DiscoveryConfig {
        DiscoveryConfig {
            timeout: Some(Duration::from_secs(2)),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_discovers_on_second_line_and_stops() {
        let output: &'static [u8] = b"noise\n\
            [LUMEN] [WEBSOCKET] : Connected to '127.0.0.1:9001'.\n\
            [LUMEN] [WEBSOCKET] : Connected to '10.0.0.1:1234'.\n\
            more noise\n";

        let found = discover_endpoint(output, &config()).await.unwrap();
        assert_eq!(found.endpoint, Endpoint::new("127.0.0.1", 9001));
        assert_eq!(found.endpoint.to_string(), "127.0.0.1:9001");
        assert_eq!(found.lines_scanned, 2);
    }

    #[tokio::test]
    async fn test_stream_closed_before_marker() {
        let host_stdout = tokio_test::io::Builder::new()
            .read(b"starting\n")
            .read(b"loading fonts\n")
            .build();

        let result = discover_endpoint(host_stdout, &config()).await;
        assert!(matches!(
            result,
            Err(DiscoveryError::StreamClosed { lines_scanned: 2 })
        ));
    }

    #[tokio::test]
    async fn test_timeout_when_host_is_silent() {
        let (_host_stdout, reader) = tokio::io::duplex(64);
        let config = DiscoveryConfig {
            timeout: Some(Duration::from_millis(50)),
            ..Default::default()
        };

        let result = discover_endpoint(reader, &config).await;
        assert!(matches!(result, Err(DiscoveryError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_invalid_endpoint_in_announcement() {
        let output: &'static [u8] = b"[LUMEN] [WEBSOCKET] : Connected to 'localhost'.\n";
        let result = discover_endpoint(output, &config()).await;
        assert!(matches!(result, Err(DiscoveryError::InvalidEndpoint { .. })));
    }

    #[test]
    fn test_matcher_tolerates_colour_and_spacing() {
        let matcher = EndpointMatcher::default();
        let coloured = "\x1b[34m[LUMEN] [WEBSOCKET] : \x1b[37m Connected to '127.0.0.1:9001'.";
        let endpoint = matcher.find(coloured).unwrap().unwrap();
        assert_eq!(endpoint, Endpoint::new("127.0.0.1", 9001));

        let lower = "[lumen] [websocket]: connected to '192.168.0.2:80'.";
        assert_eq!(
            matcher.find(lower).unwrap().unwrap(),
            Endpoint::new("192.168.0.2", 80)
        );
    }

    #[test]
    fn test_matcher_accepts_ws_scheme() {
        let matcher = EndpointMatcher::default();
        let line = "[LUMEN] [WEBSOCKET] : Connected to 'ws://127.0.0.1:9001'.";
        let endpoint = matcher.find(line).unwrap().unwrap();
        assert_eq!(endpoint.url(), "ws://127.0.0.1:9001");
    }

    #[test]
    fn test_matcher_ignores_other_lines() {
        let matcher = EndpointMatcher::default();
        assert!(matcher.find("noise").is_none());
        assert!(matcher.find("[LUMEN] [RENDERER] : Ready.").is_none());
    }

    #[test]
    fn test_custom_marker() {
        let matcher = EndpointMatcher::new("listening on").unwrap();
        let endpoint = matcher.find("server listening on 0.0.0.0:7000.").unwrap().unwrap();
        assert_eq!(endpoint, Endpoint::new("0.0.0.0", 7000));
        assert!(EndpointMatcher::new("   ").is_err());
    }

    #[test]
    fn test_endpoint_parse() {
        assert_eq!(
            "ws://localhost:8080/".parse::<Endpoint>().unwrap(),
            Endpoint::new("localhost", 8080)
        );
        assert!(Endpoint::parse("127.0.0.1").is_err());
        assert!(Endpoint::parse(":80").is_err());
        assert!(Endpoint::parse("host:99999").is_err());
        assert!(Endpoint::parse("host:0").is_err());
    }

    #[tokio::test]
    async fn test_invalid_utf8_before_announcement() {
        let output: &'static [u8] = b"caf\xe9 loaded\r\n\
            [LUMEN] [WEBSOCKET] : Connected to '127.0.0.1:9001'.\n";

        let found = discover_endpoint(output, &config()).await.unwrap();
        assert_eq!(found.endpoint, Endpoint::new("127.0.0.1", 9001));
        assert_eq!(found.lines_scanned, 2);
    }

    #[tokio::test]
    async fn test_scanner_replaces_invalid_utf8() {
        let (mut host_stdout, reader) = tokio::io::duplex(64);
        let mut scanner = LineScanner::spawn(reader);

        host_stdout.write_all(b"bad \xff byte\r\nnext\n").await.unwrap();
        assert_eq!(scanner.next_line().await.as_deref(), Some("bad \u{fffd} byte"));
        assert_eq!(scanner.next_line().await.as_deref(), Some("next"));

        drop(host_stdout);
        assert_eq!(scanner.next_line().await, None);
    }

    #[tokio::test]
    async fn test_scanner_final_line_without_newline() {
        let output: &'static [u8] = b"first\nlast";
        let mut scanner = LineScanner::spawn(output);

        assert_eq!(scanner.next_line().await.as_deref(), Some("first"));
        assert_eq!(scanner.next_line().await.as_deref(), Some("last"));
        assert_eq!(scanner.next_line().await, None);
    }

    #[tokio::test]
    async fn test_scanner_forward_survives_invalid_utf8() {
        let (mut host_stdout, reader) = tokio::io::duplex(16);
        let mut scanner = LineScanner::spawn(reader);
        scanner.stop(AfterStop::Forward);

        for _ in 0..200 {
            tokio::time::timeout(Duration::from_secs(2), host_stdout.write_all(b"bad \xff byte\n"))
                .await
                .unwrap()
                .unwrap();
        }
        assert!(!scanner.is_finished());
    }

    #[tokio::test]
    async fn test_scanner_close_drops_stream() {
        let (mut host_stdout, reader) = tokio::io::duplex(64);
        let mut scanner = LineScanner::spawn(reader);

        host_stdout.write_all(b"one\n").await.unwrap();
        assert_eq!(scanner.next_line().await.as_deref(), Some("one"));

        scanner.stop(AfterStop::Close);
        assert_eq!(scanner.next_line().await, None);

        // With the reader gone, the host side eventually sees a broken pipe.
        let broke = tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                if host_stdout.write_all(b"more\n").await.is_err() {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await;
        assert!(broke.is_ok());
        assert!(scanner.is_finished());
    }

    #[tokio::test]
    async fn test_scanner_forward_keeps_draining() {
        let (mut host_stdout, reader) = tokio::io::duplex(16);
        let mut scanner = LineScanner::spawn(reader);
        scanner.stop(AfterStop::Forward);

        // Far more than the pipe buffer; only succeeds if someone keeps reading.
        for _ in 0..200 {
            tokio::time::timeout(Duration::from_secs(2), host_stdout.write_all(b"frame rendered\n"))
                .await
                .unwrap()
                .unwrap();
        }
        assert!(!scanner.is_finished());

        drop(host_stdout);
        tokio::time::timeout(Duration::from_secs(2), async {
            while !scanner.is_finished() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();
    }
}
