//! Stdio Transport
//!
//! Spawns an MCP server as a child process and speaks line-delimited JSON
//! over its stdin/stdout. The child is killed when the transport is dropped.

use std::collections::HashMap;
use std::ffi::OsString;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;
use tracing::debug;

use super::{Metadata, Transport, TransportError, TransportMessage};

/// Environment variables forwarded to a spawned server by default. Servers
/// inherit only this curated subset plus whatever the caller adds.
#[cfg(unix)]
const DEFAULT_ENV_VARS: &[&str] = &[
    "HOME", "LANG", "LC_ALL", "LOGNAME", "PATH", "SHELL", "TERM", "TMPDIR", "TZ", "USER",
];

#[cfg(windows)]
const DEFAULT_ENV_VARS: &[&str] = &[
    "PATH",
    "PATHEXT",
    "USERNAME",
    "USERDOMAIN",
    "USERPROFILE",
    "TEMP",
    "TMP",
];

/// Build the environment for a spawned server from the default allowlist
/// plus caller-supplied extras.
fn server_env(extra_env: Option<HashMap<String, String>>) -> HashMap<String, String> {
    DEFAULT_ENV_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok().map(|value| (var.to_string(), value)))
        .chain(extra_env.unwrap_or_default())
        .collect()
}

/// Transport over a child process's stdin/stdout, one JSON message per line.
///
/// Stdio carries no per-message metadata; outbound metadata is ignored and
/// inbound messages arrive without any.
pub struct StdioTransport {
    child: Mutex<Child>,
    stdin: Mutex<ChildStdin>,
    lines: Mutex<Lines<BufReader<ChildStdout>>>,
    closed: AtomicBool,
}

impl StdioTransport {
    /// Spawn the given command and frame its stdio as an MCP transport.
    pub fn spawn(
        program: impl Into<OsString>,
        args: Vec<OsString>,
        extra_env: Option<HashMap<String, String>>,
    ) -> std::io::Result<Self> {
        let mut child = Command::new(program.into())
            .args(args)
            .env_clear()
            .envs(server_env(extra_env))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| std::io::Error::other("failed to capture child stdin"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| std::io::Error::other("failed to capture child stdout"))?;

        Ok(Self {
            child: Mutex::new(child),
            stdin: Mutex::new(stdin),
            lines: Mutex::new(BufReader::new(stdout).lines()),
            closed: AtomicBool::new(false),
        })
    }

    fn check_open(&self) -> Result<(), TransportError> {
        if self.closed.load(Ordering::SeqCst) {
            Err(TransportError::Closed)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Transport for StdioTransport {
    async fn send(
        &self,
        payload: Value,
        _metadata: Option<Metadata>,
    ) -> Result<(), TransportError> {
        self.check_open()?;

        let json = serde_json::to_string(&payload).map_err(TransportError::Encode)?;
        debug!("stdio message to server: {json}");

        let mut stdin = self.stdin.lock().await;
        stdin.write_all(json.as_bytes()).await?;
        stdin.write_all(b"\n").await?;
        Ok(())
    }

    async fn receive(&self) -> Result<TransportMessage, TransportError> {
        self.check_open()?;

        let mut lines = self.lines.lock().await;
        match lines.next_line().await? {
            Some(line) => {
                debug!("stdio message from server: {line}");
                let payload: Value =
                    serde_json::from_str(&line).map_err(TransportError::Decode)?;
                Ok(TransportMessage::new(payload))
            }
            None => {
                // Server exited and closed its stdout.
                self.closed.store(true, Ordering::SeqCst);
                Err(TransportError::Closed)
            }
        }
    }

    async fn close(&self) -> Result<(), TransportError> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        let mut child = self.child.lock().await;
        if let Err(e) = child.start_kill() {
            debug!("failed to kill spawned server: {e}");
        }
        Ok(())
    }
}
