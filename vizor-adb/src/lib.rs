//! # vizor-adb
//!
//! [`DeviceTransport`] implementation that drives the `adb`
//! command-line tool:
//!
//! - `adb devices` for enumeration (only `device`-state entries are
//!   usable; `offline`/`unauthorized` ones are excluded),
//! - `adb -s <serial> exec-out screencap -p` for PNG screenshots,
//! - `adb -s <serial> push` for file export.
//!
//! The adb wire protocol itself is not implemented here — the CLI is
//! the boundary. Every subprocess runs through `tokio::process`, so
//! the blocking work stays off the caller's control flow. A non-zero
//! exit status surfaces as [`VizorError::Transport`] carrying adb's
//! stderr.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use vizor_core::{DeviceTransport, StaticCapture, VizorError};

// ── AdbTransport ─────────────────────────────────────────────────

/// Device transport backed by the `adb` binary.
pub struct AdbTransport {
    adb_path: PathBuf,
}

impl AdbTransport {
    /// Use `adb` from `PATH`.
    pub fn new() -> Self {
        Self::with_path("adb")
    }

    /// Use an explicit adb binary.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            adb_path: path.into(),
        }
    }

    fn command(&self) -> Command {
        Command::new(&self.adb_path)
    }

    /// Run an adb invocation to completion and return its stdout.
    async fn run(&self, mut cmd: Command, what: &str) -> Result<Vec<u8>, VizorError> {
        debug!(what, "running adb");
        let output = cmd.output().await.map_err(|e| {
            VizorError::Transport(format!(
                "failed to spawn {}: {e}",
                self.adb_path.display()
            ))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VizorError::Transport(format!(
                "adb {what} failed ({}): {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(output.stdout)
    }
}

impl Default for AdbTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DeviceTransport for AdbTransport {
    async fn list_devices(&self) -> Result<Vec<String>, VizorError> {
        let mut cmd = self.command();
        cmd.arg("devices");
        let stdout = self.run(cmd, "devices").await?;
        Ok(parse_device_list(&String::from_utf8_lossy(&stdout)))
    }

    async fn screenshot(&self, serial: &str) -> Result<StaticCapture, VizorError> {
        let mut cmd = self.command();
        cmd.args(["-s", serial, "exec-out", "screencap", "-p"]);
        let png = self.run(cmd, "screencap").await?;
        if png.is_empty() {
            return Err(VizorError::Transport(format!(
                "screencap on {serial} produced no data"
            )));
        }
        StaticCapture::from_encoded(&png)
    }

    async fn push(&self, serial: &str, local: &Path, remote: &str) -> Result<(), VizorError> {
        let mut cmd = self.command();
        cmd.args(["-s", serial, "push"]).arg(local).arg(remote);
        self.run(cmd, "push").await?;
        Ok(())
    }
}

// ── Device-list parsing ──────────────────────────────────────────

/// Parse `adb devices` output into usable serials.
///
/// Lines look like `<serial>\t<state>`; only `device` state counts.
/// The header line and daemon-startup noise fall out naturally because
/// their second field is never `device`.
fn parse_device_list(raw: &str) -> Vec<String> {
    raw.lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let serial = fields.next()?;
            let state = fields.next()?;
            (state == "device").then(|| serial.to_string())
        })
        .collect()
}

// ── Tests ────────────────────────────────────────────────────────
